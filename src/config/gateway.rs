use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};
use tracing::debug;

use crate::error::{Error, Result};
use crate::gateway::path::normalize_lexically;

/// Locations tried, in order, when no explicit config file is given.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["../config.ini", "/etc/sr.ht/config.ini"];

const GIT_SECTION: &str = "git.sr.ht";
const SITE_SECTION: &str = "sr.ht";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Public origin URL, e.g. "https://git.example.org".
    pub origin: String,
    /// Absolute, normalized repository root.
    pub repos: PathBuf,
    /// Script every autocreated repository's hooks link to.
    pub post_update_script: PathBuf,
    pub connection_string: String,
    pub owner_name: Option<String>,
    pub owner_email: Option<String>,
}

impl GatewayConfig {
    /// Loads the first readable config file. An explicit path is the only
    /// candidate when given.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let candidates: Vec<PathBuf> = match explicit {
            Some(path) => vec![path.to_path_buf()],
            None => DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from).collect(),
        };

        for path in &candidates {
            let source = Config::builder()
                .add_source(File::from(path.as_path()).format(FileFormat::Ini).required(true))
                .build();
            match source {
                Ok(source) => {
                    debug!("Loaded config from {}", path.display());
                    return Self::from_source(&source);
                }
                Err(e) => debug!("Unable to load config from {}: {e}", path.display()),
            }
        }

        Err(Error::NoConfigFile {
            tried: candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    pub fn from_ini_str(content: &str) -> Result<Self> {
        let source = Config::builder()
            .add_source(File::from_str(content, FileFormat::Ini))
            .build()?;
        Self::from_source(&source)
    }

    fn from_source(source: &Config) -> Result<Self> {
        let repos = PathBuf::from(required(source, GIT_SECTION, "repos")?);
        let repos = normalize_lexically(&std::path::absolute(&repos)?);

        Ok(Self {
            origin: required(source, GIT_SECTION, "origin")?,
            repos,
            post_update_script: PathBuf::from(required(source, GIT_SECTION, "post-update-script")?),
            connection_string: required(source, GIT_SECTION, "connection-string")?,
            owner_name: optional(source, SITE_SECTION, "owner-name")?,
            owner_email: optional(source, SITE_SECTION, "owner-email")?,
        })
    }

    /// Contact line shown to suspended users.
    #[must_use]
    pub fn support_contact(&self) -> String {
        format!(
            "{} <{}>",
            self.owner_name.as_deref().unwrap_or_default(),
            self.owner_email.as_deref().unwrap_or_default()
        )
    }
}

fn optional(source: &Config, section: &str, key: &str) -> Result<Option<String>> {
    match source.get_string(&format!("{section}.{key}")) {
        Ok(value) => Ok(Some(value)),
        Err(config::ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn required(source: &Config, section: &str, key: &str) -> Result<String> {
    optional(source, section, key)?.ok_or_else(|| Error::MissingKey {
        section: section.to_string(),
        key: key.to_string(),
    })
}
