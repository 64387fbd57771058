use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("missing configuration key [{section}] {key}")]
    MissingKey { section: String, key: String },

    #[error("no configuration file could be loaded (tried {tried})")]
    NoConfigFile { tried: String },

    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("unable to parse command: {0:?}")]
    MalformedCommand(String),

    #[error("unacceptable command: {0:?}")]
    UnacceptableCommand(Vec<String>),

    #[error("hook {link} already exists and does not point at {target}")]
    HookConflict { link: String, target: String },

    #[error("executable not found on PATH: {0}")]
    BinaryNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
