use crate::error::{Error, Result};
use crate::types::Permission;

/// The git services a client may request over SSH.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitService {
    ReceivePack,
    UploadPack,
    UploadArchive,
}

impl GitService {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "git-receive-pack" => Some(Self::ReceivePack),
            "git-upload-pack" => Some(Self::UploadPack),
            "git-upload-archive" => Some(Self::UploadArchive),
            _ => None,
        }
    }

    pub fn command_name(&self) -> &'static str {
        match self {
            Self::ReceivePack => "git-receive-pack",
            Self::UploadPack => "git-upload-pack",
            Self::UploadArchive => "git-upload-archive",
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(self, Self::ReceivePack)
    }

    /// Bits a pusher must hold to run this service.
    pub fn required_permission(&self) -> Permission {
        if self.is_write() {
            Permission::WRITE
        } else {
            Permission::READ
        }
    }
}

/// A validated client command: the service and the full argument vector,
/// whose last element is the repository path. `argv` always holds the
/// service name and at least one argument after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommand {
    pub service: GitService,
    pub argv: Vec<String>,
}

impl GitCommand {
    pub fn path_arg(&self) -> &str {
        self.argv.last().map(String::as_str).unwrap_or_default()
    }

    /// Replaces the repository path argument. Never touches the service name.
    pub fn set_path_arg(&mut self, path: String) {
        if let [_, .., last] = self.argv.as_mut_slice() {
            *last = path;
        }
    }
}

/// Splits `raw` with shell quoting rules and checks it names a git service
/// followed by a repository path.
pub fn parse_command(raw: &str) -> Result<GitCommand> {
    let argv = shlex::split(raw).ok_or_else(|| Error::MalformedCommand(raw.to_string()))?;

    if argv.len() < 2 {
        return Err(Error::UnacceptableCommand(argv));
    }

    let service = GitService::from_str(&argv[0])
        .ok_or_else(|| Error::UnacceptableCommand(argv.clone()))?;

    Ok(GitCommand { service, argv })
}
