use std::os::unix::process::CommandExt;
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::command::GitCommand;
use crate::error::{Error, Result};
use crate::types::{PusherIdentity, RepoLookup};

/// Environment variable the exec'd git process (and its hooks) read the
/// push context from.
pub const PUSH_CONTEXT_VAR: &str = "SRHT_PUSH_CTX";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoContext {
    pub id: i64,
    pub name: String,
    pub path: String,
    pub visibility: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub canonical_name: String,
    pub name: String,
}

/// What the gateway resolved, handed to later stages so they need not
/// repeat the lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushContext {
    pub repo: RepoContext,
    pub user: UserContext,
}

impl PushContext {
    pub fn new(repo: &RepoLookup, pusher: &PusherIdentity) -> Self {
        Self {
            repo: RepoContext {
                id: repo.id,
                name: repo.name.clone(),
                path: repo.path.clone(),
                visibility: repo.visibility.as_str().to_string(),
            },
            user: UserContext {
                canonical_name: pusher.canonical_name(),
                name: pusher.name.clone(),
            },
        }
    }

    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::from)
    }
}

/// The terminal action of an accepted request: replace this process with
/// the git binary named by `program`, run with `args` (argv\[0\] included)
/// and the current environment plus `env`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    /// Informational lines for the client, printed before the exec.
    pub notices: Vec<String>,
}

impl Handoff {
    pub fn new(command: GitCommand, context: &PushContext) -> Result<Self> {
        Ok(Self {
            program: command.service.command_name().to_string(),
            args: command.argv,
            env: vec![(PUSH_CONTEXT_VAR.to_string(), context.encode()?)],
            notices: Vec::new(),
        })
    }

    /// Replaces the current process image. Only returns on failure.
    pub fn exec(self) -> Error {
        let bin = match which::which(&self.program) {
            Ok(bin) => bin,
            Err(e) => {
                return Error::BinaryNotFound(format!("{}: {e}", self.program));
            }
        };

        info!("Executing command: {:?} ({})", self.args, bin.display());

        let mut cmd = Command::new(&bin);
        if let Some((arg0, rest)) = self.args.split_first() {
            cmd.arg0(arg0).args(rest);
        }
        cmd.envs(self.env).exec().into()
    }
}
