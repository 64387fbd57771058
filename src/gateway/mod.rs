//! The per-session access decision.
//!
//! ```text
//! command --> path --> repository lookup --(miss)--> redirect lookup --(miss)--> autocreate
//!                              |                           |                         |
//!                              +-------------+-------------+-------------------------+
//!                                            v
//!                               access check --> suspension check --> handoff
//! ```
//!
//! Each stage either narrows the request or rejects it. Nothing here exits
//! the process or execs; the caller acts on the returned [`Decision`].

pub mod access;
pub mod autocreate;
pub mod command;
pub mod handoff;
pub mod path;

use tracing::{error, info, warn};

use crate::config::GatewayConfig;
use crate::error::Error;
use crate::store::Store;
use crate::types::{PusherIdentity, RepoLookup};

pub use command::{GitCommand, GitService};
pub use handoff::{Handoff, PUSH_CONTEXT_VAR, PushContext};

/// Exit status for every refusal.
pub const REJECTION_EXIT_CODE: u8 = 128;

/// A refusal the client is told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Not a git command. Usually an `ssh` without `-T`, so not an error.
    NoShell { pusher_name: String },
    NotFound,
    AccessDenied,
    Suspended { notice: String, contact: String },
    /// The database failed while looking up the repository.
    Temporary,
}

impl Rejection {
    pub fn exit_code(&self) -> u8 {
        REJECTION_EXIT_CODE
    }

    /// Lines written to the client's stderr.
    pub fn client_lines(&self) -> Vec<String> {
        match self {
            Self::NoShell { pusher_name } => vec![format!(
                "Hi {pusher_name}! You've successfully authenticated, \
                 but I do not provide an interactive shell. Bye!"
            )],
            Self::NotFound => vec!["Repository not found.".to_string(), String::new()],
            Self::AccessDenied => vec!["Access denied.".to_string(), String::new()],
            Self::Suspended { notice, contact } => vec![
                "Your account has been suspended for the following reason:".to_string(),
                String::new(),
                format!("\t{notice}"),
                String::new(),
                format!("Please contact support: {contact}"),
                String::new(),
            ],
            Self::Temporary => {
                vec!["A temporary error has occurred. Please try again.".to_string()]
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Handoff(Handoff),
    Reject(Rejection),
}

impl From<Result<Handoff, Rejection>> for Decision {
    fn from(result: Result<Handoff, Rejection>) -> Self {
        match result {
            Ok(handoff) => Self::Handoff(handoff),
            Err(rejection) => Self::Reject(rejection),
        }
    }
}

/// One invocation's input: who is asking, and what they asked to run.
#[derive(Debug, Clone)]
pub struct Request {
    pub pusher: PusherIdentity,
    /// `SSH_ORIGINAL_COMMAND`, empty when absent.
    pub command: String,
}

pub struct Gateway<'a> {
    config: &'a GatewayConfig,
    store: &'a dyn Store,
}

impl<'a> Gateway<'a> {
    pub fn new(config: &'a GatewayConfig, store: &'a dyn Store) -> Self {
        Self { config, store }
    }

    pub fn decide(&self, request: &Request) -> Decision {
        self.evaluate(request).into()
    }

    fn evaluate(&self, request: &Request) -> Result<Handoff, Rejection> {
        let pusher = &request.pusher;

        let mut command = command::parse_command(&request.command).map_err(|e| {
            info!("Not permitting unacceptable command: {e}");
            Rejection::NoShell {
                pusher_name: pusher.name.clone(),
            }
        })?;

        let path = path::resolve_repo_path(&self.config.repos, command.path_arg());
        info!(
            "Looking up repo: pusher ID {}, repo path {}",
            pusher.id,
            path.display()
        );

        let repo = match self.locate(pusher.id, &path.to_string_lossy())? {
            Some(repo) => repo,
            None => autocreate::autocreate(
                self.store,
                &self.config.post_update_script,
                &self.config.support_contact(),
                pusher,
                command.service,
                &path,
            )?,
        };

        info!(
            "repo ID {}; name '{}'; owner ID {}; owner name '{}'; visibility '{}'; \
             pusher type '{}'; pusher suspension notice '{}'; access grant '{}'",
            repo.id,
            repo.name,
            repo.owner_id,
            repo.owner_name,
            repo.visibility,
            repo.pusher.user_type,
            repo.pusher.suspension_notice.as_deref().unwrap_or_default(),
            repo.access.as_ref().map(|a| a.as_str()).unwrap_or_default(),
        );

        let held = access::held_permission(
            pusher.id,
            repo.owner_id,
            &repo.visibility,
            repo.access.as_ref(),
        );
        access::check_access(command.service.required_permission(), held).inspect_err(|_| {
            info!(
                "Access denied: requires {}, holds {held}",
                command.service.required_permission()
            );
        })?;

        access::check_suspension(&repo.pusher, &self.config.support_contact()).inspect_err(
            |_| info!("Refusing suspended pusher {}", pusher.id),
        )?;

        // A redirect is followed transparently: git runs against the
        // repository's current path.
        command.set_path_arg(repo.path.clone());

        let context = PushContext::new(&repo, pusher);
        let mut handoff = Handoff::new(command, &context).map_err(|e| {
            error!("Unable to encode push context: {e}");
            Rejection::Temporary
        })?;

        if repo.redirected {
            handoff.notices = self.moved_notice(&repo);
        }

        Ok(handoff)
    }

    /// Direct lookup, then the redirect table. `Ok(None)` when neither
    /// knows the path.
    fn locate(&self, pusher_id: i64, path: &str) -> Result<Option<RepoLookup>, Rejection> {
        let temporary = |e: Error| {
            error!("Error occurred looking up repo: {e}");
            Rejection::Temporary
        };

        if let Some(repo) = self
            .store
            .lookup_repository(pusher_id, path)
            .map_err(temporary)?
        {
            return Ok(Some(repo));
        }

        info!("Lookup failed, looking up redirect");
        let redirected = self
            .store
            .lookup_redirect(pusher_id, path)
            .map_err(temporary)?;

        match &redirected {
            Some(repo) => info!("Redirected {path} to {}", repo.path),
            None => warn!("No repository or redirect at {path}"),
        }

        Ok(redirected)
    }

    fn moved_notice(&self, repo: &RepoLookup) -> Vec<String> {
        vec![
            "\x1b[93mNOTICE\x1b[0m: This repository has moved.".to_string(),
            "Please update your remote to:".to_string(),
            String::new(),
            format!(
                "\t{}/~{}/{}",
                self.config.origin.trim_end_matches('/'),
                repo.owner_name,
                repo.name
            ),
            String::new(),
        ]
    }
}
