//! # git-ssh-gate
//!
//! The gate between an authenticated SSH session and git. Invoked once per
//! session with the pusher's id and username, it decides whether the command
//! in `SSH_ORIGINAL_COMMAND` may run, follows renamed repositories,
//! autocreates repositories on first push, and finally execs into the git
//! binary with a push context in its environment.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use git_ssh_gate::config::GatewayConfig;
//! use git_ssh_gate::gateway::{Decision, Gateway, Request};
//! use git_ssh_gate::store::SqliteStore;
//! use git_ssh_gate::types::PusherIdentity;
//!
//! let config = GatewayConfig::load(None)?;
//! let store = SqliteStore::new(&config.connection_string)?;
//! let request = Request {
//!     pusher: PusherIdentity { id: 7, name: "alice".into() },
//!     command: "git-upload-pack '~alice/proj'".into(),
//! };
//! match Gateway::new(&config, &store).decide(&request) {
//!     Decision::Handoff(handoff) => { /* handoff.exec() */ }
//!     Decision::Reject(rejection) => { /* print rejection.client_lines() */ }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `git-ssh-gate` binary.

pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod store;
pub mod types;
