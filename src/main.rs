use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use tracing::{error, info};

use git_ssh_gate::config::GatewayConfig;
use git_ssh_gate::gateway::{Decision, Gateway, Request};
use git_ssh_gate::logging::{DEFAULT_LOG_FILE, init_logging};
use git_ssh_gate::store::SqliteStore;
use git_ssh_gate::types::PusherIdentity;

const LOG_FILE_ENV: &str = "GIT_SSH_GATE_LOG";

/// Runs after the SSH session is authenticated as a particular account, and
/// before that account may run any git operation.
#[derive(Parser)]
#[command(name = "git-ssh-gate")]
#[command(about = "Authorizes a git command for an authenticated SSH session", long_about = None)]
struct Cli {
    /// Numeric id of the authenticated pusher
    pusher_id: i64,

    /// Username of the authenticated pusher
    pusher_name: String,

    /// Config file to read instead of the default locations
    #[arg(long, env = "GIT_SSH_GATE_CONFIG")]
    config: Option<PathBuf>,

    /// Operator log file
    #[arg(long, env = LOG_FILE_ENV, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = GatewayConfig::load(cli.config.as_deref()).context("Failed to load config file")?;

    let store = SqliteStore::new(&config.connection_string)
        .context("Failed to open a database connection")?;

    let request = Request {
        pusher: PusherIdentity {
            id: cli.pusher_id,
            name: cli.pusher_name,
        },
        command: std::env::var("SSH_ORIGINAL_COMMAND").unwrap_or_default(),
    };

    match Gateway::new(&config, &store).decide(&request) {
        Decision::Reject(rejection) => {
            for line in rejection.client_lines() {
                eprintln!("{line}");
            }
            Ok(ExitCode::from(rejection.exit_code()))
        }
        Decision::Handoff(handoff) => {
            for line in &handoff.notices {
                eprintln!("{line}");
            }
            drop(store);
            Err(handoff.exec()).context("Unable to exec into git")
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let log_file = std::env::var_os(LOG_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
            init_logging(&log_file);
            error!("Expected a pusher id and username from SSH: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&cli.log_file);
    info!("Invoked with arguments: {:?}", std::env::args().collect::<Vec<_>>());
    if let Ok(push) = std::env::var("SRHT_PUSH") {
        info!("Running shell for push {push}");
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
