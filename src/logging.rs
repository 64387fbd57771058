//! Operator log channel.
//!
//! Everything logged through `tracing` lands in the shell log file, never in
//! front of the client, unless that file cannot be opened, in which case the
//! log falls back to stderr. Writes are synchronous so that nothing is lost
//! when the process execs into git.

use std::path::{Path, PathBuf};

use tracing::warn;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Default operator log file.
pub const DEFAULT_LOG_FILE: &str = "/var/log/gitsrht-shell";

/// Default filter directive when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVE: &str = "git_ssh_gate=info";

fn file_appender(path: &Path) -> Result<RollingFileAppender, String> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| format!("{} does not name a file", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .map_err(|e| e.to_string())
}

/// Installs the global subscriber, appending to `log_file` when possible.
pub fn init_logging(log_file: &Path) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let (writer, fallback_reason) = match file_appender(log_file) {
        Ok(appender) => (BoxMakeWriter::new(appender), None),
        Err(e) => (BoxMakeWriter::new(std::io::stderr), Some(e)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init();

    if let Some(reason) = fallback_reason {
        warn!(
            "Unable to open log file {}: {reason} (using stderr instead)",
            log_file.display()
        );
    }
}
