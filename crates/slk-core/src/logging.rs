//! Logger setup for programs embedding the client.

use std::fs::{self, OpenOptions};

use anyhow::{Context, Result};
use env_logger::fmt::WriteStyle;

use crate::config::LoggingConfig;
use crate::paths::expand_str_path;

/// Install an `env_logger` logger configured from `config`.
///
/// The configured level replaces any global level from `RUST_LOG`; only
/// its per-module directives still apply. When `config.file` is set, output
/// is appended to that file without colors.
/// Calling this again after a logger is installed is a no-op.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    builder.filter_level(config.level.into());

    if let Some(ref file) = config.file {
        let path = expand_str_path(file)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating log directory {}", parent.display()))?;
        }
        let handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(handle)));
        builder.write_style(WriteStyle::Never);
    }

    if let Err(err) = builder.try_init() {
        log::debug!("logger already initialized: {err}");
    }
    Ok(())
}
