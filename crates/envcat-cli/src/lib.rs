//! # envcat-cli
//!
//! `envcat` subcommands over the workspace crates. Each command writes its
//! report to the supplied writer so it can run under test.

pub mod args;
pub mod commands;
pub mod tracing_setup;

use std::process::ExitCode;

use envcat_core::{EnvcatConfig, EnvcatError};

pub use args::{Cli, Command};

/// Exit status for a failed command.
///
/// `2` when the index cannot serve, `3` for configuration problems, `1`
/// for everything else.
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<EnvcatError>() {
        Some(e) if e.is_unavailable() => ExitCode::from(2),
        Some(EnvcatError::Config(_)) => ExitCode::from(3),
        _ => ExitCode::FAILURE,
    }
}

/// Config from `--config`, or validated defaults.
pub fn load_config(cli: &Cli) -> Result<EnvcatConfig, EnvcatError> {
    match &cli.config {
        Some(path) => EnvcatConfig::load(path),
        None => {
            let config = EnvcatConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}
