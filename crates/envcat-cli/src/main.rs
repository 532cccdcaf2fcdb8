use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use envcat_cli::{commands, exit_code_for, load_config, tracing_setup, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("envcat: {e}");
            return exit_code_for(&e.into());
        }
    };
    tracing_setup::init_tracing(&config.logging);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match commands::run(&cli.command, &config, &mut out) {
        Ok(()) => {
            let _ = out.flush();
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("envcat: {e:#}");
            exit_code_for(&e)
        }
    }
}
