use clap::Parser;
use std::process::ExitCode;

use waypost::cli::{run_cli, Cli};
use waypost::telemetry::{init_logging, LogConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = match init_logging(&LogConfig::from_env()) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: {err:#}");
            None
        }
    };

    let mut stdout = std::io::stdout().lock();
    match run_cli(&cli, &mut stdout) {
        Ok(status) => ExitCode::from(status),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
