//! # Estoque Entry Point
//!
//! Parses arguments, runs the command, maps errors to exit codes.

use std::process::ExitCode;

use clap::Parser;
use estoque_cli::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    estoque_cli::init_tracing();

    let json = cli.json;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match estoque_cli::run(cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match serde_json::to_string(&err) {
                Ok(body) if json => eprintln!("{}", body),
                _ => eprintln!("error: {}", err),
            }
            ExitCode::from(err.exit_code())
        }
    }
}
