//! Cocotab CLI binary.

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cocotab::Cli::parse();
    cocotab::init_logging(cli.verbose);

    match cocotab::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
