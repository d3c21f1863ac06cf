use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use conddb_core::CondDbError;

mod cli;
mod commands;

fn main() -> ExitCode {
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version also arrive here, on stdout.
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    match commands::run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            let code = err
                .downcast_ref::<CondDbError>()
                .map_or(1, CondDbError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
