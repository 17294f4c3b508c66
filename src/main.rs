mod args;
mod config;
mod engine;
mod entry;
mod error;
mod http;
mod logger;
mod output;
mod shutdown;
mod stats;

use std::process::ExitCode;

fn main() -> ExitCode {
    match entry::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Usage errors were already printed together with the usage line.
            if !err.is_usage() {
                eprintln!("{}", err);
            }
            ExitCode::FAILURE
        }
    }
}
