//! georange CLI entry point
//!
//! Parses arguments and dispatches via `cli::run`. On failure the error is
//! printed as a JSON object and the process exits non-zero.

use georange::cli;

fn main() {
    if let Err(e) = cli::run() {
        if cli::write_error(&e).is_err() {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}
