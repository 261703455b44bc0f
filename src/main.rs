//! roadie-user entry point
//!
//! Parses arguments, runs the command, prints any error to stderr and exits
//! non-zero. All logic lives in the `cli` module.

use roadie_user::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
