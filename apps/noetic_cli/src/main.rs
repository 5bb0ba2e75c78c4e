//! `noetic` — standalone binary entry point.
//!
//! A thin wrapper around [`noetic_cli::run_cli`]: all command logic lives
//! in the library crate so it stays testable without a process boundary.

#[tokio::main]
async fn main() {
    if let Err(e) = noetic_cli::run_cli().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
