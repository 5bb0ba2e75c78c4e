//! # noetic-cli
//!
//! Command-line driver for the noetic logic engine.
//!
//! `noetic <file>` runs a program in batch mode: every declaration
//! populates the knowledge base in program order, then every query runs
//! in program order, printing `Bindings:` sections and a `True`/`False`
//! terminator per query. `noetic` with no file starts an interactive
//! reader instead.
//!
//! # Module structure
//!
//! - [`cli`] — argument parsing and mode dispatch
//! - [`driver`] — parses a program, loads it, runs its queries, prints
//!   their solutions
//! - [`repl`] — the interactive reader
//! - [`manifest`] — optional `noetic.toml` project configuration

pub mod cli;
pub mod driver;
pub mod manifest;
pub mod repl;

pub use cli::run_cli;
