//! # noetic-base
//!
//! Shared, dependency-free plumbing for the noetic logic engine:
//!
//! - [`Interner`]/[`Symbol`] — string interning for O(1) equality
//! - [`Span`] — source location tracking
//! - [`SpannedError`]/[`Result`] — errors with source positions
//!
//! This crate has no knowledge of terms, goals, or resolution. It provides
//! only the generic infrastructure the rest of the workspace builds on.

pub mod error;
pub mod intern;
pub mod span;

pub use error::{Result, SpannedError};
pub use intern::{Interner, Symbol, SymbolEq};
pub use span::Span;
