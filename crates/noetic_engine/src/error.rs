//! Resolution-time errors.
//!
//! Unification failure and predicate failure are *not* errors here — they
//! drive backtracking as ordinary control flow. A [`ResolutionError`] is
//! reserved for the handful of conditions that are genuinely unrecoverable
//! mid-proof: a `readln` target that isn't an unbound variable, and a
//! meta-call (`call/1`, or the goal argument of `findall`/`setof`/`bagof`)
//! whose target is neither a compound nor an atom. It aborts the current
//! query and surfaces to the driver.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionError {
    message: String,
}

impl ResolutionError {
    pub fn new(message: impl Into<String>) -> Self {
        ResolutionError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ResolutionError {}
