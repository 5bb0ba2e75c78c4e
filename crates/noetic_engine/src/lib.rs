//! # noetic-engine
//!
//! SLD resolution: the goal-solving loop, its
//! cut/negation/disjunction/if-then-else control constructs, and the
//! built-in predicate table.
//!
//! An async tree-walking evaluator threads a substitution through
//! recursive calls over the goal AST, generalized from "evaluate one
//! statement to one value" to "solve one goal to a lazy stream of
//! substitutions" — the difference backtracking search requires over a
//! deterministic language.

pub mod builtins;
pub mod engine;
pub mod error;
pub mod io;

pub use engine::{free_variables, Engine, Solution, SolutionStream};
pub use error::ResolutionError;
pub use io::{BufferSink, FixedInput, InputSource, OutputSink, StdinSource, StdoutSink};
