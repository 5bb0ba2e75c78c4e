//! # noetic-term
//!
//! The term model, goal/clause/program data model, substitution, and
//! unification for the noetic logic language.
//!
//! This crate is deliberately ignorant of the knowledge base and the
//! resolution engine: it has no notion of a running query, a stream of
//! solutions, or the judge. Those live in `noetic-kb` and `noetic-engine`,
//! which depend on this crate rather than the other way around.

pub mod goal;
pub mod rename;
pub mod subst;
pub mod term;

pub use goal::{
    Clause, ConceptDecl, Declaration, EntityDecl, EqOp, Goal, Goals, PredicateHead, Program,
};
pub use rename::Renamer;
pub use subst::{deref, occurs, resolve, unify, FieldSource, NoFields, Substitution};
pub use term::Term;
