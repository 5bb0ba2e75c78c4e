//! # noetic-judge
//!
//! The client for the external semantic judge: the arbiter a `=~=` goal
//! or a `has_attr`/`share_attr`/`differentia`/`similar_attr` built-in
//! defers truth to.
//!
//! The [`Judge`] trait is the seam: [`HttpJudge`] talks to a real service
//! over HTTP, [`FakeJudge`] returns canned answers for deterministic
//! tests, and [`EmbeddingJudge`] scores conceptual identity by cosine
//! similarity instead of asking a chat-completion endpoint. All three
//! implement the same failure contract: a judge never raises, it
//! degrades to "no".

pub mod client;
pub mod config;
pub mod embedding;
pub mod fake;
pub mod protocol;

pub use client::HttpJudge;
pub use config::JudgeConfig;
pub use embedding::{EmbeddingJudge, EmbeddingProvider};
pub use fake::FakeJudge;

use async_trait::async_trait;

/// The external semantic arbiter.
///
/// Every method already applies the similarity threshold and the failure
/// mapping: callers in `noetic-engine` never see a network error or a raw
/// score, only the boolean or string the built-in table expects.
#[async_trait(?Send)]
pub trait Judge {
    /// `L =~= R` and conceptual-identity queries in general: are `a` and
    /// `b` the same concept? Backs the semantic-match goal.
    async fn conceptually_identical(&self, a: &str, b: &str) -> bool;

    /// `has_attr(C, X)`: does `x` possess characteristic `c`?
    async fn has_attribute(&self, c: &str, x: &str) -> bool;

    /// `share_attr(C, X, Y)`: do `x` and `y` both possess `c`?
    async fn share_attribute(&self, c: &str, x: &str, y: &str) -> bool;

    /// `differentia(A, B, R)`: what distinguishes `a` from `b`? An empty
    /// string means the judge could not answer (the built-in fails on an
    /// empty result).
    async fn differentia(&self, a: &str, b: &str) -> String;

    /// `similar_attr(Axis, A, B)`: are `a` and `b` similar along `axis`,
    /// at or above the configured threshold?
    async fn similar_along_axis(&self, axis: &str, a: &str, b: &str) -> bool;
}
