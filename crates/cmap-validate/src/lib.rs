//! Validation engine reconciling coded records with the terminology
//! reference.
//!
//! [`ValidationEngine`] runs the [`MatchCascade`] for each record, replaces
//! matches on ignored term types by the best alternative row of the same
//! code, and memoizes results per input record.

pub mod cache;
pub mod engine;
pub mod strategies;
pub mod strategy;

pub use cache::MemoCache;
pub use engine::ValidationEngine;
pub use strategy::{MatchCascade, MatchContext, MatchOutcome, MatchStrategy};
