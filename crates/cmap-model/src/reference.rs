//! Rows of the canonical terminology reference.

use serde::Serialize;

use crate::term_type::{PriorityRank, TermTypes};

/// One (coding system, code, term, concept) entry of the reference table.
///
/// The derived term-type flags are computed once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ReferenceRow {
    pub coding_system: String,
    pub code: String,
    pub term: String,
    pub concept_id: String,
    pub term_types: TermTypes,
    all_ignored: bool,
    any_ignored: bool,
    priority_rank: PriorityRank,
}

impl ReferenceRow {
    pub fn new(
        coding_system: impl Into<String>,
        code: impl Into<String>,
        term: impl Into<String>,
        concept_id: impl Into<String>,
        term_types: TermTypes,
    ) -> Self {
        Self {
            coding_system: coding_system.into(),
            code: code.into(),
            term: term.into(),
            concept_id: concept_id.into(),
            all_ignored: term_types.all_ignored(),
            any_ignored: term_types.any_ignored(),
            priority_rank: term_types.priority_rank(),
            term_types,
        }
    }

    pub fn all_ignored(&self) -> bool {
        self.all_ignored
    }

    pub fn any_ignored(&self) -> bool {
        self.any_ignored
    }

    pub fn priority_rank(&self) -> PriorityRank {
        self.priority_rank
    }
}
