//! The validation engine.

use std::sync::Arc;

use cmap_model::{
    COMMENT_NOT_UNIQUE, COMMENT_RETIRED_CONCEPT, Classification, CodingSystemSet, InputRecord,
    ValidationResult,
};
use cmap_reference::{ReferenceIndex, RetirementMap};
use tracing::trace;

use crate::cache::MemoCache;
use crate::strategy::{MatchCascade, MatchContext};

/// Classifies input records against an immutable reference snapshot.
///
/// The engine is `Sync`; batch workers share one instance and its memo
/// cache. Results for identical input tuples are the same `Arc`.
pub struct ValidationEngine {
    index: ReferenceIndex,
    retired: RetirementMap,
    coding_systems: CodingSystemSet,
    cascade: MatchCascade,
    results: MemoCache<InputRecord, ValidationResult>,
}

impl ValidationEngine {
    pub fn new(
        index: ReferenceIndex,
        retired: RetirementMap,
        coding_systems: CodingSystemSet,
    ) -> Self {
        Self {
            index,
            retired,
            coding_systems,
            cascade: MatchCascade::standard(),
            results: MemoCache::new(),
        }
    }

    pub fn index(&self) -> &ReferenceIndex {
        &self.index
    }

    pub fn retired(&self) -> &RetirementMap {
        &self.retired
    }

    pub fn coding_systems(&self) -> &CodingSystemSet {
        &self.coding_systems
    }

    /// Number of memoized categorizations.
    pub fn cached_results(&self) -> usize {
        self.results.len()
    }

    /// Drops all memoized categorizations.
    pub fn clear_cache(&self) {
        self.results.clear();
    }

    /// Validates one (coding system, code, term, concept) tuple.
    pub fn validate(
        &self,
        coding_system: Option<&str>,
        code: Option<&str>,
        term: &str,
        concept_id: Option<&str>,
    ) -> Arc<ValidationResult> {
        self.categorize(&InputRecord {
            coding_system: coding_system.map(str::to_string),
            code: code.map(str::to_string),
            term: term.to_string(),
            concept_id: concept_id.map(str::to_string),
        })
    }

    /// Validates one record, memoized on the full record.
    pub fn categorize(&self, record: &InputRecord) -> Arc<ValidationResult> {
        self.results.get_or_insert_with(record, || self.evaluate(record))
    }

    fn candidate_concepts(&self, concept: Option<&str>, comments: &mut Vec<String>) -> Vec<String> {
        let Some(concept) = concept else {
            return Vec::new();
        };
        match self.retired.replacements(concept) {
            Some(replacements) => {
                comments.push(COMMENT_RETIRED_CONCEPT.to_string());
                replacements.to_vec()
            }
            None => vec![concept.to_string()],
        }
    }

    fn evaluate(&self, record: &InputRecord) -> ValidationResult {
        let mut comments = Vec::new();
        let candidates = self.candidate_concepts(record.concept(), &mut comments);

        let code = match record.code.as_deref().map(str::trim) {
            Some(code) if record.has_code() => code,
            _ => {
                return ValidationResult::unmatched(Classification::NoneNoCode, candidates, comments);
            }
        };
        let coding_system = match record.coding_system.as_deref().map(str::trim) {
            Some(system) if self.coding_systems.is_recognized(system) => system,
            _ => {
                return ValidationResult::unmatched(
                    Classification::NoneNoCodingSystem,
                    candidates,
                    comments,
                );
            }
        };

        let ctx = MatchContext::new(&self.index, coding_system, code, &record.term, &candidates);
        let Some(outcome) = self.cascade.run(&ctx) else {
            trace!(classification = %Classification::NoMatch, "no strategy matched");
            return ValidationResult::unmatched(Classification::NoMatch, candidates, comments);
        };
        trace!(classification = %outcome.classification, "strategy matched");
        if outcome.not_unique {
            comments.push(COMMENT_NOT_UNIQUE.to_string());
        }

        let matched = outcome.row.clone();
        let mut result = ValidationResult::matched(
            outcome.classification,
            candidates,
            matched.clone(),
            comments,
        );
        if matched.all_ignored()
            && let Some(replacement) = self.index.unignore(
                &matched.coding_system,
                &matched.code,
                &result.candidate_concepts,
            )
        {
            trace!("ignored term type replaced");
            result.superseded_row = result.matched_row.replace(replacement.clone());
        }
        result
    }
}
