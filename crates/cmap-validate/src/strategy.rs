//! Match strategy trait and the ordered cascade running it.
//!
//! Each strategy inspects one input record against the reference index and
//! either accepts a reference row or passes. The cascade tries strategies in
//! order and the first acceptance wins.

use std::cell::OnceCell;

use cmap_model::{Classification, ReferenceRow};
use cmap_reference::ReferenceIndex;

use crate::strategies::{
    ByCode, ByCodeEquivalent, ByName, CodeByConcept, CodeNameByConcept, Exact,
    NameByCodeAbbreviation, Rounding,
};

/// Inputs of one cascade run.
///
/// The rows sharing the input's (coding system, code) and the rows whose
/// term matches the input term are looked up once and shared by all
/// strategies.
pub struct MatchContext<'a> {
    pub index: &'a ReferenceIndex,
    pub coding_system: &'a str,
    pub code: &'a str,
    pub term: &'a str,
    /// Concepts after retired-concept redirection; empty when none given.
    pub candidates: &'a [String],
    by_code: OnceCell<Vec<&'a ReferenceRow>>,
    by_name: OnceCell<Vec<&'a ReferenceRow>>,
}

impl<'a> MatchContext<'a> {
    pub fn new(
        index: &'a ReferenceIndex,
        coding_system: &'a str,
        code: &'a str,
        term: &'a str,
        candidates: &'a [String],
    ) -> Self {
        Self {
            index,
            coding_system,
            code,
            term,
            candidates,
            by_code: OnceCell::new(),
            by_name: OnceCell::new(),
        }
    }

    /// Rows with the input coding system and exactly the input code.
    pub fn by_code(&self) -> &[&'a ReferenceRow] {
        self.by_code
            .get_or_init(|| self.index.rows_by_code(self.coding_system, self.code))
    }

    /// Rows of the input coding system whose term is `ILIKE` the input term.
    pub fn by_name(&self) -> &[&'a ReferenceRow] {
        self.by_name
            .get_or_init(|| self.index.rows_by_name(self.coding_system, self.term))
    }

    pub fn has_candidates(&self) -> bool {
        !self.candidates.is_empty()
    }

    pub fn is_candidate(&self, row: &ReferenceRow) -> bool {
        self.candidates.contains(&row.concept_id)
    }
}

/// A reference row accepted by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome<'a> {
    pub classification: Classification,
    pub row: &'a ReferenceRow,
    /// Further rows were equally acceptable.
    pub not_unique: bool,
}

impl<'a> MatchOutcome<'a> {
    pub fn new(classification: Classification, row: &'a ReferenceRow) -> Self {
        Self {
            classification,
            row,
            not_unique: false,
        }
    }

    /// Accepts the first row and flags the outcome when a second one exists.
    pub fn first_of<I>(classification: Classification, rows: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a ReferenceRow>,
    {
        let mut rows = rows.into_iter();
        let row = rows.next()?;
        Some(Self {
            classification,
            row,
            not_unique: rows.next().is_some(),
        })
    }
}

/// One step of the cascade.
pub trait MatchStrategy: Send + Sync {
    /// Classification reported when this strategy accepts a row.
    fn classification(&self) -> Classification;

    fn try_match<'a>(&self, ctx: &MatchContext<'a>) -> Option<MatchOutcome<'a>>;

    /// Whether the strategy is attempted for this input.
    ///
    /// Default implementation always attempts it.
    fn applies(&self, _ctx: &MatchContext<'_>) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        self.classification().code()
    }
}

/// Ordered list of strategies; the first acceptance wins.
pub struct MatchCascade {
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl Default for MatchCascade {
    fn default() -> Self {
        Self::standard()
    }
}

impl MatchCascade {
    /// An empty cascade.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// The fixed cascade from EXACT to ROUNDING.
    pub fn standard() -> Self {
        Self::new()
            .add_strategy(Box::new(Exact))
            .add_strategy(Box::new(ByCode))
            .add_strategy(Box::new(ByName))
            .add_strategy(Box::new(ByCodeEquivalent))
            .add_strategy(Box::new(CodeByConcept))
            .add_strategy(Box::new(CodeNameByConcept))
            .add_strategy(Box::new(NameByCodeAbbreviation))
            .add_strategy(Box::new(Rounding))
    }

    #[must_use]
    pub fn add_strategy(mut self, strategy: Box<dyn MatchStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn run<'a>(&self, ctx: &MatchContext<'a>) -> Option<MatchOutcome<'a>> {
        self.strategies
            .iter()
            .filter(|strategy| strategy.applies(ctx))
            .find_map(|strategy| strategy.try_match(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_cascade_follows_precedence() {
        assert_eq!(
            MatchCascade::standard().names(),
            vec![
                "EXACT",
                "BY_CODE",
                "BY_NAME",
                "BY_CODE_EQUIV",
                "CODE_BY_CUI",
                "CODE_NAME_BY_CUI",
                "NAME_BY_CODE_ABBR",
                "ROUNDING",
            ]
        );
    }

    #[test]
    fn empty_cascade_matches_nothing() {
        let index = ReferenceIndex::default();
        let ctx = MatchContext::new(&index, "ICD10CM", "D68.4", "term", &[]);
        assert!(MatchCascade::new().run(&ctx).is_none());
    }
}
