//! The matching strategies of the validation cascade.

use cmap_model::Classification;
use cmap_normalize::{
    ROUNDED_SUFFIX, SNOMED_SIGNIFICANT_DIGITS, abbreviation_term_match, code_match, term_match,
};

use crate::strategy::{MatchContext, MatchOutcome, MatchStrategy};

/// Same coding system, code and term, restricted to the candidate concepts
/// when there are any. Best priority rank wins.
pub struct Exact;

impl MatchStrategy for Exact {
    fn classification(&self) -> Classification {
        Classification::Exact
    }

    fn try_match<'a>(&self, ctx: &MatchContext<'a>) -> Option<MatchOutcome<'a>> {
        let rows = ctx
            .index
            .rows_exact(ctx.coding_system, ctx.code, ctx.term, ctx.candidates);
        MatchOutcome::first_of(self.classification(), rows)
    }
}

/// Same code, term within edit distance.
pub struct ByCode;

impl MatchStrategy for ByCode {
    fn classification(&self) -> Classification {
        Classification::ByCode
    }

    fn try_match<'a>(&self, ctx: &MatchContext<'a>) -> Option<MatchOutcome<'a>> {
        ctx.by_code()
            .iter()
            .copied()
            .find(|row| term_match(&row.term, ctx.term))
            .map(|row| MatchOutcome::new(self.classification(), row))
    }
}

/// Same term (`ILIKE`), equivalent code.
pub struct ByName;

impl MatchStrategy for ByName {
    fn classification(&self) -> Classification {
        Classification::ByName
    }

    fn try_match<'a>(&self, ctx: &MatchContext<'a>) -> Option<MatchOutcome<'a>> {
        ctx.by_name()
            .iter()
            .copied()
            .find(|row| code_match(&row.code, ctx.code, ctx.coding_system))
            .map(|row| MatchOutcome::new(self.classification(), row))
    }
}

/// Same code, confirmed by another row of the table carrying the same
/// concept and term.
pub struct ByCodeEquivalent;

impl MatchStrategy for ByCodeEquivalent {
    fn classification(&self) -> Classification {
        Classification::ByCodeEquiv
    }

    fn try_match<'a>(&self, ctx: &MatchContext<'a>) -> Option<MatchOutcome<'a>> {
        ctx.by_code()
            .iter()
            .copied()
            .find(|row| ctx.index.has_equivalent(row))
            .map(|row| MatchOutcome::new(self.classification(), row))
    }
}

/// Same term, code replaced by the one of a candidate concept.
pub struct CodeByConcept;

impl MatchStrategy for CodeByConcept {
    fn classification(&self) -> Classification {
        Classification::CodeByCui
    }

    fn applies(&self, ctx: &MatchContext<'_>) -> bool {
        ctx.has_candidates()
    }

    fn try_match<'a>(&self, ctx: &MatchContext<'a>) -> Option<MatchOutcome<'a>> {
        let rows = ctx.by_name().iter().copied().filter(|row| ctx.is_candidate(row));
        MatchOutcome::first_of(self.classification(), rows)
    }
}

/// Same code, term replaced by the one of a candidate concept.
pub struct CodeNameByConcept;

impl MatchStrategy for CodeNameByConcept {
    fn classification(&self) -> Classification {
        Classification::CodeNameByCui
    }

    fn applies(&self, ctx: &MatchContext<'_>) -> bool {
        ctx.has_candidates()
    }

    fn try_match<'a>(&self, ctx: &MatchContext<'a>) -> Option<MatchOutcome<'a>> {
        let rows = ctx.by_code().iter().copied().filter(|row| ctx.is_candidate(row));
        MatchOutcome::first_of(self.classification(), rows)
    }
}

/// Same code, term matching token by token with abbreviations.
pub struct NameByCodeAbbreviation;

impl MatchStrategy for NameByCodeAbbreviation {
    fn classification(&self) -> Classification {
        Classification::NameByCodeAbbr
    }

    fn try_match<'a>(&self, ctx: &MatchContext<'a>) -> Option<MatchOutcome<'a>> {
        ctx.by_code()
            .iter()
            .copied()
            .find(|row| abbreviation_term_match(&row.term, ctx.term))
            .map(|row| MatchOutcome::new(self.classification(), row))
    }
}

/// A long code ending in the rounding suffix whose significant prefix
/// identifies exactly one concept in the coding system. The term is not
/// compared.
pub struct Rounding;

impl Rounding {
    fn prefix(code: &str) -> Option<&str> {
        if code.chars().count() <= SNOMED_SIGNIFICANT_DIGITS || !code.ends_with(ROUNDED_SUFFIX) {
            return None;
        }
        code.char_indices()
            .nth(SNOMED_SIGNIFICANT_DIGITS)
            .map(|(end, _)| &code[..end])
    }
}

impl MatchStrategy for Rounding {
    fn classification(&self) -> Classification {
        Classification::Rounding
    }

    fn applies(&self, ctx: &MatchContext<'_>) -> bool {
        Self::prefix(ctx.code).is_some()
    }

    fn try_match<'a>(&self, ctx: &MatchContext<'a>) -> Option<MatchOutcome<'a>> {
        let prefix = Self::prefix(ctx.code)?;
        let rows = ctx.index.rows_with_code_prefix(ctx.coding_system, prefix);
        let first = *rows.first()?;
        rows.iter()
            .all(|row| row.concept_id == first.concept_id)
            .then(|| MatchOutcome::new(self.classification(), first))
    }
}
