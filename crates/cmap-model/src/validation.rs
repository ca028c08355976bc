//! Validation outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::InputRecord;
use crate::reference::ReferenceRow;

/// Comment added when the input concept was retired and replaced.
pub const COMMENT_RETIRED_CONCEPT: &str = "updated retired concept";

/// Comment added when several equally good rows matched.
pub const COMMENT_NOT_UNIQUE: &str = "not unique";

/// How an input record was matched, in cascade precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    /// Code is missing or the sentinel.
    NoneNoCode,
    /// Coding system is missing or not recognized.
    NoneNoCodingSystem,
    Exact,
    ByCode,
    ByName,
    ByCodeEquiv,
    CodeByCui,
    CodeNameByCui,
    NameByCodeAbbr,
    Rounding,
    #[serde(rename = "NONE")]
    NoMatch,
}

impl Classification {
    pub const ALL: [Classification; 11] = [
        Self::NoneNoCode,
        Self::NoneNoCodingSystem,
        Self::Exact,
        Self::ByCode,
        Self::ByName,
        Self::ByCodeEquiv,
        Self::CodeByCui,
        Self::CodeNameByCui,
        Self::NameByCodeAbbr,
        Self::Rounding,
        Self::NoMatch,
    ];

    /// Machine-readable code as written to reports.
    pub const fn code(self) -> &'static str {
        match self {
            Self::NoneNoCode => "NONE_NO_CODE",
            Self::NoneNoCodingSystem => "NONE_NO_CODING_SYSTEM",
            Self::Exact => "EXACT",
            Self::ByCode => "BY_CODE",
            Self::ByName => "BY_NAME",
            Self::ByCodeEquiv => "BY_CODE_EQUIV",
            Self::CodeByCui => "CODE_BY_CUI",
            Self::CodeNameByCui => "CODE_NAME_BY_CUI",
            Self::NameByCodeAbbr => "NAME_BY_CODE_ABBR",
            Self::Rounding => "ROUNDING",
            Self::NoMatch => "NONE",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::NoneNoCode => "no code",
            Self::NoneNoCodingSystem => "unknown coding system or free text",
            Self::Exact => "exact match",
            Self::ByCode => "code name by code",
            Self::ByName => "code by code name",
            Self::ByCodeEquiv => "code name by equivalent code",
            Self::CodeByCui => "code by concept",
            Self::CodeNameByCui => "code name by concept",
            Self::NameByCodeAbbr => "abbr code name by code",
            Self::Rounding => "code by rounded code",
            Self::NoMatch => "no matching code found",
        }
    }

    /// True for the classifications that carry no match.
    pub const fn is_none(self) -> bool {
        matches!(
            self,
            Self::NoneNoCode | Self::NoneNoCodingSystem | Self::NoMatch
        )
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A field the accepted match changes relative to the input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum FieldChange {
    Code { from: String, to: String },
    Term { from: String, to: String },
    CodingSystem { from: String, to: String },
    Concept { from: String, to: String },
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code { from, .. } => write!(f, "code from {from}"),
            Self::Term { from, .. } => write!(f, "code name from {from}"),
            Self::CodingSystem { from, .. } => write!(f, "coding system from {from}"),
            Self::Concept { from, .. } => write!(f, "cui from {from}"),
        }
    }
}

/// Outcome of validating one input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub classification: Classification,
    /// Concepts the input refers to, after retired-concept redirection.
    pub candidate_concepts: Vec<String>,
    /// The accepted reference row.
    pub matched_row: Option<ReferenceRow>,
    /// The ignored-term-type row that `matched_row` replaced, if any.
    pub superseded_row: Option<ReferenceRow>,
    pub comments: Vec<String>,
}

impl ValidationResult {
    pub fn unmatched(
        classification: Classification,
        candidate_concepts: Vec<String>,
        comments: Vec<String>,
    ) -> Self {
        Self {
            classification,
            candidate_concepts,
            matched_row: None,
            superseded_row: None,
            comments,
        }
    }

    pub fn matched(
        classification: Classification,
        candidate_concepts: Vec<String>,
        row: ReferenceRow,
        comments: Vec<String>,
    ) -> Self {
        Self {
            classification,
            candidate_concepts,
            matched_row: Some(row),
            superseded_row: None,
            comments,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.matched_row.is_some()
    }

    /// Fields of `input` that the accepted match corrects.
    pub fn changes(&self, input: &InputRecord) -> Vec<FieldChange> {
        let Some(row) = &self.matched_row else {
            return Vec::new();
        };
        let mut changes = Vec::new();
        let code = input.code.as_deref().unwrap_or_default();
        if row.code != code {
            changes.push(FieldChange::Code {
                from: code.to_string(),
                to: row.code.clone(),
            });
        }
        if row.term.to_lowercase() != input.term.to_lowercase() {
            changes.push(FieldChange::Term {
                from: input.term.clone(),
                to: row.term.clone(),
            });
        }
        let coding_system = input.coding_system.as_deref().unwrap_or_default();
        if row.coding_system != coding_system {
            changes.push(FieldChange::CodingSystem {
                from: coding_system.to_string(),
                to: row.coding_system.clone(),
            });
        }
        if let Some(concept) = input.concept()
            && row.concept_id != concept
        {
            changes.push(FieldChange::Concept {
                from: concept.to_string(),
                to: row.concept_id.clone(),
            });
        }
        changes
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.classification)?;
        if let Some(row) = &self.matched_row {
            write!(
                f,
                " - {} - {} - {} - {}",
                row.concept_id, row.code, row.term, row.coding_system
            )?;
        }
        if !self.candidate_concepts.is_empty() {
            write!(f, " - {}", self.candidate_concepts.join(","))?;
        }
        if !self.comments.is_empty() {
            write!(f, " - ({})", self.comments.join(", "))?;
        }
        Ok(())
    }
}
