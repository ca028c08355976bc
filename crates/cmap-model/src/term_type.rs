//! Term-type tags and the priority rank derived from them.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag marking the preferred term of a code.
pub const PREFERRED_TERM: &str = "PT";

/// Term types that do not count as meaningful matches (obsolete, entry,
/// lower-level and abbreviated forms).
pub const IGNORED_TERM_TYPES: &[&str] = &[
    "AA", "AD", "AM", "AS", "AT", "CE", "EP", "ES", "ET", "ETAL", "ETCF", "ETCLIN", "EX", "GT",
    "IS", "IT", "LLT", "LLTJKN", "LLTJKN1", "LO", "MP", "MTH_ET", "MTH_IS", "MTH_LLT", "MTH_LO",
    "MTH_OAF", "MTH_OAP", "MTH_OAS", "MTH_OET", "MTH_OF", "MTH_OL", "MTH_OP", "MTH_OPN", "OA",
    "OAF", "OAM", "OAP", "OAS", "OET", "OF", "OL", "OLC", "OLG", "OLJKN", "OLJKN1", "OM", "ONP",
    "OOSN", "OP", "OPN", "PCE", "PEP", "PHENO_ET", "PQ", "PXQ", "SCALE", "TQ", "XQ",
];

/// Abbreviation, acronym and short-form term types.
pub const ADMINISTRATIVE_TERM_TYPES: &[&str] = &[
    "AA", "AB", "ACR", "AM", "CA2", "CA3", "CDA", "CS", "DEV", "DS", "DSV", "ES", "HS", "ID",
    "MTH_ACR", "NS", "OA", "OAM", "OSN", "PS", "QAP", "QEV", "RAB", "SS", "SSN", "VAB",
];

fn is_ignored(tag: &str) -> bool {
    IGNORED_TERM_TYPES.contains(&tag)
}

fn is_administrative(tag: &str) -> bool {
    ADMINISTRATIVE_TERM_TYPES.contains(&tag)
}

/// Preference order of a reference row; lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriorityRank {
    Preferred = 1,
    Regular = 2,
    Administrative = 3,
    Ignored = 4,
}

impl PriorityRank {
    pub const fn value(self) -> u8 {
        self as u8
    }
}

/// The set of term-type tags attached to one reference row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermTypes(BTreeSet<String>);

impl TermTypes {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            tags.into_iter()
                .map(|t| {
                    let tag: String = t.into();
                    tag.trim().to_string()
                })
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    /// Parses a comma-joined tag list such as `"PT,SY"`.
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every tag is ignorable. An empty set is not.
    pub fn all_ignored(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|t| is_ignored(t))
    }

    pub fn any_ignored(&self) -> bool {
        self.0.iter().any(|t| is_ignored(t))
    }

    pub fn priority_rank(&self) -> PriorityRank {
        if self.contains(PREFERRED_TERM) {
            PriorityRank::Preferred
        } else if self.all_ignored() {
            PriorityRank::Ignored
        } else if !self.0.is_empty() && self.0.iter().all(|t| is_administrative(t)) {
            PriorityRank::Administrative
        } else {
            PriorityRank::Regular
        }
    }

    /// Sorted, comma-joined form.
    pub fn joined(&self) -> String {
        self.0.iter().cloned().collect::<Vec<_>>().join(",")
    }
}

impl fmt::Display for TermTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}
