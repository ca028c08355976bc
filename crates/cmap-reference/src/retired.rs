//! Retired concept identifiers and their replacements.

use std::collections::HashMap;

/// Mapping from a retired concept to its replacement concepts.
///
/// Replacements keep first-seen order without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetirementMap {
    replacements: HashMap<String, Vec<String>>,
}

impl RetirementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups (retired, replacement) pairs by retired concept. Pairs with a
    /// blank side are skipped.
    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        let mut map = Self::new();
        for (retired, replacement) in pairs {
            map.insert(retired, replacement);
        }
        map
    }

    pub fn insert(&mut self, retired: impl Into<String>, replacement: impl Into<String>) {
        let retired = retired.into();
        let replacement = replacement.into();
        let (retired, replacement) = (retired.trim(), replacement.trim());
        if retired.is_empty() || replacement.is_empty() {
            return;
        }
        let entry = self.replacements.entry(retired.to_string()).or_default();
        if !entry.iter().any(|r| r == replacement) {
            entry.push(replacement.to_string());
        }
    }

    /// Replacements of `concept_id`, or `None` if it is not retired.
    pub fn replacements(&self, concept_id: &str) -> Option<&[String]> {
        self.replacements.get(concept_id).map(Vec::as_slice)
    }

    pub fn is_retired(&self, concept_id: &str) -> bool {
        self.replacements.contains_key(concept_id)
    }

    /// Number of retired concepts.
    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }
}
