//! Coding systems accepted by the validation engine.
//!
//! The recognized set is the UMLS vocabularies the reference table is built
//! from plus a few non-UMLS vocabularies merged in from external extracts.
//! Callers may append further non-UMLS systems at startup.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Reviewer placeholder meaning "no value".
pub const SENTINEL: &str = "-";

/// UMLS source abbreviations present in the merged reference table.
pub const UMLS_CODING_SYSTEMS: &[&str] = &[
    "ICD10",
    "ICD10CM",
    "ICD9CM",
    "ICPC",
    "ICPC2EENG",
    "ICPC2P",
    "MTHICD9",
    "RCD",
    "SCTSPA",
    "SNM",
    "SNOMEDCT_US",
];

/// Vocabularies merged into the reference table from outside the UMLS.
pub const NON_UMLS_CODING_SYSTEMS: &[&str] = &["ICD10DA", "MEDCODEID", "RCD2"];

/// Returns true when a raw field is absent, blank, or the sentinel.
pub fn is_missing(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None => true,
        Some(v) => v.is_empty() || v == SENTINEL,
    }
}

/// Coding-system families with their own code conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodingSystemFamily {
    /// SNOMED CT editions (numeric SCTIDs, up to 18 digits).
    Snomed,
    /// ICD revisions and national modifications (dotted codes).
    Icd,
    Other,
}

impl CodingSystemFamily {
    pub fn of(coding_system: &str) -> Self {
        match coding_system {
            "SNOMEDCT_US" | "SCTSPA" => Self::Snomed,
            s if s.starts_with("ICD") => Self::Icd,
            _ => Self::Other,
        }
    }
}

/// Set of coding systems for which validation is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingSystemSet {
    systems: BTreeSet<String>,
}

impl Default for CodingSystemSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CodingSystemSet {
    /// UMLS and built-in non-UMLS coding systems.
    pub fn builtin() -> Self {
        let systems = UMLS_CODING_SYSTEMS
            .iter()
            .chain(NON_UMLS_CODING_SYSTEMS)
            .map(|s| (*s).to_string())
            .collect();
        Self { systems }
    }

    /// Adds externally supplied coding systems to the set.
    #[must_use]
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for system in extra {
            self.insert(system);
        }
        self
    }

    pub fn insert(&mut self, system: impl Into<String>) {
        let system = system.into();
        let trimmed = system.trim();
        if !trimmed.is_empty() && trimmed != SENTINEL {
            self.systems.insert(trimmed.to_string());
        }
    }

    /// Whether `coding_system` (trimmed) is a recognized system.
    ///
    /// Blank values and the sentinel are never recognized.
    pub fn is_recognized(&self, coding_system: &str) -> bool {
        let trimmed = coding_system.trim();
        !trimmed.is_empty() && trimmed != SENTINEL && self.systems.contains(trimmed)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_contains_umls_and_non_umls() {
        let set = CodingSystemSet::builtin();
        assert!(set.is_recognized("ICD10CM"));
        assert!(set.is_recognized("SNOMEDCT_US"));
        assert!(set.is_recognized("ICD10DA"));
        assert!(set.is_recognized(" MEDCODEID "));
        assert_eq!(set.len(), 14);
    }

    #[test]
    fn sentinel_and_blank_are_not_recognized() {
        let set = CodingSystemSet::builtin().with_extra(["-", "  "]);
        assert!(!set.is_recognized("-"));
        assert!(!set.is_recognized(""));
        assert!(!set.is_recognized("   "));
        assert_eq!(set.len(), 14);
    }

    #[test]
    fn extra_systems_are_recognized() {
        let set = CodingSystemSet::builtin().with_extra(["READ_LOCAL"]);
        assert!(set.is_recognized("READ_LOCAL"));
        assert!(!set.is_recognized("MEDDRA"));
    }

    #[test]
    fn families() {
        assert_eq!(CodingSystemFamily::of("SCTSPA"), CodingSystemFamily::Snomed);
        assert_eq!(CodingSystemFamily::of("ICD10DA"), CodingSystemFamily::Icd);
        assert_eq!(CodingSystemFamily::of("MTHICD9"), CodingSystemFamily::Other);
        assert_eq!(CodingSystemFamily::of("RCD2"), CodingSystemFamily::Other);
    }

    #[test]
    fn missing_values() {
        assert!(is_missing(None));
        assert!(is_missing(Some("")));
        assert!(is_missing(Some(" - ")));
        assert!(!is_missing(Some("D68.4")));
    }
}
