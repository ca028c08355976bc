use serde::{Deserialize, Serialize};

use crate::coding_system::is_missing;

/// A reviewer-curated coding record to be reconciled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputRecord {
    pub coding_system: Option<String>,
    pub code: Option<String>,
    pub term: String,
    pub concept_id: Option<String>,
}

impl InputRecord {
    /// Builds a record from raw cells; blank cells become `None`.
    pub fn from_cells(coding_system: &str, code: &str, term: &str, concept_id: &str) -> Self {
        Self {
            coding_system: non_blank(coding_system),
            code: non_blank(code),
            term: term.to_string(),
            concept_id: non_blank(concept_id),
        }
    }

    pub fn has_code(&self) -> bool {
        !is_missing(self.code.as_deref())
    }

    /// The concept id, unless absent, blank or the sentinel.
    pub fn concept(&self) -> Option<&str> {
        if is_missing(self.concept_id.as_deref()) {
            None
        } else {
            self.concept_id.as_deref().map(str::trim)
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_cells_maps_blanks_to_none() {
        let record = InputRecord::from_cells("ICD10CM", " ", "term", "");
        assert_eq!(record.coding_system.as_deref(), Some("ICD10CM"));
        assert!(record.code.is_none());
        assert!(record.concept_id.is_none());
        assert!(!record.has_code());
    }

    #[test]
    fn sentinel_code_and_concept_are_missing() {
        let record = InputRecord::from_cells("ICD10CM", "-", "term", "-");
        assert!(!record.has_code());
        assert_eq!(record.concept(), None);
    }
}
