//! Short coding-system names used in reviewer spreadsheets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maps a reviewer shorthand to the coding system it stands for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodingSystemAliases(BTreeMap<String, String>);

impl CodingSystemAliases {
    /// `e` for SNOMED CT US and `p` for CPRD medcode ids.
    pub fn builtin() -> Self {
        Self::default()
            .with("e", "SNOMEDCT_US")
            .with("p", "MEDCODEID")
    }

    #[must_use]
    pub fn with(mut self, alias: impl Into<String>, coding_system: impl Into<String>) -> Self {
        self.insert(alias, coding_system);
        self
    }

    pub fn insert(&mut self, alias: impl Into<String>, coding_system: impl Into<String>) {
        let alias = alias.into();
        let alias = alias.trim();
        if !alias.is_empty() {
            self.0.insert(alias.to_string(), coding_system.into());
        }
    }

    /// Later entries override earlier ones.
    pub fn extend(&mut self, other: &CodingSystemAliases) {
        for (alias, system) in &other.0 {
            self.insert(alias.clone(), system.clone());
        }
    }

    /// The coding system `value` stands for, or `value` itself.
    pub fn resolve<'a>(&'a self, value: &'a str) -> &'a str {
        self.0.get(value.trim()).map_or(value, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
