use std::collections::BTreeMap;
use std::path::PathBuf;

use cmap_cli::pipeline::FileOutcome;
use cmap_model::{FieldChange, InputRecord, ValidationResult};
use serde::Serialize;

#[derive(Debug)]
pub struct DedupRun {
    pub output_dir: PathBuf,
    pub files: Vec<FileOutcome>,
    pub errors: Vec<String>,
}

impl DedupRun {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub input: InputRecord,
    pub result: ValidationResult,
    pub changes: Vec<FieldChange>,
}

#[derive(Debug)]
pub struct ReferenceInfo {
    pub reference: PathBuf,
    pub rows: usize,
    pub system_counts: BTreeMap<String, usize>,
    pub retired_concepts: usize,
    pub recognized: Vec<String>,
}
