//! Annotated output tables.
//!
//! Each input row gains the `dedup_*` columns describing its validation
//! result; unset values are written as `-`.

use std::fs::File;
use std::path::Path;

use cmap_model::{InputRecord, SENTINEL, ValidationResult};
use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Columns appended to every input table, in output order.
pub const DEDUP_COLUMNS: [&str; 9] = [
    "dedup_result",
    "dedup_comments",
    "dedup_code",
    "dedup_str",
    "dedup_sab",
    "dedup_cui",
    "dedup_ttys",
    "dedup_ignore",
    "dedup_changes",
];

/// Output cells for one validated record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupRow {
    pub result: String,
    pub comments: String,
    pub code: String,
    pub term: String,
    pub coding_system: String,
    pub concept: String,
    pub term_types: String,
    pub ignore: String,
    pub changes: String,
}

fn or_unset(value: String) -> String {
    if value.is_empty() {
        SENTINEL.to_string()
    } else {
        value
    }
}

impl DedupRow {
    pub fn new(record: &InputRecord, result: &ValidationResult) -> Self {
        let unset = || SENTINEL.to_string();
        let comments = or_unset(result.comments.join("\n"));
        let changes = result
            .changes(record)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let changes = or_unset(changes);
        match &result.matched_row {
            Some(row) => Self {
                result: result.classification.code().to_string(),
                comments,
                code: row.code.clone(),
                term: row.term.clone(),
                coding_system: row.coding_system.clone(),
                concept: row.concept_id.clone(),
                term_types: or_unset(row.term_types.joined()),
                ignore: row.all_ignored().to_string(),
                changes,
            },
            None => Self {
                result: result.classification.code().to_string(),
                comments,
                code: unset(),
                term: unset(),
                coding_system: unset(),
                concept: unset(),
                term_types: unset(),
                ignore: unset(),
                changes,
            },
        }
    }

    fn cells(&self) -> [&str; 9] {
        [
            &self.result,
            &self.comments,
            &self.code,
            &self.term,
            &self.coding_system,
            &self.concept,
            &self.term_types,
            &self.ignore,
            &self.changes,
        ]
    }
}

/// Appends (or replaces) the `dedup_*` columns of `df`.
pub fn annotate(df: &mut DataFrame, rows: &[DedupRow]) -> Result<()> {
    if rows.len() != df.height() {
        return Err(IngestError::ResultCount {
            expected: df.height(),
            actual: rows.len(),
        });
    }
    for (idx, name) in DEDUP_COLUMNS.iter().enumerate() {
        let values: Vec<&str> = rows.iter().map(|row| row.cells()[idx]).collect();
        df.with_column(Column::new((*name).into(), values))?;
    }
    Ok(())
}

/// Writes `df` as a CSV file with a header row.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|e| IngestError::CsvWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmap_model::{COMMENT_RETIRED_CONCEPT, Classification, ReferenceRow, TermTypes};

    #[test]
    fn test_unmatched_row_is_unset() {
        let record = InputRecord::from_cells("ICD10CM", "Z99.9", "Unknown", "");
        let result = ValidationResult::unmatched(Classification::NoMatch, Vec::new(), Vec::new());
        let row = DedupRow::new(&record, &result);
        assert_eq!(row.result, "NONE");
        assert!(row.cells()[1..].iter().all(|cell| *cell == "-"));
    }

    #[test]
    fn test_matched_row_cells() {
        let record = InputRecord::from_cells("ICD10", "D68", "Von Willebrand's disease", "C0000099");
        let result = ValidationResult::matched(
            Classification::ByName,
            vec!["C0042974".to_string()],
            ReferenceRow::new(
                "ICD10",
                "D68.0",
                "Von Willebrand's disease",
                "C0042974",
                TermTypes::parse("SY,PT"),
            ),
            vec![COMMENT_RETIRED_CONCEPT.to_string(), "not unique".to_string()],
        );
        let row = DedupRow::new(&record, &result);
        assert_eq!(row.comments, "updated retired concept\nnot unique");
        assert_eq!(row.term_types, "PT,SY");
        assert_eq!(row.ignore, "false");
        assert_eq!(row.changes, "code from D68, cui from C0000099");
    }

    #[test]
    fn test_annotate_checks_height() {
        let mut df = df!("sab" => ["ICD10CM", "ICD10"]).unwrap();
        let err = annotate(&mut df, &[]).unwrap_err();
        assert!(matches!(err, IngestError::ResultCount { expected: 2, actual: 0 }));
    }
}
