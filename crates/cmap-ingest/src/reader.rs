//! Reading reviewer tables into input records.

use std::path::Path;

use cmap_model::InputRecord;
use polars::prelude::*;

use crate::aliases::CodingSystemAliases;
use crate::error::{IngestError, Result};

pub const CODING_SYSTEM_COLUMN: &str = "sab";
pub const CODE_COLUMN: &str = "code";
pub const TERM_COLUMN: &str = "str";
pub const CONCEPT_COLUMN: &str = "cui";

/// Columns every input table must carry (matched case-insensitively).
pub const REQUIRED_COLUMNS: [&str; 4] = [
    CODING_SYSTEM_COLUMN,
    CODE_COLUMN,
    TERM_COLUMN,
    CONCEPT_COLUMN,
];

/// Reads a CSV file with every column as a string.
pub fn read_input_table(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Actual names of the required columns in one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputColumns {
    pub coding_system: String,
    pub code: String,
    pub term: String,
    pub concept: String,
}

impl InputColumns {
    pub fn locate(df: &DataFrame, path: &Path) -> Result<Self> {
        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        let find = |column: &str| {
            names
                .iter()
                .find(|name| name.trim_matches('\u{feff}').trim().eq_ignore_ascii_case(column))
                .cloned()
                .ok_or_else(|| IngestError::MissingColumn {
                    column: column.to_string(),
                    path: path.to_path_buf(),
                })
        };
        Ok(Self {
            coding_system: find(CODING_SYSTEM_COLUMN)?,
            code: find(CODE_COLUMN)?,
            term: find(TERM_COLUMN)?,
            concept: find(CONCEPT_COLUMN)?,
        })
    }
}

fn cell(values: &StringChunked, idx: usize) -> &str {
    values.get(idx).unwrap_or_default().trim()
}

/// Builds one trimmed record per table row, resolving coding-system aliases.
pub fn extract_records(
    df: &DataFrame,
    columns: &InputColumns,
    aliases: &CodingSystemAliases,
) -> Result<Vec<InputRecord>> {
    let coding_system = df.column(&columns.coding_system)?.str()?;
    let code = df.column(&columns.code)?.str()?;
    let term = df.column(&columns.term)?.str()?;
    let concept = df.column(&columns.concept)?.str()?;

    Ok((0..df.height())
        .map(|idx| {
            InputRecord::from_cells(
                aliases.resolve(cell(coding_system, idx)),
                cell(code, idx),
                cell(term, idx),
                cell(concept, idx),
            )
        })
        .collect())
}
