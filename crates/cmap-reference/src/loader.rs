//! Loaders for the merged reference table and the retirement table.
//!
//! The reference table is a CSV file with the columns `cui`, `sab`, `code`,
//! `str` and `ttys` (comma-joined term types) in any order. The retirement
//! table is a UMLS `MRCUI` extract: pipe-delimited, no header, retired
//! concept in the first field and replacement in the sixth.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use cmap_model::{ReferenceRow, TermTypes};
use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::error::{ReferenceError, Result};
use crate::index::ReferenceIndex;
use crate::retired::RetirementMap;

/// Columns of the reference table.
pub const REFERENCE_COLUMNS: [&str; 5] = ["cui", "sab", "code", "str", "ttys"];

const RETIRED_CONCEPT_FIELD: usize = 0;
const REPLACEMENT_FIELD: usize = 5;

const IN_MEMORY: &str = "<memory>";

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| ReferenceError::io(path, source))
}

/// Loads the reference table from a CSV file.
pub fn load_reference(path: &Path) -> Result<ReferenceIndex> {
    let start = Instant::now();
    let index = read_reference(open(path)?, path)?;
    info!(
        path = %path.display(),
        rows = index.len(),
        coding_systems = index.system_counts().len(),
        duration_ms = start.elapsed().as_millis(),
        "reference table loaded"
    );
    Ok(index)
}

/// Reads the reference table from any reader.
pub fn reference_from_reader<R: Read>(reader: R) -> Result<ReferenceIndex> {
    read_reference(reader, Path::new(IN_MEMORY))
}

fn read_reference<R: Read>(reader: R, path: &Path) -> Result<ReferenceIndex> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|err| ReferenceError::csv(path, &err))?
        .clone();
    let mut positions = [0usize; REFERENCE_COLUMNS.len()];
    for (slot, column) in positions.iter_mut().zip(REFERENCE_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim_matches('\u{feff}').trim().eq_ignore_ascii_case(column))
            .ok_or_else(|| ReferenceError::MissingColumn {
                column: column.to_string(),
                path: path.to_path_buf(),
            })?;
    }
    let [cui, sab, code, term, ttys] = positions;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| ReferenceError::csv(path, &err))?;
        let field = |idx: usize| record.get(idx).unwrap_or_default().trim();
        rows.push(ReferenceRow::new(
            field(sab),
            field(code),
            field(term),
            field(cui),
            TermTypes::parse(field(ttys)),
        ));
    }
    debug!(path = %path.display(), rows = rows.len(), "reference rows parsed");
    Ok(ReferenceIndex::new(rows))
}

/// Loads the retirement table from an `MRCUI` file.
pub fn load_retired(path: &Path) -> Result<RetirementMap> {
    let start = Instant::now();
    let map = read_retired(open(path)?, path)?;
    info!(
        path = %path.display(),
        retired_concepts = map.len(),
        duration_ms = start.elapsed().as_millis(),
        "retirement table loaded"
    );
    Ok(map)
}

/// Reads an `MRCUI` extract from any reader.
pub fn retired_from_reader<R: Read>(reader: R) -> Result<RetirementMap> {
    read_retired(reader, Path::new(IN_MEMORY))
}

fn read_retired<R: Read>(reader: R, path: &Path) -> Result<RetirementMap> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'|')
        .quoting(false)
        .flexible(true)
        .from_reader(reader);
    let mut map = RetirementMap::new();
    for record in reader.records() {
        let record = record.map_err(|err| ReferenceError::csv(path, &err))?;
        let line = record.position().map_or(0, csv::Position::line);
        let (Some(retired), Some(replacement)) = (
            record.get(RETIRED_CONCEPT_FIELD),
            record.get(REPLACEMENT_FIELD),
        ) else {
            return Err(ReferenceError::RetiredLine {
                path: path.to_path_buf(),
                line,
                message: format!("expected at least {} fields, found {}", REPLACEMENT_FIELD + 1, record.len()),
            });
        };
        map.insert(retired, replacement);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_columns_are_located_by_name() {
        let data = "\u{feff}sab,CODE,str,ttys,cui\n\
                    ICD10CM,D68.4,Acquired coagulation factor deficiency,\"PT,AB\",C0001169\n";
        let index = reference_from_reader(data.as_bytes()).expect("parse reference");
        let row = &index.rows()[0];
        assert_eq!(row.coding_system, "ICD10CM");
        assert_eq!(row.concept_id, "C0001169");
        assert_eq!(row.term_types.joined(), "AB,PT");
    }

    #[test]
    fn missing_column_is_reported() {
        let err = reference_from_reader("cui,sab,code,str\n".as_bytes())
            .expect_err("ttys column missing");
        assert!(matches!(err, ReferenceError::MissingColumn { ref column, .. } if column == "ttys"));
    }

    #[test]
    fn retired_lines_skip_empty_replacements() {
        let data = "C0000001|2023AA|RO|||C0000002|Y|\n\
                    C0000001|2023AA|RO|||C0000003|Y|\n\
                    C0000004|2023AA|DEL|||||\n";
        let map = retired_from_reader(data.as_bytes()).expect("parse retired");
        assert_eq!(map.replacements("C0000001").map(<[String]>::len), Some(2));
        assert!(!map.is_retired("C0000004"));
    }

    #[test]
    fn short_retired_line_is_an_error() {
        let err = retired_from_reader("C0000001|2023AA|RO\n".as_bytes()).expect_err("short line");
        assert!(matches!(err, ReferenceError::RetiredLine { line: 1, .. }));
    }
}
