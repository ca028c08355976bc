//! Batch ingestion for coded-record reconciliation.
//!
//! Discovers reviewer tables in a directory, reads them as all-string
//! Polars DataFrames, turns rows into [`cmap_model::InputRecord`]s and
//! writes the tables back with the validation columns appended.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use cmap_ingest::{CodingSystemAliases, InputColumns, extract_records, list_input_files, read_input_table};
//!
//! for path in list_input_files(Path::new("aesi/"), None)? {
//!     let df = read_input_table(&path)?;
//!     let columns = InputColumns::locate(&df, &path)?;
//!     let records = extract_records(&df, &columns, &CodingSystemAliases::builtin())?;
//! }
//! ```

mod aliases;
mod discovery;
mod error;
mod output;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === Discovery ===
pub use discovery::{INDEX_FILE, list_input_files, output_path};

// === Reading ===
pub use aliases::CodingSystemAliases;
pub use reader::{
    CODE_COLUMN, CODING_SYSTEM_COLUMN, CONCEPT_COLUMN, InputColumns, REQUIRED_COLUMNS,
    TERM_COLUMN, extract_records, read_input_table,
};

// === Output ===
pub use output::{DEDUP_COLUMNS, DedupRow, annotate, write_table};
