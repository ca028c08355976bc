//! Batch deduplication of reviewer tables.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use cmap_ingest::{
    CodingSystemAliases, DedupRow, InputColumns, annotate, extract_records, output_path,
    read_input_table, write_table,
};
use cmap_model::{Classification, InputRecord, ValidationResult};
use cmap_validate::ValidationEngine;
use indicatif::ProgressBar;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::logging::redact_value;

/// Options shared by every file of a run.
#[derive(Debug, Clone)]
pub struct DedupOptions {
    /// Worker threads per file; at least one is used.
    pub jobs: usize,
    pub aliases: CodingSystemAliases,
}

impl Default for DedupOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            aliases: CodingSystemAliases::builtin(),
        }
    }
}

/// What happened to one input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub records: usize,
    pub counts: BTreeMap<Classification, usize>,
}

impl FileOutcome {
    pub fn count(&self, classification: Classification) -> usize {
        self.counts.get(&classification).copied().unwrap_or_default()
    }

    /// Records that ended with an accepted reference row.
    pub fn matched(&self) -> usize {
        self.counts
            .iter()
            .filter(|(classification, _)| !classification.is_none())
            .map(|(_, count)| count)
            .sum()
    }
}

/// Validates `records` on a pool of `jobs` rayon workers sharing `engine`.
///
/// Results keep the order of `records`.
pub fn validate_records(
    engine: &ValidationEngine,
    records: &[InputRecord],
    jobs: usize,
    progress: &ProgressBar,
) -> Result<Vec<Arc<ValidationResult>>> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()
        .context("build validation thread pool")?;
    Ok(pool.install(|| {
        records
            .par_iter()
            .map(|record| {
                let result = engine.categorize(record);
                trace!(
                    code = redact_value(record.code.as_deref().unwrap_or_default()),
                    term = redact_value(&record.term),
                    result = %result.classification,
                    "record validated"
                );
                progress.inc(1);
                result
            })
            .collect()
    }))
}

/// Classification counts of a batch of results.
pub fn count_classifications(results: &[Arc<ValidationResult>]) -> BTreeMap<Classification, usize> {
    let mut counts = BTreeMap::new();
    for result in results {
        *counts.entry(result.classification).or_insert(0) += 1;
    }
    counts
}

/// Reads `input`, validates every row and writes the annotated table to
/// `output_dir`.
pub fn process_file(
    engine: &ValidationEngine,
    input: &Path,
    output_dir: &Path,
    options: &DedupOptions,
    progress: &ProgressBar,
) -> Result<FileOutcome> {
    let start = Instant::now();
    let mut df = read_input_table(input)?;
    let columns = InputColumns::locate(&df, input)?;
    let records = extract_records(&df, &columns, &options.aliases)?;
    debug!(file = %input.display(), records = records.len(), "table read");

    progress.set_length(records.len() as u64);
    progress.set_position(0);
    let results = validate_records(engine, &records, options.jobs, progress)?;

    let rows: Vec<DedupRow> = records
        .iter()
        .zip(&results)
        .map(|(record, result)| DedupRow::new(record, result))
        .collect();
    annotate(&mut df, &rows)?;
    let output = output_path(input, output_dir);
    write_table(&mut df, &output)
        .with_context(|| format!("write {}", output.display()))?;

    let outcome = FileOutcome {
        input: input.to_path_buf(),
        output,
        records: records.len(),
        counts: count_classifications(&results),
    };
    info!(
        file = %input.display(),
        records = outcome.records,
        matched = outcome.matched(),
        cached = engine.cached_results(),
        duration_ms = start.elapsed().as_millis(),
        "file deduplicated"
    );
    Ok(outcome)
}
