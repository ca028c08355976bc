use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use cmap_cli::config::{REFERENCE_ENV, RunConfig};
use cmap_cli::pipeline::{DedupOptions, process_file};
use cmap_ingest::list_input_files;
use cmap_model::InputRecord;
use cmap_reference::{RetirementMap, load_reference, load_retired};
use cmap_validate::ValidationEngine;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span, warn};

use crate::cli::{CheckArgs, DedupArgs, ReferenceArgs};
use crate::types::{CheckReport, DedupRun, ReferenceInfo};

fn load_engine(args: &ReferenceArgs, config: &RunConfig) -> Result<ValidationEngine> {
    let reference = config
        .reference_path(args.reference.as_deref())
        .ok_or_else(|| {
            anyhow!("no reference table: pass --reference, set `reference` in the config or {REFERENCE_ENV}")
        })?;
    let start = Instant::now();
    let index = load_reference(&reference)
        .with_context(|| format!("load reference {}", reference.display()))?;
    let retired = match config.retired_path(args.retired.as_deref()) {
        Some(path) => {
            load_retired(&path).with_context(|| format!("load retired {}", path.display()))?
        }
        None => {
            warn!("no retired concept table given, retired concepts are not redirected");
            RetirementMap::new()
        }
    };
    info!(
        reference_rows = index.len(),
        retired_concepts = retired.len(),
        duration_ms = start.elapsed().as_millis(),
        "reference loaded"
    );
    Ok(ValidationEngine::new(index, retired, config.coding_systems()))
}

fn file_progress(total_files: usize) -> ProgressBar {
    let progress = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} {prefix:.bold} [{elapsed_precise}] [{bar:32.cyan/blue}] \
{pos}/{len} ({percent}%) {per_sec} {msg}",
    ) {
        progress.set_style(style.progress_chars("=> "));
    }
    progress.set_message(format!("{total_files} tables"));
    progress.enable_steady_tick(Duration::from_millis(250));
    progress
}

pub fn run_dedup(args: &DedupArgs, config_path: Option<&Path>) -> Result<DedupRun> {
    let config = RunConfig::load_optional(config_path)?;
    let engine = load_engine(&args.reference, &config)?;
    let files = list_input_files(&args.input_dir, args.max)?;
    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("create {}", args.output_dir.display()))?;

    let options = DedupOptions {
        jobs: args.jobs,
        aliases: config.aliases(),
    };
    let run_start = Instant::now();
    let progress = file_progress(files.len());
    let mut run = DedupRun {
        output_dir: args.output_dir.clone(),
        files: Vec::new(),
        errors: Vec::new(),
    };
    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let span = info_span!("dedup", file = %name);
        let _guard = span.enter();
        progress.set_prefix(name.clone());
        match process_file(&engine, path, &args.output_dir, &options, &progress) {
            Ok(outcome) => run.files.push(outcome),
            Err(error) => {
                warn!(error = %error, "table skipped");
                run.errors.push(format!("{name}: {error:#}"));
            }
        }
    }
    progress.finish_and_clear();
    info!(
        files = run.files.len(),
        failed = run.errors.len(),
        cached = engine.cached_results(),
        duration_ms = run_start.elapsed().as_millis(),
        "dedup complete"
    );
    Ok(run)
}

pub fn run_check(args: &CheckArgs, config_path: Option<&Path>) -> Result<CheckReport> {
    let config = RunConfig::load_optional(config_path)?;
    let engine = load_engine(&args.reference, &config)?;
    let aliases = config.aliases();
    let input = InputRecord::from_cells(
        aliases.resolve(args.coding_system.as_deref().unwrap_or_default()),
        args.code.as_deref().unwrap_or_default(),
        &args.term,
        args.concept.as_deref().unwrap_or_default(),
    );
    let result = engine.categorize(&input);
    Ok(CheckReport {
        changes: result.changes(&input),
        result: (*result).clone(),
        input,
    })
}

pub fn run_info(args: &ReferenceArgs, config_path: Option<&Path>) -> Result<ReferenceInfo> {
    let config = RunConfig::load_optional(config_path)?;
    let reference = config
        .reference_path(args.reference.as_deref())
        .unwrap_or_default();
    let engine = load_engine(args, &config)?;
    let index = engine.index();
    Ok(ReferenceInfo {
        reference,
        rows: index.len(),
        system_counts: index
            .system_counts()
            .into_iter()
            .map(|(system, count)| (system.to_string(), count))
            .collect(),
        retired_concepts: engine.retired().len(),
        recognized: engine.coding_systems().iter().map(str::to_string).collect(),
    })
}
