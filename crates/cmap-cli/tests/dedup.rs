//! Integration tests for batch deduplication.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use cmap_cli::config::RunConfig;
use cmap_cli::pipeline::{DedupOptions, process_file, validate_records};
use cmap_ingest::read_input_table;
use cmap_model::{Classification, InputRecord};
use cmap_reference::{load_reference, retired_from_reader};
use cmap_validate::ValidationEngine;
use indicatif::ProgressBar;
use tempfile::TempDir;

const REFERENCE: &str = "\
cui,sab,code,str,ttys
C0001169,ICD10CM,D68.4,Acquired coagulation factor deficiency,PT
C0042974,ICD10,D68.0,Von Willebrand's disease,PT
C2349596,SNOMEDCT_US,10752381000119101,Fetal thrombocytopenia,PT
";

const RETIRED: &str = "C0000099|2024AA|RO|||C0001169|Y|\n";

const BLEEDING: &str = "\
sab,code,str,cui,reviewer
ICD10CM,D68.4,Acquired coagulation factor deficiency,C0000099,AB
ICD10,D68,von willebrand's disease,,AB
e,10752381000119101,Fetal thrombocytopenia,C2349596,CD
-,-,Bleeding tendency,,CD
XYZ,123,Something else,,CD
";

fn engine(dir: &Path, config: &RunConfig) -> ValidationEngine {
    let reference = dir.join("reference.csv");
    fs::write(&reference, REFERENCE).unwrap();
    let index = load_reference(&reference).unwrap();
    let retired = retired_from_reader(RETIRED.as_bytes()).unwrap();
    ValidationEngine::new(index, retired, config.coding_systems())
}

fn column(path: &Path, name: &str) -> Vec<String> {
    let df = read_input_table(path).unwrap();
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect()
}

#[test]
fn annotated_table_is_written_with_counts() {
    let dir = TempDir::new().unwrap();
    let input_dir = dir.path().join("in");
    let output_dir = dir.path().join("out");
    fs::create_dir_all(&input_dir).unwrap();
    fs::create_dir_all(&output_dir).unwrap();
    let input = input_dir.join("bleeding.csv");
    fs::write(&input, BLEEDING).unwrap();

    let config = RunConfig::default();
    let engine = engine(dir.path(), &config);
    let options = DedupOptions {
        jobs: 2,
        aliases: config.aliases(),
    };
    let outcome = process_file(
        &engine,
        &input,
        &output_dir,
        &options,
        &ProgressBar::hidden(),
    )
    .unwrap();

    assert_eq!(outcome.output, output_dir.join("bleeding.csv"));
    assert_eq!(outcome.records, 5);
    assert_eq!(outcome.count(Classification::Exact), 2);
    assert_eq!(outcome.matched(), 3);

    let results = column(&outcome.output, "dedup_result").join(",");
    insta::assert_snapshot!(results, @"EXACT,BY_NAME,EXACT,NONE_NO_CODE,NONE_NO_CODING_SYSTEM");

    let changes = column(&outcome.output, "dedup_changes");
    assert_eq!(changes[0], "cui from C0000099");
    assert_eq!(changes[1], "code from D68");
    assert_eq!(changes[2], "-");
    assert_eq!(changes[3], "-");

    let comments = column(&outcome.output, "dedup_comments");
    assert_eq!(comments[0], "updated retired concept");
    assert_eq!(column(&outcome.output, "reviewer")[4], "CD");
}

#[test]
fn missing_required_column_fails_the_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.csv");
    fs::write(&input, "sab,code,str\nICD10,D68.0,Von Willebrand's disease\n").unwrap();
    let engine = engine(dir.path(), &RunConfig::default());

    let err = process_file(
        &engine,
        &input,
        dir.path(),
        &DedupOptions::default(),
        &ProgressBar::hidden(),
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("cui"));
}

#[test]
fn parallel_validation_keeps_record_order() {
    let dir = TempDir::new().unwrap();
    let engine = engine(dir.path(), &RunConfig::default());
    let records: Vec<InputRecord> = (0..40)
        .map(|i| match i % 3 {
            0 => InputRecord::from_cells(
                "ICD10CM",
                "D68.4",
                "Acquired coagulation factor deficiency",
                "",
            ),
            1 => InputRecord::from_cells("ICD10", &format!("Z{i}"), "Unknown", ""),
            _ => InputRecord::from_cells("", "", "free text", ""),
        })
        .collect();

    let progress = ProgressBar::hidden();
    let sequential = validate_records(&engine, &records, 1, &progress).unwrap();
    let parallel = validate_records(&engine, &records, 4, &progress).unwrap();

    assert_eq!(sequential.len(), records.len());
    assert_eq!(progress.position(), 2 * records.len() as u64);
    for (a, b) in sequential.iter().zip(&parallel) {
        assert!(Arc::ptr_eq(a, b));
    }
    assert_eq!(sequential[1].classification, Classification::NoMatch);
    assert_eq!(sequential[2].classification, Classification::NoneNoCode);
    assert!(validate_records(&engine, &[], 0, &progress).unwrap().is_empty());
}

#[test]
fn configured_alias_and_coding_system_apply() {
    let dir = TempDir::new().unwrap();
    let config = RunConfig::from_toml_str(
        r#"
extra_coding_systems = ["READV3"]

[coding_system_aliases]
i = "ICD10"
"#,
    )
    .unwrap();
    let engine = engine(dir.path(), &config);
    let input = dir.path().join("aliases.csv");
    fs::write(
        &input,
        "SAB,CODE,STR,CUI\ni,D68.0,Von Willebrand's disease,C0042974\nREADV3,X1,Anything,\n",
    )
    .unwrap();
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();

    let options = DedupOptions {
        jobs: 1,
        aliases: config.aliases(),
    };
    let outcome = process_file(&engine, &input, &out, &options, &ProgressBar::hidden()).unwrap();

    assert_eq!(outcome.count(Classification::Exact), 1);
    assert_eq!(outcome.count(Classification::NoMatch), 1);
}
