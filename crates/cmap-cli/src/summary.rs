use std::collections::BTreeMap;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cmap_model::{Classification, SENTINEL};

use crate::types::{CheckReport, DedupRun, ReferenceInfo};

pub fn print_dedup_summary(run: &DedupRun) {
    println!("Output: {}", run.output_dir.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Records"),
        header_cell("Matched"),
        header_cell("Exact"),
        header_cell("Corrected"),
        header_cell("No match"),
        header_cell("No code"),
        header_cell("No system"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut totals: BTreeMap<Classification, usize> = BTreeMap::new();
    let mut total_records = 0usize;
    for file in &run.files {
        for (classification, count) in &file.counts {
            *totals.entry(*classification).or_insert(0) += count;
        }
        total_records += file.records;
        let name = file
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let exact = file.count(Classification::Exact);
        table.add_row(vec![
            Cell::new(name).fg(Color::Blue).add_attribute(Attribute::Bold),
            Cell::new(file.records),
            count_cell(file.matched(), Color::Green),
            count_cell(exact, Color::Green),
            count_cell(file.matched() - exact, Color::Yellow),
            count_cell(file.count(Classification::NoMatch), Color::Red),
            count_cell(file.count(Classification::NoneNoCode), Color::DarkGrey),
            count_cell(file.count(Classification::NoneNoCodingSystem), Color::DarkGrey),
        ]);
    }
    let total = |classification: Classification| {
        totals.get(&classification).copied().unwrap_or_default()
    };
    let matched: usize = totals
        .iter()
        .filter(|(classification, _)| !classification.is_none())
        .map(|(_, count)| count)
        .sum();
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_records).add_attribute(Attribute::Bold),
        count_cell(matched, Color::Green).add_attribute(Attribute::Bold),
        count_cell(total(Classification::Exact), Color::Green).add_attribute(Attribute::Bold),
        count_cell(matched - total(Classification::Exact), Color::Yellow)
            .add_attribute(Attribute::Bold),
        count_cell(total(Classification::NoMatch), Color::Red).add_attribute(Attribute::Bold),
        count_cell(total(Classification::NoneNoCode), Color::DarkGrey),
        count_cell(total(Classification::NoneNoCodingSystem), Color::DarkGrey),
    ]);
    println!("{table}");
    print_classification_table(&totals);
    if run.has_errors() {
        eprintln!("Errors:");
        for error in &run.errors {
            eprintln!("- {error}");
        }
    }
}

fn print_classification_table(totals: &BTreeMap<Classification, usize>) {
    if totals.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Result"),
        header_cell("Description"),
        header_cell("Records"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for classification in Classification::ALL {
        let Some(count) = totals.get(&classification) else {
            continue;
        };
        table.add_row(vec![
            classification_cell(classification),
            Cell::new(classification.description()),
            Cell::new(count),
        ]);
    }
    println!();
    println!("Classifications:");
    println!("{table}");
}

pub fn print_check(report: &CheckReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    let result = &report.result;
    println!(
        "{} ({})",
        result.classification,
        result.classification.description()
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Input"),
        header_cell("Match"),
    ]);
    apply_table_style(&mut table);
    let input = &report.input;
    let row = result.matched_row.as_ref();
    let fields = [
        (
            "Coding system",
            input.coding_system.clone(),
            row.map(|r| r.coding_system.clone()),
        ),
        ("Code", input.code.clone(), row.map(|r| r.code.clone())),
        ("Term", Some(input.term.clone()), row.map(|r| r.term.clone())),
        (
            "Concept",
            input.concept_id.clone(),
            row.map(|r| r.concept_id.clone()),
        ),
        ("Term types", None, row.map(|r| r.term_types.joined())),
    ];
    for (label, given, matched) in fields {
        table.add_row(vec![
            Cell::new(label).add_attribute(Attribute::Bold),
            value_cell(given),
            value_cell(matched),
        ]);
    }
    println!("{table}");
    if !result.candidate_concepts.is_empty() {
        println!("Candidates: {}", result.candidate_concepts.join(", "));
    }
    if let Some(superseded) = &result.superseded_row {
        println!(
            "Replaces ignored row: {} {} ({})",
            superseded.code, superseded.term, superseded.term_types
        );
    }
    for comment in &result.comments {
        println!("Comment: {comment}");
    }
    for change in &report.changes {
        println!("Change: {change}");
    }
    Ok(())
}

pub fn print_info(info: &ReferenceInfo) {
    println!("Reference: {}", info.reference.display());
    println!("Rows: {}", info.rows);
    println!("Retired concepts: {}", info.retired_concepts);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Coding system"),
        header_cell("Rows"),
        header_cell("Validated"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    let mut systems: Vec<&str> = info.system_counts.keys().map(String::as_str).collect();
    for system in &info.recognized {
        if !info.system_counts.contains_key(system) {
            systems.push(system.as_str());
        }
    }
    systems.sort_unstable();
    for system in systems {
        let rows = info.system_counts.get(system).copied().unwrap_or_default();
        let recognized = info.recognized.iter().any(|s| s == system);
        table.add_row(vec![
            Cell::new(system),
            count_cell(rows, Color::Reset),
            if recognized {
                Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                dim_cell(SENTINEL)
            },
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn classification_cell(classification: Classification) -> Cell {
    let color = if classification == Classification::Exact {
        Color::Green
    } else if classification.is_none() {
        Color::Red
    } else {
        Color::Yellow
    };
    Cell::new(classification.code()).fg(color)
}

fn value_cell(value: Option<String>) -> Cell {
    match value {
        Some(value) if !value.trim().is_empty() => Cell::new(value),
        _ => dim_cell(SENTINEL),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
