#![allow(missing_docs)]

use cmap_model::{
    COMMENT_RETIRED_CONCEPT, Classification, InputRecord, PriorityRank, ReferenceRow, TermTypes,
    ValidationResult,
};

#[test]
fn reference_row_derives_flags_from_term_types() {
    let preferred = ReferenceRow::new(
        "ICD10CM",
        "D68.4",
        "Acquired coagulation factor deficiency",
        "C0001169",
        TermTypes::parse("PT"),
    );
    assert!(!preferred.all_ignored());
    assert_eq!(preferred.priority_rank(), PriorityRank::Preferred);

    let obsolete = ReferenceRow::new(
        "ICD10CM",
        "D68.4",
        "Deficiency of coagulation factor due to liver disease",
        "C0398604",
        TermTypes::parse("ET"),
    );
    assert!(obsolete.all_ignored());
    assert!(obsolete.any_ignored());
    assert_eq!(obsolete.priority_rank(), PriorityRank::Ignored);
}

#[test]
fn result_serializes_with_report_codes() {
    let row = ReferenceRow::new("ICD10", "D68.0", "Von Willebrand's disease", "C0042974", TermTypes::parse("PT"));
    let result = ValidationResult::matched(
        Classification::ByName,
        vec!["C0042974".to_string()],
        row,
        vec![COMMENT_RETIRED_CONCEPT.to_string()],
    );
    let json = serde_json::to_value(&result).expect("serialize result");
    assert_eq!(json["classification"], "BY_NAME");
    assert_eq!(json["matched_row"]["code"], "D68.0");
    assert_eq!(json["matched_row"]["term_types"][0], "PT");
    assert!(json["superseded_row"].is_null());

    let none = serde_json::to_value(Classification::NoMatch).expect("serialize classification");
    assert_eq!(none, "NONE");
}

#[test]
fn serialized_classification_matches_report_code() {
    for classification in Classification::ALL {
        let json = serde_json::to_string(&classification).expect("serialize");
        assert_eq!(json, format!("\"{}\"", classification.code()));
    }
}

#[test]
fn input_record_concept_is_trimmed() {
    let record = InputRecord::from_cells("SNOMEDCT_US", "10752381000119100", "Fetal thrombocytopenia", " C2349596 ");
    assert_eq!(record.concept(), Some("C2349596"));
    assert!(record.has_code());
}
