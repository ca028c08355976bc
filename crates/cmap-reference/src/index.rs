//! Queryable in-memory view of the reference table.

use std::collections::{BTreeMap, HashMap};

use cmap_model::ReferenceRow;

use crate::like::LikePattern;

/// Immutable snapshot of the reference table with its partitions.
///
/// Rows keep table order. The coding-system, (coding system, code) and
/// concept partitions hold row positions and are built once at
/// construction, together with the lowercase term of every row.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    rows: Vec<ReferenceRow>,
    lowered_terms: Vec<String>,
    by_system: HashMap<String, Vec<usize>>,
    by_system_code: HashMap<String, HashMap<String, Vec<usize>>>,
    by_concept: HashMap<String, Vec<usize>>,
}

impl ReferenceIndex {
    pub fn new(rows: Vec<ReferenceRow>) -> Self {
        let mut by_system: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_system_code: HashMap<String, HashMap<String, Vec<usize>>> = HashMap::new();
        let mut by_concept: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, row) in rows.iter().enumerate() {
            by_system
                .entry(row.coding_system.clone())
                .or_default()
                .push(position);
            by_system_code
                .entry(row.coding_system.clone())
                .or_default()
                .entry(row.code.clone())
                .or_default()
                .push(position);
            by_concept
                .entry(row.concept_id.clone())
                .or_default()
                .push(position);
        }
        let lowered_terms = rows.iter().map(|row| row.term.to_lowercase()).collect();
        Self {
            rows,
            lowered_terms,
            by_system,
            by_system_code,
            by_concept,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in table order.
    pub fn rows(&self) -> &[ReferenceRow] {
        &self.rows
    }

    /// Row counts per coding system, sorted by coding system.
    pub fn system_counts(&self) -> BTreeMap<&str, usize> {
        self.by_system
            .iter()
            .map(|(system, positions)| (system.as_str(), positions.len()))
            .collect()
    }

    fn at<'a>(&'a self, positions: &'a [usize]) -> impl Iterator<Item = &'a ReferenceRow> + 'a {
        positions.iter().filter_map(move |&p| self.rows.get(p))
    }

    fn system_rows<'a>(&'a self, coding_system: &str) -> impl Iterator<Item = &'a ReferenceRow> + 'a {
        let positions = self
            .by_system
            .get(coding_system)
            .map(Vec::as_slice)
            .unwrap_or_default();
        self.at(positions)
    }

    /// Rows of `coding_system` whose code equals `code` exactly, in table
    /// order.
    pub fn rows_by_code(&self, coding_system: &str, code: &str) -> Vec<&ReferenceRow> {
        let positions = self
            .by_system_code
            .get(coding_system)
            .and_then(|codes| codes.get(code))
            .map(Vec::as_slice)
            .unwrap_or_default();
        self.at(positions).collect()
    }

    /// Rows of `coding_system` whose term matches the `ILIKE` pattern, in
    /// table order.
    pub fn rows_by_name(&self, coding_system: &str, term_pattern: &str) -> Vec<&ReferenceRow> {
        let pattern = LikePattern::new(term_pattern);
        let positions = self
            .by_system
            .get(coding_system)
            .map(Vec::as_slice)
            .unwrap_or_default();
        positions
            .iter()
            .filter(|&&p| {
                self.lowered_terms
                    .get(p)
                    .is_some_and(|term| pattern.is_match_lowered(term))
            })
            .filter_map(|&p| self.rows.get(p))
            .collect()
    }

    /// Rows of any coding system with exactly this code and term, best
    /// priority rank first.
    pub fn rows_matching(&self, code: &str, term: &str) -> Vec<&ReferenceRow> {
        let mut rows: Vec<_> = self
            .rows
            .iter()
            .filter(|row| row.code == code && row.term == term)
            .collect();
        rows.sort_by_key(|row| row.priority_rank());
        rows
    }

    /// Rows with identical coding system, code and term, best priority rank
    /// first. A non-empty `concepts` filter restricts rows to those concepts.
    pub fn rows_exact(
        &self,
        coding_system: &str,
        code: &str,
        term: &str,
        concepts: &[String],
    ) -> Vec<&ReferenceRow> {
        let mut rows: Vec<_> = self
            .rows_by_code(coding_system, code)
            .into_iter()
            .filter(|row| concepts.is_empty() || concepts.contains(&row.concept_id))
            .filter(|row| row.term == term)
            .collect();
        rows.sort_by_key(|row| row.priority_rank());
        rows
    }

    /// Rows of any coding system carrying this concept and exactly this term.
    pub fn rows_with_concept_and_term(&self, concept_id: &str, term: &str) -> Vec<&ReferenceRow> {
        let positions = self
            .by_concept
            .get(concept_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        self.at(positions).filter(|row| row.term == term).collect()
    }

    /// Whether another row of the table shares `row`'s concept and term.
    ///
    /// `row` is compared by identity, so it must be borrowed from this index
    /// to exclude itself.
    pub fn has_equivalent(&self, row: &ReferenceRow) -> bool {
        self.rows_with_concept_and_term(&row.concept_id, &row.term)
            .into_iter()
            .any(|other| !std::ptr::eq(other, row))
    }

    /// Rows of `coding_system` whose code starts with `prefix`, in table
    /// order.
    pub fn rows_with_code_prefix(&self, coding_system: &str, prefix: &str) -> Vec<&ReferenceRow> {
        self.system_rows(coding_system)
            .filter(|row| row.code.starts_with(prefix))
            .collect()
    }

    /// Best row for (`coding_system`, `code`) that is not all-ignored.
    ///
    /// Rows are ordered by priority rank, then rows whose concept is among
    /// `concepts` before the others, then table order.
    pub fn unignore(
        &self,
        coding_system: &str,
        code: &str,
        concepts: &[String],
    ) -> Option<&ReferenceRow> {
        self.rows_by_code(coding_system, code)
            .into_iter()
            .filter(|row| !row.all_ignored())
            .min_by_key(|row| {
                (
                    row.priority_rank(),
                    !concepts.contains(&row.concept_id),
                )
            })
    }
}

impl FromIterator<ReferenceRow> for ReferenceIndex {
    fn from_iter<I: IntoIterator<Item = ReferenceRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use cmap_model::TermTypes;

    use super::*;

    fn row(sab: &str, code: &str, term: &str, cui: &str, ttys: &str) -> ReferenceRow {
        ReferenceRow::new(sab, code, term, cui, TermTypes::parse(ttys))
    }

    fn index() -> ReferenceIndex {
        ReferenceIndex::from_iter([
            row("ICD10CM", "D68.4", "Deficiency of coagulation factor due to liver disease", "C0398604", "ET"),
            row("ICD10CM", "D68.4", "Acquired coagulation factor deficiency", "C0001169", "PT"),
            row("ICD10CM", "D68.4", "Acquired coagulation factor deficiency", "C0001169", "AB"),
            row("ICD10", "D68.0", "Von Willebrand's disease", "C0042974", "PT"),
            row("ICD10", "D68.1", "Hereditary factor XI deficiency", "C0015523", "PT"),
            row("ICD10CM", "D68.0", "Von Willebrand's disease", "C0042974", "SY"),
        ])
    }

    #[test]
    fn rows_by_code_keeps_table_order() {
        let index = index();
        let rows = index.rows_by_code("ICD10CM", "D68.4");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].concept_id, "C0398604");
        assert!(index.rows_by_code("ICD10CM", "D684").is_empty());
        assert!(index.rows_by_code("RCD", "D68.4").is_empty());
    }

    #[test]
    fn rows_exact_sorts_by_rank_and_filters_concepts() {
        let index = index();
        let term = "Acquired coagulation factor deficiency";
        let rows = index.rows_exact("ICD10CM", "D68.4", term, &[]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].term_types.joined(), "PT");

        let filtered = index.rows_exact("ICD10CM", "D68.4", term, &["C0398604".to_string()]);
        assert!(filtered.is_empty());
    }

    #[test]
    fn rows_by_name_is_case_insensitive_within_system() {
        let index = index();
        let rows = index.rows_by_name("ICD10", "von willebrand's disease");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].code, "D68.0");

        let wildcard = index.rows_by_name("ICD10", "%deficiency");
        assert_eq!(wildcard.len(), 1);
        assert_eq!(wildcard[0].code, "D68.1");
    }

    #[test]
    fn rows_by_name_matches_mixed_case_terms_against_any_pattern_case() {
        let index = ReferenceIndex::from_iter([
            row("ICD10", "K92.2", "GastroIntestinal Haemorrhage", "C0017181", "PT"),
            row("ICD10", "K92.1", "gastrointestinal haemorrhage", "C0017181", "SY"),
            row("ICD10", "K92.0", "Haematemesis", "C0018926", "PT"),
        ]);
        let literal = index.rows_by_name("ICD10", "GASTROINTESTINAL haemorrhage");
        let codes: Vec<_> = literal.iter().map(|row| row.code.as_str()).collect();
        assert_eq!(codes, ["K92.2", "K92.1"]);

        let wildcard = index.rows_by_name("ICD10", "HAEM%");
        assert_eq!(wildcard.len(), 1);
        assert_eq!(wildcard[0].term, "Haematemesis");
        assert!(index.rows_by_name("ICD10CM", "haematemesis").is_empty());
    }

    #[test]
    fn rows_matching_spans_coding_systems() {
        let index = index();
        let rows = index.rows_matching("D68.0", "Von Willebrand's disease");
        let systems: Vec<_> = rows.iter().map(|r| r.coding_system.as_str()).collect();
        assert_eq!(systems, vec!["ICD10", "ICD10CM"]);
    }

    #[test]
    fn equivalent_excludes_the_row_itself() {
        let index = index();
        let von_willebrand = &index.rows()[3];
        assert!(index.has_equivalent(von_willebrand));
        let factor_xi = &index.rows()[4];
        assert!(!index.has_equivalent(factor_xi));
    }

    #[test]
    fn unignore_prefers_rank_then_concept() {
        let index = index();
        let best = index
            .unignore("ICD10CM", "D68.4", &["C0398604".to_string()])
            .expect("non-ignored row");
        assert_eq!(best.term_types.joined(), "PT");
        assert!(index.unignore("ICD10CM", "Z99", &[]).is_none());
    }

    #[test]
    fn system_counts_are_sorted() {
        let index = index();
        let counts = index.system_counts();
        let pairs: Vec<_> = counts.into_iter().collect();
        assert_eq!(pairs, vec![("ICD10", 2), ("ICD10CM", 4)]);
    }
}
