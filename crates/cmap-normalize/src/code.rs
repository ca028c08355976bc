//! Code normalization and code equivalence.

use cmap_model::CodingSystemFamily;

/// Significant digits of a SNOMED CT identifier.
pub const SNOMED_SIGNIFICANT_DIGITS: usize = 15;

/// Length of a SNOMED CT identifier whose last digits were rounded away by a
/// spreadsheet ("10752381000119100" for "10752381000119101").
pub const ROUNDED_SNOMED_LENGTH: usize = 17;

/// Suffix left behind by spreadsheet rounding.
pub const ROUNDED_SUFFIX: &str = "00";

fn is_numeric(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_digit())
}

/// Canonical comparison form of a code.
///
/// Long numeric SNOMED identifiers are cut to their significant digits.
/// Otherwise a dot in the fourth position of an ICD code is removed and
/// trailing zeros and dots are stripped (`"D68.0"` becomes `"D68"`).
pub fn normalize_code(code: &str, coding_system: &str) -> String {
    let family = CodingSystemFamily::of(coding_system);
    if family == CodingSystemFamily::Snomed
        && is_numeric(code)
        && code.len() > SNOMED_SIGNIFICANT_DIGITS
    {
        return code[..SNOMED_SIGNIFICANT_DIGITS].to_string();
    }
    let mut code = code.to_string();
    if family == CodingSystemFamily::Icd
        && let Some((idx, '.')) = code.char_indices().nth(3)
    {
        code.remove(idx);
    }
    code.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Whether a reference code and an input code denote the same code.
pub fn code_match(reference_code: &str, input_code: &str, coding_system: &str) -> bool {
    if normalize_code(reference_code, coding_system) == normalize_code(input_code, coding_system) {
        return true;
    }
    if CodingSystemFamily::of(coding_system) != CodingSystemFamily::Snomed {
        return false;
    }
    if input_code.len() == ROUNDED_SNOMED_LENGTH && input_code.ends_with(ROUNDED_SUFFIX) {
        let stripped = input_code.trim_end_matches('0');
        let prefix = reference_code.get(..stripped.len()).unwrap_or(reference_code);
        return prefix == stripped;
    }
    reference_code == input_code
}
