//! Normalizers and matchers comparing input codes and terms with reference
//! entries.
//!
//! Everything here is a pure function of its arguments.

pub mod abbreviation;
pub mod code;
pub mod term;

pub use abbreviation::{abbreviation_term_match, token_match, tokenize};
pub use code::{
    ROUNDED_SNOMED_LENGTH, ROUNDED_SUFFIX, SNOMED_SIGNIFICANT_DIGITS, code_match, normalize_code,
};
pub use term::{JOINER, SEPARATORS, edit_distance, normalize_term, term_match, transliterate};
