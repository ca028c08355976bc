//! Token-sequence matching tolerant to abbreviations and small reorderings.

use crate::term::{SEPARATORS, edit_distance};

/// Lowercased alphabetic tokens of a term.
///
/// Separators split tokens, surrounding punctuation is trimmed, and tokens
/// that still contain non-letters (`"f.a"`, `"2"`) are dropped.
pub fn tokenize(term: &str) -> Vec<String> {
    term.replace(SEPARATORS, " ")
        .to_lowercase()
        .split_whitespace()
        .map(|chunk| chunk.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| !token.is_empty() && token.chars().all(char::is_alphabetic))
        .map(str::to_string)
        .collect()
}

/// Whether two tokens are equal, one abbreviates the other, or they differ
/// by no more edits than their length difference.
pub fn token_match(a: &str, b: &str) -> bool {
    if a == b || a.starts_with(b) || b.starts_with(a) {
        return true;
    }
    let (la, lb) = (a.chars().count(), b.chars().count());
    edit_distance(a, b) <= la.abs_diff(lb)
}

/// Greedy left-to-right alignment of the token sequences of two terms.
///
/// A mismatch may be resolved by skipping one token on either side when the
/// next token matches; each skip counts as a jump. Once either side is
/// exhausted the leftover tokens plus jumps must stay below a quarter of the
/// longer sequence.
pub fn abbreviation_term_match(a: &str, b: &str) -> bool {
    let left = tokenize(a);
    let right = tokenize(b);
    let longest = left.len().max(right.len());
    let (mut i, mut j, mut jumps) = (0usize, 0usize, 0usize);
    loop {
        if i == left.len() || j == right.len() {
            let effort = (left.len() - i) + (right.len() - j) + jumps;
            return (effort as f64) < longest as f64 / 4.0;
        }
        if token_match(&left[i], &right[j]) {
            i += 1;
            j += 1;
            continue;
        }
        if j + 1 < right.len() && token_match(&left[i], &right[j + 1]) {
            j += 1;
        } else if i + 1 < left.len() && token_match(&left[i + 1], &right[j]) {
            i += 1;
        } else {
            return false;
        }
        jumps += 1;
        i += 1;
        j += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_drops_non_alphabetic_tokens() {
        assert_eq!(
            tokenize("Blødning f.a. (akut) type-2 sygdom,"),
            vec!["blødning", "akut", "type", "sygdom"]
        );
    }

    #[test]
    fn token_prefix_is_an_abbreviation() {
        assert!(token_match("thromb", "thrombocytopenia"));
        assert!(token_match("thrombocytopenia", "thromb"));
        assert!(!token_match("liver", "kidney"));
    }

    #[test]
    fn token_edit_distance_bounded_by_length_difference() {
        // "haemorrhage" vs "hemorrhage": one deletion, length difference one
        assert!(token_match("haemorrhage", "hemorrhage"));
        assert!(!token_match("anaemia", "anemic"));
    }

    #[test]
    fn abbreviated_words_match() {
        assert!(abbreviation_term_match(
            "Thromb due to heparin induced immune reaction",
            "Thrombocytopenia due to heparin induced immune reaction"
        ));
    }

    #[test]
    fn one_extra_word_is_a_jump() {
        assert!(abbreviation_term_match(
            "acute idiopathic thrombocytopenic purpura of childhood",
            "acute thrombocytopenic purpura of childhood"
        ));
    }

    #[test]
    fn extra_word_in_a_short_term_exceeds_effort() {
        assert!(!abbreviation_term_match(
            "acute thrombocytopenic purpura",
            "acute idiopathic thrombocytopenic purpura"
        ));
    }

    #[test]
    fn unresolvable_mismatch_fails() {
        assert!(!abbreviation_term_match(
            "liver failure acute",
            "kidney disease chronic"
        ));
    }

    #[test]
    fn empty_terms_never_match() {
        assert!(!abbreviation_term_match("", ""));
        assert!(!abbreviation_term_match("123", "456"));
    }
}
