//! Case-insensitive SQL `ILIKE` patterns.

use regex::Regex;
use tracing::warn;

/// A compiled `ILIKE` pattern.
///
/// Patterns without `_` or `%` compare literally (case-insensitive). With
/// wildcards, `_` matches exactly one character and `%` any run of
/// characters; the whole value must match.
#[derive(Debug, Clone)]
pub enum LikePattern {
    Literal(String),
    Wildcard(Regex),
}

impl LikePattern {
    pub fn new(pattern: &str) -> Self {
        let lowered = pattern.to_lowercase();
        if !lowered.contains(['_', '%']) {
            return Self::Literal(lowered);
        }
        let mut source = String::with_capacity(lowered.len() + 8);
        source.push('^');
        let mut literal = String::new();
        for c in lowered.chars() {
            match c {
                '_' | '%' => {
                    source.push_str(&regex::escape(&literal));
                    literal.clear();
                    source.push_str(if c == '_' { "." } else { ".*" });
                }
                _ => literal.push(c),
            }
        }
        source.push_str(&regex::escape(&literal));
        source.push('$');
        match Regex::new(&source) {
            Ok(regex) => Self::Wildcard(regex),
            Err(err) => {
                warn!(error = %err, "wildcard pattern rejected, comparing literally");
                Self::Literal(lowered)
            }
        }
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.is_match_lowered(&value.to_lowercase())
    }

    /// Matches a value that is already lowercase.
    pub fn is_match_lowered(&self, lowered: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == lowered,
            Self::Wildcard(regex) => regex.is_match(lowered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_is_case_insensitive() {
        let pattern = LikePattern::new("Von Willebrand's disease");
        assert!(matches!(pattern, LikePattern::Literal(_)));
        assert!(pattern.is_match("von willebrand's DISEASE"));
        assert!(!pattern.is_match("von willebrand's disease, type 1"));
    }

    #[test]
    fn underscore_matches_one_character() {
        let pattern = LikePattern::new("an_emia");
        assert!(pattern.is_match("Anaemia"));
        assert!(!pattern.is_match("Anemia"));
        assert!(!pattern.is_match("Anaaemia"));
    }

    #[test]
    fn percent_matches_any_run() {
        let pattern = LikePattern::new("%thrombocytopenia");
        assert!(pattern.is_match("Fetal thrombocytopenia"));
        assert!(pattern.is_match("thrombocytopenia"));
        assert!(!pattern.is_match("thrombocytopenia, fetal"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let pattern = LikePattern::new("Disorder (finding)%");
        assert!(pattern.is_match("disorder (finding) of blood"));
        assert!(!pattern.is_match("disorder finding of blood"));

        let dotted = LikePattern::new("f.a.%");
        assert!(dotted.is_match("F.a. cirkulerende"));
        assert!(!dotted.is_match("fxax cirkulerende"));
    }
}
