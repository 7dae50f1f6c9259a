//! Wildcard pattern matching for CSV header cells
//!
//! Import settings describe columns with simple wildcards (`*` matches any
//! run of characters, `?` matches exactly one) rather than full regular
//! expressions. Patterns are translated once into anchored, case-insensitive
//! regexes and reused for every header cell of every imported file.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A compiled wildcard pattern.
///
/// Matching is whole-string and case-insensitive: the header cell must
/// satisfy the pattern over its entire length, not merely contain it.
/// Whitespace in the wildcard is kept as literal whitespace, so
/// `"Betrag *"` requires the space while `"Betrag*"` does not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct WildcardPattern {
    source: String,
    regex: Regex,
}

impl WildcardPattern {
    /// Compile a wildcard string.
    ///
    /// Every character other than `*` and `?` is escaped literally, so
    /// there is no malformed input and no error path. The empty wildcard
    /// matches only the empty string.
    pub fn compile(wildcard: &str) -> Self {
        let mut translated = String::with_capacity(wildcard.len() + 8);
        translated.push_str("(?i)^");
        for ch in wildcard.chars() {
            match ch {
                '*' => translated.push_str(".*"),
                '?' => translated.push('.'),
                _ => translated.push_str(&regex::escape(&ch.to_string())),
            }
        }
        translated.push('$');

        // Every input character is either escaped or mapped, so the
        // translated pattern is always a valid regex.
        let regex = Regex::new(&translated).expect("translated wildcard is a valid regex");
        Self {
            source: wildcard.to_string(),
            regex,
        }
    }

    /// Test whether `text` satisfies this pattern over its whole length
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The original wildcard string this pattern was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl PartialEq for WildcardPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl From<String> for WildcardPattern {
    fn from(wildcard: String) -> Self {
        Self::compile(&wildcard)
    }
}

impl From<WildcardPattern> for String {
    fn from(pattern: WildcardPattern) -> Self {
        pattern.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_text_matches_only_itself() {
        let pattern = WildcardPattern::compile("Buchungstag");
        assert!(pattern.matches("Buchungstag"));
        assert!(pattern.matches("BUCHUNGSTAG"));
        assert!(pattern.matches("buchungstag"));
        assert!(!pattern.matches("Buchungstag "));
        assert!(!pattern.matches("Buchungstage"));
        assert!(!pattern.matches(""));
    }

    #[test]
    fn test_empty_wildcard_matches_only_empty_string() {
        let pattern = WildcardPattern::compile("");
        assert!(pattern.matches(""));
        assert!(!pattern.matches("x"));
        assert_eq!(pattern.source(), "");
    }

    #[test]
    fn test_star_matches_any_run() {
        assert!(WildcardPattern::compile("hurz*").matches("Hurzel (Test)"));
        assert!(WildcardPattern::compile("*long*").matches("This is a longer text"));
        assert!(WildcardPattern::compile("*").matches(""));
    }

    #[test]
    fn test_whitespace_is_literal() {
        // The space before the star has to be present in the text.
        assert!(!WildcardPattern::compile("hurz *").matches("Hurzel (Test)"));
        assert!(WildcardPattern::compile("hurz *").matches("hurz el"));
    }

    #[test]
    fn test_anchored_at_both_ends() {
        assert!(!WildcardPattern::compile("*long").matches("This is a longer text"));
        assert!(WildcardPattern::compile("*text").matches("This is a longer text"));
        assert!(!WildcardPattern::compile("long*").matches("This is a longer text"));
    }

    #[test]
    fn test_question_mark_matches_single_char() {
        let pattern = WildcardPattern::compile("IBAN?");
        assert!(pattern.matches("IBANs"));
        assert!(!pattern.matches("IBAN"));
        assert!(!pattern.matches("IBANxx"));
    }

    #[test]
    fn test_metacharacters_are_escaped() {
        let pattern = WildcardPattern::compile("Betrag (EUR)");
        assert!(pattern.matches("Betrag (EUR)"));
        assert!(!pattern.matches("Betrag xEURx"));

        let dotted = WildcardPattern::compile("a.b");
        assert!(dotted.matches("a.b"));
        assert!(!dotted.matches("axb"));
    }
}
