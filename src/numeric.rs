//! Locale-aware parsing of amount cells into exact decimals
//!
//! Bank exports disagree on whether `,` or `.` is the decimal separator.
//! Import settings may carry an ordered list of display patterns such as
//! `"###,##0.0#"` (thousands `,`, decimal `.`) that are tried in order;
//! when no pattern is configured, a heuristic inspects the text itself.
//! All results are [`BigDecimal`] so amount comparisons are exact.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::{ImportError, ImportResult};

/// Separator convention for one numeric style.
///
/// Built either from a display pattern ([`NumberFormat::from_pattern`]) or
/// by sniffing a concrete value ([`NumberFormat::detect`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    /// Grouping separator, if the style uses one
    pub thousands: Option<char>,
    /// Decimal separator, if the style allows fractions
    pub decimal: Option<char>,
    /// Upper bound on fraction digits, `None` for unbounded
    pub max_fraction: Option<usize>,
}

impl NumberFormat {
    /// The German convention: `1.234,56`
    pub fn german() -> Self {
        Self {
            thousands: Some('.'),
            decimal: Some(','),
            max_fraction: None,
        }
    }

    /// The English convention: `1,234.56`
    pub fn english() -> Self {
        Self {
            thousands: Some(','),
            decimal: Some('.'),
            max_fraction: None,
        }
    }

    /// Build a format from a display pattern such as `"###,##0.0#"`.
    ///
    /// When both `,` and `.` appear, the later one is the decimal
    /// separator. The fraction slots (`0` and `#` after the decimal
    /// separator) bound how many fraction digits a value may carry.
    /// Anything other than `#`, `0`, `,` and `.` is rejected as a
    /// configuration error.
    pub fn from_pattern(pattern: &str) -> ImportResult<Self> {
        if pattern.is_empty() {
            return Err(ImportError::Configuration(
                "Number pattern cannot be empty".to_string(),
            ));
        }
        if let Some(bad) = pattern.chars().find(|c| !matches!(c, '#' | '0' | ',' | '.')) {
            return Err(ImportError::Configuration(format!(
                "Number pattern '{pattern}' contains unsupported character '{bad}'"
            )));
        }

        let last_comma = pattern.rfind(',');
        let last_dot = pattern.rfind('.');

        let (thousands, decimal) = match (last_comma, last_dot) {
            (Some(comma), Some(dot)) if dot > comma => (Some(','), Some('.')),
            (Some(_), Some(_)) => (Some('.'), Some(',')),
            // A single separator kind: decimal when followed by at most
            // two digit slots, grouping otherwise.
            (Some(comma), None) => single_separator_role(pattern, comma, ','),
            (None, Some(dot)) => single_separator_role(pattern, dot, '.'),
            (None, None) => (None, None),
        };

        let max_fraction = decimal.map(|sep| {
            let tail = &pattern[pattern.rfind(sep).unwrap_or(0) + 1..];
            tail.chars().filter(|c| matches!(c, '0' | '#')).count()
        });

        Ok(Self {
            thousands,
            decimal,
            max_fraction,
        })
    }

    /// Guess the separator convention from a concrete value.
    ///
    /// The final `,` or `.` counts as the decimal separator when it is
    /// followed by exactly one or two digits and occurs only once;
    /// otherwise it is a thousands separator. Lossy for locales with
    /// three-decimal currencies; callers needing certainty should
    /// configure explicit patterns instead.
    pub fn detect(text: &str) -> Self {
        let trimmed = text.trim();
        let last_comma = trimmed.rfind(',');
        let last_dot = trimmed.rfind('.');

        let (candidate, candidate_pos, other) = match (last_comma, last_dot) {
            (Some(comma), Some(dot)) if dot > comma => ('.', dot, Some(',')),
            (Some(comma), Some(_)) => (',', comma, Some('.')),
            (Some(comma), None) => (',', comma, None),
            (None, Some(dot)) => ('.', dot, None),
            (None, None) => return Self::english(),
        };

        let tail = &trimmed[candidate_pos + 1..];
        let occurrences = trimmed.matches(candidate).count();
        let looks_decimal = occurrences == 1
            && (1..=2).contains(&tail.len())
            && tail.chars().all(|c| c.is_ascii_digit());

        if looks_decimal {
            Self {
                thousands: other.or(Some(if candidate == ',' { '.' } else { ',' })),
                decimal: Some(candidate),
                max_fraction: None,
            }
        } else {
            // Trailing group is not a 1-2 digit fraction: the candidate
            // separates thousands and the other char (if any) is decimal.
            Self {
                thousands: Some(candidate),
                decimal: other,
                max_fraction: None,
            }
        }
    }

    /// Parse `text` under this format. Returns `None` when the text does
    /// not conform (wrong separators, malformed grouping, too many
    /// fraction digits).
    pub fn parse(&self, text: &str) -> Option<BigDecimal> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let (sign, body) = match trimmed.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        if body.is_empty() {
            return None;
        }

        let (integer_part, fraction_part) = match self.decimal {
            Some(sep) => {
                let mut pieces = body.split(sep);
                let integer = pieces.next().unwrap_or("");
                let fraction = pieces.next();
                if pieces.next().is_some() {
                    // More than one decimal separator.
                    return None;
                }
                (integer, fraction)
            }
            None => (body, None),
        };

        let digits = self.grouped_digits(integer_part)?;
        if digits.is_empty() && fraction_part.is_none() {
            return None;
        }

        let mut canonical = String::with_capacity(body.len() + 2);
        canonical.push_str(sign);
        canonical.push_str(if digits.is_empty() { "0" } else { &digits });

        if let Some(fraction) = fraction_part {
            if fraction.is_empty() || !fraction.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            if let Some(max) = self.max_fraction {
                if fraction.len() > max {
                    return None;
                }
            }
            canonical.push('.');
            canonical.push_str(fraction);
        }

        BigDecimal::from_str(&canonical).ok()
    }

    /// Strip and validate thousands grouping from the integer part.
    /// Groups after the first must be exactly three digits.
    fn grouped_digits(&self, integer_part: &str) -> Option<String> {
        let Some(sep) = self.thousands else {
            return integer_part
                .chars()
                .all(|c| c.is_ascii_digit())
                .then(|| integer_part.to_string());
        };

        if !integer_part.contains(sep) {
            return integer_part
                .chars()
                .all(|c| c.is_ascii_digit())
                .then(|| integer_part.to_string());
        }

        let groups: Vec<&str> = integer_part.split(sep).collect();
        let mut digits = String::with_capacity(integer_part.len());
        for (index, group) in groups.iter().enumerate() {
            let valid_len = if index == 0 {
                !group.is_empty() && group.len() <= 3
            } else {
                group.len() == 3
            };
            if !valid_len || !group.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            digits.push_str(group);
        }
        Some(digits)
    }
}

/// Decide whether a pattern's single separator kind denotes the decimal
/// point or a grouping separator.
fn single_separator_role(
    pattern: &str,
    position: usize,
    separator: char,
) -> (Option<char>, Option<char>) {
    let slots = pattern[position + 1..]
        .chars()
        .filter(|c| matches!(c, '0' | '#'))
        .count();
    if pattern.matches(separator).count() == 1 && (1..=2).contains(&slots) {
        (None, Some(separator))
    } else {
        (Some(separator), None)
    }
}

/// Parse a free-form decimal string.
///
/// Blank input yields `None` (not an error). Formats are tried in order
/// and the first successful parse wins, so callers control precedence by
/// ordering their configured patterns. With an empty format list the
/// separator convention is auto-detected from the text itself.
pub fn parse_decimal(text: &str, formats: &[NumberFormat]) -> Option<BigDecimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if formats.is_empty() {
        return NumberFormat::detect(trimmed).parse(trimmed);
    }

    formats.iter().find_map(|format| format.parse(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_blank_input_is_none() {
        assert_eq!(parse_decimal("", &[]), None);
        assert_eq!(parse_decimal("   ", &[NumberFormat::english()]), None);
    }

    #[test]
    fn test_pattern_order_decides() {
        let english_first = [
            NumberFormat::from_pattern("###,##0.0#").unwrap(),
            NumberFormat::from_pattern("###.##0,0#").unwrap(),
        ];
        assert_eq!(parse_decimal("1,234.56", &english_first), Some(dec("1234.56")));
        // German text fails the English format and falls through.
        assert_eq!(parse_decimal("1.234,56", &english_first), Some(dec("1234.56")));
    }

    #[test]
    fn test_pattern_fraction_bound() {
        let format = NumberFormat::from_pattern("###,##0.0#").unwrap();
        assert_eq!(format.max_fraction, Some(2));
        assert_eq!(format.parse("1.23"), Some(dec("1.23")));
        // Three fraction digits exceed the two slots of the pattern.
        assert_eq!(format.parse("1.234"), None);
    }

    #[test]
    fn test_ambiguous_thousands_tiebreak() {
        // "1.000" has a three-digit trailing group, so the dot is a
        // thousands separator under auto-detection.
        assert_eq!(parse_decimal("1.000", &[]), Some(dec("1000")));
        assert_eq!(parse_decimal("1,000", &[]), Some(dec("1000")));
        // A 1-2 digit trailing group is a fraction.
        assert_eq!(parse_decimal("1.00", &[]), Some(dec("1.00")));
        assert_eq!(parse_decimal("1,5", &[]), Some(dec("1.5")));
    }

    #[test]
    fn test_detects_german_style() {
        assert_eq!(parse_decimal("1.234,56", &[]), Some(dec("1234.56")));
        assert_eq!(parse_decimal("-27,12", &[]), Some(dec("-27.12")));
    }

    #[test]
    fn test_detects_english_style() {
        assert_eq!(parse_decimal("1,234.56", &[]), Some(dec("1234.56")));
        assert_eq!(parse_decimal("+3.99", &[]), Some(dec("3.99")));
    }

    #[test]
    fn test_repeated_separator_is_grouping() {
        assert_eq!(parse_decimal("1,234,567", &[]), Some(dec("1234567")));
        assert_eq!(parse_decimal("1.234.567", &[]), Some(dec("1234567")));
    }

    #[test]
    fn test_malformed_grouping_rejected() {
        let english = NumberFormat::english();
        assert_eq!(english.parse("12,34.56"), None);
        assert_eq!(english.parse("1,2345"), None);
        assert_eq!(english.parse("abc"), None);
    }

    #[test]
    fn test_plain_integer() {
        assert_eq!(parse_decimal("42", &[]), Some(dec("42")));
        assert_eq!(parse_decimal("-7", &[NumberFormat::german()]), Some(dec("-7")));
    }

    #[test]
    fn test_bad_pattern_is_configuration_error() {
        assert!(NumberFormat::from_pattern("##x#0.0#").is_err());
        assert!(NumberFormat::from_pattern("").is_err());
    }
}
