//! Similarity scoring between one read and one stored record

use crate::types::TransactionRecord;

/// Score returned when both dates are populated but differ. Transactions
/// with different value dates are never the same economic event, no
/// matter how similar the other fields are.
pub const DATE_MISMATCH: i32 = -1;

/// Compute the similarity score between a read and a stored record.
///
/// Point scheme, evaluated over all populated fields:
/// - both dates populated and different: return [`DATE_MISMATCH`] immediately
/// - both dates populated and equal: `+2`
/// - both amounts populated and numerically equal: `+1`
/// - both IBANs populated and equal after normalization: `+1`
/// - a field unpopulated on either side contributes nothing
///
/// Subject text is deliberately not scored; the engine uses it as a
/// tie-break between candidates of equal score.
pub fn match_score(read: &TransactionRecord, stored: &TransactionRecord) -> i32 {
    if let (Some(read_date), Some(stored_date)) = (read.date, stored.date) {
        if read_date != stored_date {
            return DATE_MISMATCH;
        }
    }

    let mut score = 0;

    if read.date.is_some() && read.date == stored.date {
        score += 2;
    }

    if let (Some(read_amount), Some(stored_amount)) = (&read.amount, &stored.amount) {
        if read_amount == stored_amount {
            score += 1;
        }
    }

    if let (Some(read_iban), Some(stored_iban)) = (&read.iban, &stored.iban) {
        if normalize_iban(read_iban) == normalize_iban(stored_iban) {
            score += 1;
        }
    }

    score
}

/// Normalize an account identifier for comparison: strip whitespace and
/// punctuation, uppercase the rest.
pub fn normalize_iban(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Whether every comparable field (date, amount, subject, IBAN) is equal
/// after normalization. Fields absent on both sides count as equal; a
/// field present on only one side does not.
pub(crate) fn comparable_fields_equal(read: &TransactionRecord, stored: &TransactionRecord) -> bool {
    let iban_equal = match (&read.iban, &stored.iban) {
        (Some(a), Some(b)) => normalize_iban(a) == normalize_iban(b),
        (None, None) => true,
        _ => false,
    };

    read.date == stored.date
        && read.amount == stored.amount
        && read.subject == stored.subject
        && iban_equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn record(date: Option<(i32, u32, u32)>, amount: &str, iban: &str) -> TransactionRecord {
        TransactionRecord {
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            amount: if amount.is_empty() {
                None
            } else {
                Some(BigDecimal::from_str(amount).unwrap())
            },
            iban: if iban.is_empty() {
                None
            } else {
                Some(iban.to_string())
            },
            ..TransactionRecord::new()
        }
    }

    #[test]
    fn test_full_match_scores_four() {
        let read = record(Some((2024, 3, 1)), "1.23", "DE11 11");
        let stored = record(Some((2024, 3, 1)), "1.23", "de1111");
        assert_eq!(match_score(&read, &stored), 4);
    }

    #[test]
    fn test_amount_mismatch_drops_one_point() {
        let read = record(Some((2024, 3, 1)), "1.23", "DE1111");
        let stored = record(Some((2024, 3, 1)), "1.24", "DE1111");
        assert_eq!(match_score(&read, &stored), 3);
    }

    #[test]
    fn test_iban_mismatch_drops_one_point() {
        let read = record(Some((2024, 3, 1)), "1.23", "DE1111");
        let stored = record(Some((2024, 3, 1)), "1.23", "DE8888");
        assert_eq!(match_score(&read, &stored), 3);
    }

    #[test]
    fn test_date_mismatch_vetoes_everything() {
        let read = record(Some((2024, 3, 1)), "1.23", "DE1111");
        let stored = record(Some((2024, 3, 2)), "1.23", "DE1111");
        assert_eq!(match_score(&read, &stored), DATE_MISMATCH);
    }

    #[test]
    fn test_unpopulated_fields_are_neutral() {
        let read = record(Some((2024, 3, 1)), "1.23", "");
        let stored = record(Some((2024, 3, 1)), "", "DE1111");
        assert_eq!(match_score(&read, &stored), 2);

        let dateless = record(None, "1.23", "DE1111");
        let dated = record(Some((2024, 3, 1)), "1.23", "DE1111");
        // No date veto and no date points when one side has no date.
        assert_eq!(match_score(&dateless, &dated), 2);
    }

    #[test]
    fn test_amount_equality_is_exact_decimal() {
        let read = record(Some((2024, 3, 1)), "1.230", "");
        let stored = record(Some((2024, 3, 1)), "1.23", "");
        // Same numeric value, different textual scale.
        assert_eq!(match_score(&read, &stored), 3);
    }

    #[test]
    fn test_normalize_iban() {
        assert_eq!(normalize_iban("de12 3456-78.90"), "DE1234567890");
        assert_eq!(normalize_iban(" DE1111 "), "DE1111");
    }
}
