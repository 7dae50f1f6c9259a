//! Pairing engine: buckets records by date and greedily matches within
//! each bucket
//!
//! The engine is a pure, synchronous computation over two borrowed
//! collections. It owns the pairing decisions but never the records, and
//! running it twice over identical input yields identical output.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::reconcile::score::{comparable_fields_equal, match_score};
use crate::types::{PairEntry, PairStatus, StoredRecord, TransactionRecord};

/// Reconciles freshly read records against the stored baseline for one
/// bank account, producing an ordered list of classified [`PairEntry`]s.
#[derive(Debug, Default)]
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Classify every record of both collections into exactly one pair
    /// entry.
    ///
    /// Records are bucketed by date; candidates are only ever compared
    /// within the same-day bucket, so a statement imported a day early or
    /// late surfaces as `New` plus `Deleted` rather than `Modified`.
    /// Within a bucket, each read record (in input order) greedily claims
    /// the not-yet-paired stored record with the strictly highest
    /// non-negative score; score ties keep the earliest stored record in
    /// input order. The greedy order dependence is part of the contract:
    /// an earlier read record may claim a stored record that a later one
    /// would have matched better.
    ///
    /// Output is grouped by bucket date in chronological order (dateless
    /// entries first); within a bucket, matched pairs come before leftover
    /// `New` and `Deleted` entries, each in input order.
    pub fn reconcile<'a>(
        &self,
        read: &'a [TransactionRecord],
        stored: &'a [StoredRecord],
    ) -> Vec<PairEntry<'a>> {
        let mut buckets: BTreeMap<Option<NaiveDate>, Bucket<'a>> = BTreeMap::new();

        for record in read {
            buckets.entry(record.date).or_default().read.push(record);
        }
        for record in stored {
            buckets
                .entry(record.record.date)
                .or_default()
                .stored
                .push(record);
        }

        let mut entries = Vec::with_capacity(read.len() + stored.len());
        for (date, bucket) in buckets {
            match date {
                Some(_) => bucket.pair_by_score(&mut entries),
                None => bucket.pair_by_equality(&mut entries),
            }
        }
        entries
    }
}

/// All records of both sides sharing one transaction date
#[derive(Default)]
struct Bucket<'a> {
    read: Vec<&'a TransactionRecord>,
    stored: Vec<&'a StoredRecord>,
}

impl<'a> Bucket<'a> {
    /// Greedy best-match pairing for a dated bucket
    fn pair_by_score(self, entries: &mut Vec<PairEntry<'a>>) {
        let mut paired = vec![false; self.stored.len()];
        let mut matched = Vec::new();
        let mut unmatched_read = Vec::new();

        for &read in &self.read {
            match self.best_candidate(read, &paired) {
                Some(index) => {
                    paired[index] = true;
                    matched.push(classify(read, self.stored[index]));
                }
                None => unmatched_read.push(PairEntry::new_record(read)),
            }
        }

        Self::emit(entries, matched, unmatched_read, &self.stored, &paired);
    }

    /// A record without a date never buckets with others by proximity; it
    /// only pairs when every populated field matches exactly.
    fn pair_by_equality(self, entries: &mut Vec<PairEntry<'a>>) {
        let mut paired = vec![false; self.stored.len()];
        let mut matched = Vec::new();
        let mut unmatched_read = Vec::new();

        for &read in &self.read {
            let candidate = self
                .stored
                .iter()
                .enumerate()
                .find(|(index, stored)| {
                    !paired[*index] && comparable_fields_equal(read, &stored.record)
                })
                .map(|(index, _)| index);
            match candidate {
                Some(index) => {
                    paired[index] = true;
                    matched.push(PairEntry::matched(
                        read,
                        self.stored[index],
                        PairStatus::Unmodified,
                    ));
                }
                None => unmatched_read.push(PairEntry::new_record(read)),
            }
        }

        Self::emit(entries, matched, unmatched_read, &self.stored, &paired);
    }

    /// The not-yet-paired stored record with the strictly highest
    /// non-negative score. Only a strictly better score displaces the
    /// current candidate, so ties keep the earliest stored record and
    /// repeated runs pair identically.
    fn best_candidate(&self, read: &TransactionRecord, paired: &[bool]) -> Option<usize> {
        let mut best: Option<(i32, usize)> = None;
        for (index, stored) in self.stored.iter().enumerate() {
            if paired[index] {
                continue;
            }
            let score = match_score(read, &stored.record);
            if score < 0 {
                continue;
            }
            if best.is_none_or(|(best_score, _)| score > best_score) {
                best = Some((score, index));
            }
        }
        best.map(|(_, index)| index)
    }

    fn emit(
        entries: &mut Vec<PairEntry<'a>>,
        matched: Vec<PairEntry<'a>>,
        unmatched_read: Vec<PairEntry<'a>>,
        stored: &[&'a StoredRecord],
        paired: &[bool],
    ) {
        entries.extend(matched);
        entries.extend(unmatched_read);
        entries.extend(
            stored
                .iter()
                .zip(paired)
                .filter(|(_, paired)| !**paired)
                .map(|(&record, _)| PairEntry::deleted_record(record)),
        );
    }
}

fn classify<'a>(read: &'a TransactionRecord, stored: &'a StoredRecord) -> PairEntry<'a> {
    let status = if comparable_fields_equal(read, &stored.record) {
        PairStatus::Unmodified
    } else {
        PairStatus::Modified
    };
    PairEntry::matched(read, stored, status)
}
