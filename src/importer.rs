//! Import workflow orchestrator tying column mapping, the record store
//! and the reconciliation engine together
//!
//! This is the in-process entry point the surrounding application calls
//! after it has decoded a statement export into a header row plus data
//! rows. The importer resolves the header against the configured mapping
//! rules, parses the rows into records, loads the stored baseline for the
//! account, reconciles, and drives the resulting pair entries back into
//! the store: `New` becomes an insert, `Modified` an update, `Deleted` a
//! soft-delete, and `Unmodified` is ignored.

use serde::{Deserialize, Serialize};

use crate::mapping::{ColumnMap, ImportSettings};
use crate::reconcile::ReconciliationEngine;
use crate::traits::RecordStore;
use crate::types::{ImportResult, PairEntry, PairStatus, StoredRecord, TransactionRecord};

/// Outcome summary of one committed import run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Records parsed from the import
    pub read_count: usize,
    /// Stored records loaded as the reconciliation baseline
    pub stored_count: usize,
    /// Inserted records
    pub new: usize,
    /// Updated records
    pub modified: usize,
    /// Records left untouched
    pub unmodified: usize,
    /// Soft-deleted records
    pub deleted: usize,
}

/// Import workflow over a storage backend
pub struct Importer<S: RecordStore> {
    store: S,
    engine: ReconciliationEngine,
}

impl<S: RecordStore> Importer<S> {
    /// Create an importer over the given storage backend
    pub fn new(store: S) -> Self {
        Self {
            store,
            engine: ReconciliationEngine::new(),
        }
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Parse a decoded export (header row plus data rows) into records.
    ///
    /// Pure and synchronous; configuration problems have already been
    /// caught when the [`ImportSettings`] were built, and cell-level parse
    /// misses leave the affected field unset.
    pub fn read_records(
        &self,
        settings: &ImportSettings,
        headers: &[String],
        rows: &[Vec<String>],
    ) -> Vec<TransactionRecord> {
        let map = ColumnMap::resolve(settings, headers);
        map.read_records(settings, rows)
    }

    /// Reconcile read records against a stored baseline without touching
    /// the store; callers use this to present the classified diff for
    /// confirmation before committing.
    pub fn reconcile<'a>(
        &self,
        read: &'a [TransactionRecord],
        stored: &'a [StoredRecord],
    ) -> Vec<PairEntry<'a>> {
        self.engine.reconcile(read, stored)
    }

    /// Run a full import: parse, load the stored side, reconcile, and
    /// apply the classified diff to the store.
    pub async fn import(
        &mut self,
        account_id: &str,
        settings: &ImportSettings,
        headers: &[String],
        rows: &[Vec<String>],
    ) -> ImportResult<ImportReport> {
        let read = self.read_records(settings, headers, rows);
        let stored = self.store.load_records(account_id, None, None).await?;

        let mut report = ImportReport {
            read_count: read.len(),
            stored_count: stored.len(),
            new: 0,
            modified: 0,
            unmodified: 0,
            deleted: 0,
        };

        // Collect the store instructions first; the pair entries borrow
        // from `read` and `stored` and must be dropped before writing.
        enum Action {
            Insert(TransactionRecord),
            Update(String, TransactionRecord),
            Delete(String),
        }

        let actions: Vec<Action> = self
            .engine
            .reconcile(&read, &stored)
            .into_iter()
            .filter_map(|entry| match entry.status {
                PairStatus::New => {
                    report.new += 1;
                    entry.read.map(|r| Action::Insert(r.clone()))
                }
                PairStatus::Modified => {
                    report.modified += 1;
                    match (entry.read, entry.stored) {
                        (Some(read), Some(stored)) => {
                            Some(Action::Update(stored.id.clone(), read.clone()))
                        }
                        _ => None,
                    }
                }
                PairStatus::Deleted => {
                    report.deleted += 1;
                    entry.stored.map(|s| Action::Delete(s.id.clone()))
                }
                PairStatus::Unmodified => {
                    report.unmodified += 1;
                    None
                }
            })
            .collect();

        for action in actions {
            match action {
                Action::Insert(record) => {
                    self.store.insert_record(account_id, record).await?;
                }
                Action::Update(id, record) => {
                    self.store.update_record(account_id, &id, record).await?;
                }
                Action::Delete(id) => {
                    self.store.soft_delete_record(account_id, &id).await?;
                }
            }
        }

        Ok(report)
    }
}
