//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::types::{ImportResult, StoredRecord, TransactionRecord};

/// Storage abstraction for previously imported transaction records.
///
/// This trait is the seam to the surrounding application's persistence
/// layer (PostgreSQL, SQLite, in-memory, ...). The reconciliation core
/// loads the stored side through it, and the importer drives the
/// create/update/soft-delete decisions back through it. Transactional
/// boundaries around those writes are the implementor's concern.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Load all not-deleted records for one bank account, optionally
    /// restricted to a date range (inclusive on both ends; records without
    /// a date are always included)
    async fn load_records(
        &self,
        account_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ImportResult<Vec<StoredRecord>>;

    /// Persist a freshly imported record, assigning it an identity
    async fn insert_record(
        &mut self,
        account_id: &str,
        record: TransactionRecord,
    ) -> ImportResult<StoredRecord>;

    /// Replace the payload of an existing record with the freshly read
    /// values
    async fn update_record(
        &mut self,
        account_id: &str,
        record_id: &str,
        record: TransactionRecord,
    ) -> ImportResult<StoredRecord>;

    /// Soft-delete a record; it stays addressable but is excluded from
    /// future reconciliation runs
    async fn soft_delete_record(&mut self, account_id: &str, record_id: &str) -> ImportResult<()>;
}
