//! Core types and data structures for the import reconciliation system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One bank transaction as seen by the importer.
///
/// The same shape is used for freshly read records (parsed out of a
/// statement export, transient, no identity) and for the payload of
/// previously stored records. Every field is optional: exports differ
/// wildly in which columns they carry, and a cell that fails to parse
/// simply leaves its field unset (see [`crate::mapping`]).
///
/// Only `date`, `amount`, `subject` and `iban` participate in matching;
/// the remaining fields are carried through unmodified.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Booking date of the transaction
    pub date: Option<NaiveDate>,
    /// Value date, if the export distinguishes it from the booking date
    pub value_date: Option<NaiveDate>,
    /// Signed transaction amount, exact decimal
    pub amount: Option<BigDecimal>,
    /// ISO currency code as found in the export
    pub currency: Option<String>,
    /// Transaction type text (e.g. "SEPA transfer", "Direct Debit")
    pub kind: Option<String>,
    /// Free-text subject / purpose line
    pub subject: Option<String>,
    /// Counterparty account identifier
    pub iban: Option<String>,
    /// Counterparty bank identifier
    pub bic: Option<String>,
    /// Additional remittance information
    pub info: Option<String>,
}

impl TransactionRecord {
    /// Create an empty record with no fields populated
    pub fn new() -> Self {
        Self::default()
    }
}

/// A transaction record as persisted by a previous import run.
///
/// Identity and audit metadata are owned by the persistence collaborator;
/// the reconciliation core only ever reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Persistent identifier assigned by the store
    pub id: String,
    /// The transaction payload
    pub record: TransactionRecord,
    /// When the record was first persisted
    pub created_at: NaiveDateTime,
    /// When the record was last updated
    pub updated_at: NaiveDateTime,
    /// Soft-delete flag; deleted records are excluded from reconciliation
    pub deleted: bool,
}

impl StoredRecord {
    /// Create a stored record wrapper around a transaction payload
    pub fn new(id: String, record: TransactionRecord) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            record,
            created_at: now,
            updated_at: now,
            deleted: false,
        }
    }
}

/// Classification of one reconciliation outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairStatus {
    /// Read record with no stored counterpart; becomes an insert
    New,
    /// Stored record no longer present in the import; becomes a soft-delete
    Deleted,
    /// Matched pair with at least one differing comparable field
    Modified,
    /// Matched pair, all comparable fields equal
    Unmodified,
}

/// One classified outcome of a reconciliation run.
///
/// Holds borrowed references into the two input collections; the engine
/// never takes ownership of or mutates the underlying records. At least
/// one of `read`/`stored` is always present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairEntry<'a> {
    /// The read-side record, absent for `Deleted` entries
    pub read: Option<&'a TransactionRecord>,
    /// The stored-side record, absent for `New` entries
    pub stored: Option<&'a StoredRecord>,
    /// Outcome classification
    pub status: PairStatus,
}

impl<'a> PairEntry<'a> {
    /// A matched pair, classified as modified or unmodified by the engine
    pub fn matched(
        read: &'a TransactionRecord,
        stored: &'a StoredRecord,
        status: PairStatus,
    ) -> Self {
        Self {
            read: Some(read),
            stored: Some(stored),
            status,
        }
    }

    /// A read record with no stored counterpart
    pub fn new_record(read: &'a TransactionRecord) -> Self {
        Self {
            read: Some(read),
            stored: None,
            status: PairStatus::New,
        }
    }

    /// A stored record with no read counterpart
    pub fn deleted_record(stored: &'a StoredRecord) -> Self {
        Self {
            read: None,
            stored: Some(stored),
            status: PairStatus::Deleted,
        }
    }

    /// The date this entry is grouped under: read date if present,
    /// otherwise the stored date
    pub fn bucket_date(&self) -> Option<NaiveDate> {
        self.read
            .and_then(|r| r.date)
            .or_else(|| self.stored.and_then(|s| s.record.date))
    }
}

/// Errors that can occur in the import reconciliation core
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for import operations
pub type ImportResult<T> = Result<T, ImportError>;
