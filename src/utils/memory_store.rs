//! In-memory record store implementation for testing

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::traits::RecordStore;
use crate::types::{ImportError, ImportResult, StoredRecord, TransactionRecord};

/// In-memory record store for testing and development, keyed by bank
/// account id
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<String, Vec<StoredRecord>>>>,
}

impl MemoryStore {
    /// Create a new memory store instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account with records, bypassing the importer (useful for
    /// setting up a reconciliation baseline in tests)
    pub fn seed(&self, account_id: &str, records: Vec<TransactionRecord>) -> Vec<StoredRecord> {
        let mut all = self.records.write().unwrap();
        let account = all.entry(account_id.to_string()).or_default();
        let seeded: Vec<StoredRecord> = records
            .into_iter()
            .map(|record| StoredRecord::new(Uuid::new_v4().to_string(), record))
            .collect();
        account.extend(seeded.clone());
        seeded
    }

    /// All records of an account, including soft-deleted ones
    pub fn all_records(&self, account_id: &str) -> Vec<StoredRecord> {
        self.records
            .read()
            .unwrap()
            .get(account_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.records.write().unwrap().clear();
    }
}

fn in_range(date: Option<NaiveDate>, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    let Some(date) = date else {
        return true;
    };
    from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load_records(
        &self,
        account_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ImportResult<Vec<StoredRecord>> {
        let all = self.records.read().unwrap();
        let records = all
            .get(account_id)
            .map(|account| {
                account
                    .iter()
                    .filter(|stored| !stored.deleted && in_range(stored.record.date, from, to))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(records)
    }

    async fn insert_record(
        &mut self,
        account_id: &str,
        record: TransactionRecord,
    ) -> ImportResult<StoredRecord> {
        let stored = StoredRecord::new(Uuid::new_v4().to_string(), record);
        self.records
            .write()
            .unwrap()
            .entry(account_id.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn update_record(
        &mut self,
        account_id: &str,
        record_id: &str,
        record: TransactionRecord,
    ) -> ImportResult<StoredRecord> {
        let mut all = self.records.write().unwrap();
        let account = all
            .get_mut(account_id)
            .ok_or_else(|| ImportError::Storage(format!("Unknown account: {account_id}")))?;
        let stored = account
            .iter_mut()
            .find(|stored| stored.id == record_id)
            .ok_or_else(|| ImportError::Storage(format!("Record not found: {record_id}")))?;
        stored.record = record;
        stored.updated_at = chrono::Utc::now().naive_utc();
        Ok(stored.clone())
    }

    async fn soft_delete_record(&mut self, account_id: &str, record_id: &str) -> ImportResult<()> {
        let mut all = self.records.write().unwrap();
        let account = all
            .get_mut(account_id)
            .ok_or_else(|| ImportError::Storage(format!("Unknown account: {account_id}")))?;
        let stored = account
            .iter_mut()
            .find(|stored| stored.id == record_id)
            .ok_or_else(|| ImportError::Storage(format!("Record not found: {record_id}")))?;
        stored.deleted = true;
        stored.updated_at = chrono::Utc::now().naive_utc();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(y: i32, m: u32, d: u32) -> TransactionRecord {
        TransactionRecord {
            date: NaiveDate::from_ymd_opt(y, m, d),
            ..TransactionRecord::new()
        }
    }

    #[tokio::test]
    async fn test_soft_deleted_records_are_not_loaded() {
        let mut store = MemoryStore::new();
        let stored = store
            .insert_record("acct", dated(2024, 1, 1))
            .await
            .unwrap();
        store.soft_delete_record("acct", &stored.id).await.unwrap();

        let loaded = store.load_records("acct", None, None).await.unwrap();
        assert!(loaded.is_empty());
        assert_eq!(store.all_records("acct").len(), 1);
    }

    #[tokio::test]
    async fn test_date_range_filter_keeps_dateless_records() {
        let mut store = MemoryStore::new();
        store.insert_record("acct", dated(2024, 1, 1)).await.unwrap();
        store.insert_record("acct", dated(2024, 2, 1)).await.unwrap();
        store
            .insert_record("acct", TransactionRecord::new())
            .await
            .unwrap();

        let loaded = store
            .load_records(
                "acct",
                NaiveDate::from_ymd_opt(2024, 1, 15),
                NaiveDate::from_ymd_opt(2024, 2, 15),
            )
            .await
            .unwrap();
        assert_eq!(loaded.len(), 2);
    }
}
