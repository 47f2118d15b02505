use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;

use super::{Record, RecordStore};
use crate::error::AppError;

/// Insertion-ordered, process-local record store.
///
/// Every read hands out clones, so callers can never reach stored state.
#[derive(Debug)]
pub struct MemoryStore<R> {
    records: RwLock<Vec<R>>,
}

impl<R: Record> MemoryStore<R> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    fn with_records(records: Vec<R>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Builds a store from fixture records, applying the same id and
    /// natural-key uniqueness as `create`.
    pub fn seeded(records: Vec<R>) -> Result<Self, AppError> {
        let mut checked = Vec::with_capacity(records.len());
        for record in records {
            insert_unique(&mut checked, record)?;
        }
        Ok(Self::with_records(checked))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<R>>, AppError> {
        self.records
            .read()
            .map_err(|_| AppError::internal(format!("{} store lock poisoned", R::TABLE)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<R>>, AppError> {
        self.records
            .write()
            .map_err(|_| AppError::internal(format!("{} store lock poisoned", R::TABLE)))
    }
}

fn insert_unique<R: Record>(records: &mut Vec<R>, record: R) -> Result<(), AppError> {
    if records.iter().any(|r| r.id() == record.id()) {
        return Err(AppError::conflict(format!("{} already exists", R::KIND)));
    }
    if let Some(key) = record.natural_key() {
        if records.iter().any(|r| r.natural_key().as_deref() == Some(key.as_str())) {
            return Err(AppError::conflict(format!("{} already exists", R::KIND)));
        }
    }
    records.push(record);
    Ok(())
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for MemoryStore<R> {
    async fn create(&self, record: R) -> Result<R, AppError> {
        let mut records = self.write()?;
        debug!(table = R::TABLE, id = record.id(), "Inserting record");
        insert_unique(&mut records, record.clone())?;
        Ok(record)
    }

    async fn get(&self, id: &str) -> Result<Option<R>, AppError> {
        Ok(self.read()?.iter().find(|r| r.id() == id).cloned())
    }

    async fn update(&self, id: &str, patch: R::Patch) -> Result<R, AppError> {
        let mut records = self.write()?;
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(AppError::NotFound(R::KIND))?;

        record.apply(&patch);
        debug!(table = R::TABLE, id, "Updated record");
        Ok(record.clone())
    }

    async fn query(&self, filter: &R::Filter) -> Result<Vec<R>, AppError> {
        Ok(self
            .read()?
            .iter()
            .filter(|r| r.matches(filter))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &str) -> Result<R, AppError> {
        let mut records = self.write()?;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(AppError::NotFound(R::KIND))?;

        debug!(table = R::TABLE, id, "Deleting record");
        Ok(records.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::attendance::{
        AttendanceFilter, AttendancePatch, AttendanceRecord, AttendanceStatus, WorkMode,
    };

    fn record(id: &str, employee_id: &str, day: u32) -> AttendanceRecord {
        AttendanceRecord {
            id: id.to_string(),
            employee_id: employee_id.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 2, day).unwrap(),
            check_in: None,
            check_out: None,
            status: AttendanceStatus::Absent,
            work_mode: WorkMode::Office,
            total_hours: 0.0,
        }
    }

    #[actix_web::test]
    async fn create_rejects_duplicate_natural_key() {
        let store = MemoryStore::new();
        store.create(record("a", "E1", 2)).await.unwrap();

        let err = store.create(record("b", "E1", 2)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.query(&AttendanceFilter::default()).await.unwrap().len(), 1);

        store.create(record("c", "E1", 3)).await.unwrap();
        store.create(record("d", "E2", 2)).await.unwrap();
    }

    #[actix_web::test]
    async fn update_and_delete_unknown_ids_fail() {
        let store: MemoryStore<AttendanceRecord> = MemoryStore::new();

        let err = store
            .update("missing", AttendancePatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("Attendance record")));

        let err = store.delete("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn seeded_store_rejects_a_second_record_for_the_same_day() {
        let err = MemoryStore::seeded(vec![record("a", "E1", 2), record("b", "E1", 2)]).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        assert!(MemoryStore::seeded(vec![record("a", "E1", 2), record("b", "E1", 3)]).is_ok());
    }

    #[actix_web::test]
    async fn returned_records_are_copies() {
        let store = MemoryStore::with_records(vec![record("a", "E1", 2)]);

        let mut fetched = store.get("a").await.unwrap().unwrap();
        fetched.total_hours = 99.0;

        assert_eq!(store.get("a").await.unwrap().unwrap().total_hours, 0.0);
    }

    #[actix_web::test]
    async fn query_keeps_insertion_order() {
        let store = MemoryStore::with_records(vec![
            record("a", "E1", 5),
            record("b", "E2", 1),
            record("c", "E1", 3),
        ]);

        let ids: Vec<_> = store
            .query(&AttendanceFilter::for_employee("E1"))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[actix_web::test]
    async fn delete_returns_removed_record() {
        let store = MemoryStore::with_records(vec![record("a", "E1", 2)]);

        let removed = store.delete("a").await.unwrap();
        assert_eq!(removed.id, "a");
        assert!(store.get("a").await.unwrap().is_none());
    }
}
