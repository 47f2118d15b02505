//! Record persistence.
//!
//! Services talk to a [`RecordStore`] and never to a concrete backend. Two
//! backends exist: [`MemoryStore`] (tests, demos, seeded fixtures) and
//! [`MySqlStore`] (production).

pub mod memory;
pub mod mysql;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

use crate::error::AppError;
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::Employee;
use crate::model::leave_request::LeaveRequest;
use crate::model::payroll::Payroll;
use crate::utils::db_utils::WhereClause;

/// A type the record store can hold.
pub trait Record: Clone + Serialize + Send + Sync + Unpin + 'static {
    /// Table name in the relational backend.
    const TABLE: &'static str;
    /// Human name used in "... not found" messages.
    const KIND: &'static str;
    /// Column list for `ORDER BY` in the relational backend.
    const ORDER_BY: &'static str = "id";

    /// Partial update. Serializes to only the fields being changed.
    type Patch: Serialize + Send + Sync;
    type Filter: Send + Sync;

    fn id(&self) -> &str;

    /// Key that must be unique across stored records, if any.
    fn natural_key(&self) -> Option<String> {
        None
    }

    fn apply(&mut self, patch: &Self::Patch);

    fn matches(&self, filter: &Self::Filter) -> bool;

    fn where_clause(filter: &Self::Filter) -> WhereClause;
}

#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Fails with `Conflict` when the id or natural key is already taken.
    async fn create(&self, record: R) -> Result<R, AppError>;

    async fn get(&self, id: &str) -> Result<Option<R>, AppError>;

    async fn update(&self, id: &str, patch: R::Patch) -> Result<R, AppError>;

    async fn query(&self, filter: &R::Filter) -> Result<Vec<R>, AppError>;

    async fn delete(&self, id: &str) -> Result<R, AppError>;
}

/// One store per record type, shared by every service.
#[derive(Clone)]
pub struct Stores {
    pub attendance: Arc<dyn RecordStore<AttendanceRecord>>,
    pub employees: Arc<dyn RecordStore<Employee>>,
    pub leaves: Arc<dyn RecordStore<LeaveRequest>>,
    pub payroll: Arc<dyn RecordStore<Payroll>>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            attendance: Arc::new(MemoryStore::new()),
            employees: Arc::new(MemoryStore::new()),
            leaves: Arc::new(MemoryStore::new()),
            payroll: Arc::new(MemoryStore::new()),
        }
    }

    pub fn mysql(pool: sqlx::MySqlPool) -> Self {
        Self {
            attendance: Arc::new(MySqlStore::new(pool.clone())),
            employees: Arc::new(MySqlStore::new(pool.clone())),
            leaves: Arc::new(MySqlStore::new(pool.clone())),
            payroll: Arc::new(MySqlStore::new(pool)),
        }
    }
}
