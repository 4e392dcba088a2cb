//! Record store contract.
//!
//! Reads see committed state. Writes are collected in a [`Batch`] owned by
//! one operation and only take effect when [`RecordStore::commit`] applies
//! that batch at once. Dropping a batch discards it.

mod batch;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::model::{Compensation, Employee};

pub use batch::{Batch, Write};
pub use memory::MemoryStore;

/// Shared store handle injected into every service.
pub type StoreHandle = Arc<dyn RecordStore>;

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_employee(&self, id: &str) -> StoreResult<Option<Employee>>;

    /// Most recently created compensation for the employee.
    async fn get_compensation(&self, employee_id: &str) -> StoreResult<Option<Compensation>>;

    /// Every compensation for the employee, oldest first.
    async fn compensation_history(&self, employee_id: &str) -> StoreResult<Vec<Compensation>>;

    /// Empty unit of work for a single operation.
    fn begin(&self) -> Batch {
        Batch::default()
    }

    /// Apply `batch` atomically, in staging order. On error nothing from the
    /// batch is visible and committed state is unchanged.
    async fn commit(&self, batch: Batch) -> StoreResult<()>;
}

/// Id the store will use for a new record.
pub fn assign_id(employee: &mut Employee) {
    if !employee.has_id() {
        employee.employee_id = uuid::Uuid::new_v4().to_string();
    }
}
