use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use super::{Batch, RecordStore, Write, assign_id};
use crate::error::{StoreError, StoreResult};
use crate::model::{Compensation, Employee};

#[derive(Clone, Debug, Default)]
struct Tables {
    employees: HashMap<String, Employee>,
    /// Creation order.
    compensations: Vec<Compensation>,
}

impl Tables {
    fn apply(&mut self, write: Write) -> StoreResult<()> {
        match write {
            Write::AddEmployee(employee) => {
                if self.employees.contains_key(&employee.employee_id) {
                    return Err(StoreError::DuplicateId {
                        id: employee.employee_id,
                    });
                }
                self.employees.insert(employee.employee_id.clone(), employee);
            }
            Write::RemoveEmployee(id) => {
                if self.employees.remove(&id).is_none() {
                    return Err(StoreError::MissingRecord { id });
                }
            }
            Write::AddCompensation(compensation) => self.compensations.push(compensation),
        }
        Ok(())
    }
}

/// In-process store. Batches are applied to a copy of the tables that is
/// swapped in only when every write succeeds.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
    failing_commits: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with committed employees.
    pub fn with_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        let store = Self::new();
        {
            let mut tables = lock(&store.tables);
            for mut employee in employees {
                assign_id(&mut employee);
                tables.employees.insert(employee.employee_id.clone(), employee);
            }
        }
        store
    }

    /// Number of reads and commits made on this store.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make the next `count` commits fail with a backend error.
    pub fn fail_next_commits(&self, count: usize) {
        self.failing_commits.store(count, Ordering::SeqCst);
    }

    pub fn employee_count(&self) -> usize {
        lock(&self.tables).employees.len()
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn take_injected_failure(&self) -> bool {
        self.failing_commits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_employee(&self, id: &str) -> StoreResult<Option<Employee>> {
        self.touch();
        Ok(lock(&self.tables).employees.get(id).cloned())
    }

    async fn get_compensation(&self, employee_id: &str) -> StoreResult<Option<Compensation>> {
        self.touch();
        Ok(lock(&self.tables)
            .compensations
            .iter()
            .rev()
            .find(|c| c.employee_id == employee_id)
            .cloned())
    }

    async fn compensation_history(&self, employee_id: &str) -> StoreResult<Vec<Compensation>> {
        self.touch();
        Ok(lock(&self.tables)
            .compensations
            .iter()
            .filter(|c| c.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn commit(&self, batch: Batch) -> StoreResult<()> {
        self.touch();
        if self.take_injected_failure() {
            return Err(StoreError::backend("injected commit failure"));
        }
        let mut tables = lock(&self.tables);
        let mut next = tables.clone();
        let applied = batch.len();
        for write in batch.into_writes() {
            next.apply(write)?;
        }
        *tables = next;
        debug!(applied, "memory store commit");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn staged_add_is_invisible_until_commit() {
        let store = MemoryStore::new();
        let mut batch = store.begin();
        let debbie = Employee::new("Debbie", "Downer", "Receiver", "Complaints");
        let staged = batch.add_employee(debbie);
        assert!(store.get_employee(&staged.employee_id).await.unwrap().is_none());

        store.commit(batch).await.unwrap();
        let stored = store.get_employee(&staged.employee_id).await.unwrap();
        assert_eq!(stored, Some(staged));
    }

    #[tokio::test]
    async fn duplicate_id_rejects_whole_batch() {
        let store = MemoryStore::with_employees([Employee::default().with_id("abc")]);
        let mut batch = store.begin();
        batch.add_employee(Employee::default().with_id("new"));
        batch.add_employee(Employee::default().with_id("abc"));
        let err = store.commit(batch).await.unwrap_err();
        assert_eq!(err, StoreError::DuplicateId { id: "abc".into() });
        assert!(store.get_employee("new").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_then_add_same_id_in_one_batch() {
        let original =
            Employee::new("Ringo", "Starr", "Developer V", "Engineering").with_id("abc");
        let store = MemoryStore::with_employees([original.clone()]);
        let mut batch = store.begin();
        batch.remove_employee(&original);
        let pete = Employee::new("Pete", "Best", "Developer VI", "Engineering").with_id("abc");
        batch.add_employee(pete);
        store.commit(batch).await.unwrap();

        let stored = store.get_employee("abc").await.unwrap().unwrap();
        assert_eq!(stored.first_name, "Pete");
        assert_eq!(store.employee_count(), 1);
    }

    #[tokio::test]
    async fn removing_missing_record_fails_commit() {
        let store = MemoryStore::new();
        let mut batch = store.begin();
        batch.remove_employee(&Employee::default().with_id("ghost"));
        let err = store.commit(batch).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingRecord { .. }));
    }

    #[tokio::test]
    async fn dropped_batch_writes_nothing() {
        let store = MemoryStore::new();
        let mut batch = store.begin();
        batch.add_employee(Employee::default().with_id("abc"));
        drop(batch);
        store.commit(store.begin()).await.unwrap();
        assert_eq!(store.employee_count(), 0);
    }

    #[tokio::test]
    async fn injected_failure_leaves_tables_untouched() {
        let store = MemoryStore::new();
        store.fail_next_commits(1);
        let mut batch = store.begin();
        batch.add_employee(Employee::default().with_id("abc"));
        assert!(store.commit(batch.clone()).await.is_err());
        assert_eq!(store.employee_count(), 0);

        store.commit(batch).await.unwrap();
        assert_eq!(store.employee_count(), 1);
    }

    #[tokio::test]
    async fn failed_batch_does_not_touch_a_concurrent_one() {
        let store = MemoryStore::new();
        let mut create = store.begin();
        let debbie = Employee::new("Debbie", "Downer", "Receiver", "Complaints");
        let debbie = create.add_employee(debbie);

        let mut stale = store.begin();
        stale.remove_employee(&Employee::default().with_id("already-gone"));
        assert!(store.commit(stale).await.is_err());

        store.commit(create).await.unwrap();
        let stored = store.get_employee(&debbie.employee_id).await.unwrap();
        assert_eq!(stored, Some(debbie));
    }

    #[tokio::test]
    async fn latest_compensation_wins() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let mut batch = store.begin();
        for salary in [100, 200, 150] {
            batch.add_compensation(Compensation::new("abc", Decimal::from(salary), now));
        }
        batch.add_compensation(Compensation::new("other", Decimal::from(999), now));
        store.commit(batch).await.unwrap();

        let latest = store.get_compensation("abc").await.unwrap().unwrap();
        assert_eq!(latest.salary, Decimal::from(150));
        assert_eq!(store.compensation_history("abc").await.unwrap().len(), 3);
        assert!(store.get_compensation("nobody").await.unwrap().is_none());
    }
}
