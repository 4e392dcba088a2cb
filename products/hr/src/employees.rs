use tracing::{debug, info, warn};

use crate::error::HrResult;
use crate::model::Employee;
use crate::store::StoreHandle;

/// Creates, fetches, and replaces employee records.
#[derive(Clone)]
pub struct EmployeeService {
    store: StoreHandle,
}

impl EmployeeService {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Store a new employee. `None` is returned untouched without a store call.
    pub async fn create(&self, employee: Option<Employee>) -> HrResult<Option<Employee>> {
        let Some(employee) = employee else {
            return Ok(None);
        };
        debug!(name = %employee.full_name(), "creating employee");
        let mut batch = self.store.begin();
        let stored = batch.add_employee(employee);
        self.store.commit(batch).await?;
        info!(employee_id = %stored.employee_id, "employee created");
        Ok(Some(stored))
    }

    /// Blank ids resolve to `None` without a store call.
    pub async fn get_by_id(&self, id: &str) -> HrResult<Option<Employee>> {
        let id = id.trim();
        if id.is_empty() {
            return Ok(None);
        }
        Ok(self.store.get_employee(id).await?)
    }

    /// Swap `original` for `replacement` while keeping the original id.
    ///
    /// `original` must already be resolved; `None` makes this a no-op that
    /// hands `replacement` back. With no replacement the original is only
    /// removed. Removal and insert commit as one batch, so a failure leaves
    /// the original in place.
    pub async fn replace(
        &self,
        original: Option<&Employee>,
        replacement: Option<Employee>,
    ) -> HrResult<Option<Employee>> {
        let Some(original) = original else {
            return Ok(replacement);
        };
        debug!(employee_id = %original.employee_id, "replacing employee");

        let mut batch = self.store.begin();
        batch.remove_employee(original);
        let stored = replacement.map(|mut replacement| {
            replacement.employee_id = original.employee_id.clone();
            batch.add_employee(replacement)
        });
        if let Err(err) = self.store.commit(batch).await {
            warn!(employee_id = %original.employee_id, error = %err, "replace discarded");
            return Err(err.into());
        }
        info!(
            employee_id = %original.employee_id,
            removed_only = stored.is_none(),
            "employee replaced"
        );
        Ok(stored)
    }
}
