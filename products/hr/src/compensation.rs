use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{HrError, HrResult};
use crate::model::Compensation;
use crate::store::StoreHandle;

/// Append-only salary records keyed by employee id.
#[derive(Clone)]
pub struct CompensationLedger {
    store: StoreHandle,
}

impl CompensationLedger {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Record a new compensation. Earlier records for the same employee are
    /// kept. Salaries are stored to the cent.
    pub async fn create(
        &self,
        compensation: Option<Compensation>,
    ) -> HrResult<Option<Compensation>> {
        let Some(mut compensation) = compensation else {
            return Ok(None);
        };
        if compensation.employee_id.trim().is_empty() {
            return Err(HrError::InvalidInput("compensation needs an employee id".into()));
        }
        if compensation.salary < Decimal::ZERO {
            return Err(HrError::InvalidInput(format!(
                "salary must not be negative, got {}",
                compensation.salary
            )));
        }
        compensation.salary = compensation.salary.round_dp(2);
        debug!(employee_id = %compensation.employee_id, "creating compensation");

        let mut batch = self.store.begin();
        let stored = batch.add_compensation(compensation);
        self.store.commit(batch).await?;
        info!(
            employee_id = %stored.employee_id,
            effective = %stored.effective_date,
            "compensation recorded"
        );
        Ok(Some(stored))
    }

    /// Most recently created record for the employee.
    pub async fn get_by_employee_id(&self, employee_id: &str) -> HrResult<Option<Compensation>> {
        let employee_id = employee_id.trim();
        if employee_id.is_empty() {
            return Ok(None);
        }
        Ok(self.store.get_compensation(employee_id).await?)
    }

    /// All records for the employee, oldest first.
    pub async fn history(&self, employee_id: &str) -> HrResult<Vec<Compensation>> {
        let employee_id = employee_id.trim();
        if employee_id.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.store.compensation_history(employee_id).await?)
    }

    /// The record in force at `at`: latest effective date not after `at`,
    /// later creation breaking ties.
    pub async fn effective_at(
        &self,
        employee_id: &str,
        at: DateTime<Utc>,
    ) -> HrResult<Option<Compensation>> {
        let history = self.history(employee_id).await?;
        Ok(history
            .into_iter()
            .enumerate()
            .filter(|(_, c)| c.effective_date <= at)
            .max_by_key(|(created, c)| (c.effective_date, *created))
            .map(|(_, c)| c))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::store::MemoryStore;

    fn ledger() -> (Arc<MemoryStore>, CompensationLedger) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), CompensationLedger::new(store))
    }

    fn jan(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn create_then_fetch() {
        let (_, ledger) = ledger();
        let input = Compensation::new("e-1", Decimal::new(12_300_000, 2), jan(15));
        let created = ledger.create(Some(input.clone())).await.unwrap().unwrap();
        assert_eq!(created, input);

        let fetched = ledger.get_by_employee_id("e-1").await.unwrap().unwrap();
        assert_eq!(fetched.employee_id, "e-1");
        assert_eq!(fetched.salary, Decimal::new(123_000, 0));
        assert_eq!(fetched.effective_date, jan(15));
    }

    #[tokio::test]
    async fn none_and_blank_skip_store() {
        let (store, ledger) = ledger();
        assert_eq!(ledger.create(None).await.unwrap(), None);
        assert_eq!(ledger.get_by_employee_id("").await.unwrap(), None);
        assert!(ledger.history(" ").await.unwrap().is_empty());
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn negative_salary_rejected() {
        let (store, ledger) = ledger();
        let err = ledger
            .create(Some(Compensation::new("e-1", Decimal::new(-1, 0), jan(1))))
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::InvalidInput(_)));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn zero_salary_allowed_and_rounded_to_cents() {
        let (_, ledger) = ledger();
        let zero = ledger
            .create(Some(Compensation::new("e-1", Decimal::ZERO, jan(1))))
            .await
            .unwrap()
            .unwrap();
        assert!(zero.salary.is_zero());
        let rounded = ledger
            .create(Some(Compensation::new("e-1", Decimal::new(1_005, 3), jan(2))))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rounded.salary, Decimal::new(100, 2));
    }

    #[tokio::test]
    async fn later_creation_wins_and_history_is_kept() {
        let (_, ledger) = ledger();
        for (salary, day) in [(100, 20), (200, 1), (300, 10)] {
            ledger
                .create(Some(Compensation::new("e-1", Decimal::from(salary), jan(day))))
                .await
                .unwrap();
        }
        let latest = ledger.get_by_employee_id("e-1").await.unwrap().unwrap();
        assert_eq!(latest.salary, Decimal::from(300));
        let history = ledger.history("e-1").await.unwrap();
        let salaries: Vec<_> = history.iter().map(|c| c.salary).collect();
        assert_eq!(salaries, vec![Decimal::from(100), Decimal::from(200), Decimal::from(300)]);
    }

    #[tokio::test]
    async fn effective_at_picks_record_in_force() {
        let (_, ledger) = ledger();
        for (salary, day) in [(100, 1), (300, 20), (200, 10), (250, 10)] {
            ledger
                .create(Some(Compensation::new("e-1", Decimal::from(salary), jan(day))))
                .await
                .unwrap();
        }
        let at = |day| ledger.effective_at("e-1", jan(day));
        assert_eq!(at(1).await.unwrap().unwrap().salary, Decimal::from(100));
        assert_eq!(at(15).await.unwrap().unwrap().salary, Decimal::from(250));
        assert_eq!(at(25).await.unwrap().unwrap().salary, Decimal::from(300));
        assert!(
            ledger
                .effective_at("e-1", jan(1) - Duration::days(1))
                .await
                .unwrap()
                .is_none()
        );
    }
}
