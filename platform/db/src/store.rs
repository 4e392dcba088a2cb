use async_trait::async_trait;
use chrono::Utc;
use entity::{compensation, direct_report, employee};
use products_hr::store::Write;
use products_hr::{
    Batch, Compensation, DirectReport, Employee, RecordStore, StoreError, StoreResult,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{debug, warn};

/// Record store over a sea-orm connection.
///
/// Holds no pending writes; `commit` replays the caller's batch inside a
/// single database transaction.
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn backend(err: DbErr) -> StoreError {
    StoreError::backend(err.to_string())
}

async fn load_reports<C: ConnectionTrait>(
    db: &C,
    manager_id: &str,
) -> Result<Vec<DirectReport>, DbErr> {
    let edges = direct_report::Entity::find()
        .filter(direct_report::Column::ManagerId.eq(manager_id))
        .order_by_asc(direct_report::Column::Ordinal)
        .all(db)
        .await?;
    Ok(edges
        .into_iter()
        .map(|edge| DirectReport::new(edge.report_id))
        .collect())
}

fn to_employee(model: employee::Model, reports: Vec<DirectReport>) -> Employee {
    Employee {
        employee_id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        position: model.position,
        department: model.department,
        direct_reports: Some(reports),
    }
}

fn to_compensation(model: compensation::Model) -> Compensation {
    Compensation {
        employee_id: model.employee_id,
        salary: Decimal::new(model.salary_cents, 2),
        effective_date: model.effective_date.with_timezone(&Utc),
    }
}

fn salary_cents(salary: Decimal) -> StoreResult<i64> {
    (salary.round_dp(2) * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or_else(|| StoreError::backend(format!("salary {salary} does not fit in cents")))
}

async fn apply(txn: &DatabaseTransaction, write: Write) -> StoreResult<()> {
    match write {
        Write::AddEmployee(employee) => insert_employee(txn, employee).await,
        Write::RemoveEmployee(id) => delete_employee(txn, id).await,
        Write::AddCompensation(compensation) => insert_compensation(txn, compensation).await,
    }
}

async fn insert_compensation(
    txn: &DatabaseTransaction,
    compensation: Compensation,
) -> StoreResult<()> {
    let created_at: DateTimeWithTimeZone = Utc::now().into();
    let row = compensation::ActiveModel {
        id: NotSet,
        employee_id: Set(compensation.employee_id),
        salary_cents: Set(salary_cents(compensation.salary)?),
        effective_date: Set(compensation.effective_date.into()),
        created_at: Set(created_at),
    };
    compensation::Entity::insert(row)
        .exec_without_returning(txn)
        .await
        .map_err(backend)?;
    Ok(())
}

async fn insert_employee(txn: &DatabaseTransaction, employee: Employee) -> StoreResult<()> {
    let existing = employee::Entity::find_by_id(employee.employee_id.as_str())
        .one(txn)
        .await
        .map_err(backend)?;
    if existing.is_some() {
        return Err(StoreError::DuplicateId {
            id: employee.employee_id,
        });
    }

    let reports = employee.report_ids();
    let row = employee::ActiveModel {
        id: Set(employee.employee_id.clone()),
        first_name: Set(employee.first_name),
        last_name: Set(employee.last_name),
        position: Set(employee.position),
        department: Set(employee.department),
    };
    employee::Entity::insert(row)
        .exec_without_returning(txn)
        .await
        .map_err(backend)?;

    if reports.is_empty() {
        return Ok(());
    }
    let mut edges = Vec::with_capacity(reports.len());
    for (ordinal, report_id) in reports.into_iter().enumerate() {
        let ordinal = i32::try_from(ordinal)
            .map_err(|_| StoreError::backend("too many direct reports"))?;
        edges.push(direct_report::ActiveModel {
            manager_id: Set(employee.employee_id.clone()),
            ordinal: Set(ordinal),
            report_id: Set(report_id),
        });
    }
    direct_report::Entity::insert_many(edges)
        .exec_without_returning(txn)
        .await
        .map_err(backend)?;
    Ok(())
}

async fn delete_employee(txn: &DatabaseTransaction, id: String) -> StoreResult<()> {
    // sqlite only honours ON DELETE CASCADE with foreign_keys enabled.
    direct_report::Entity::delete_many()
        .filter(direct_report::Column::ManagerId.eq(id.as_str()))
        .exec(txn)
        .await
        .map_err(backend)?;
    let removed = employee::Entity::delete_by_id(id.as_str())
        .exec(txn)
        .await
        .map_err(backend)?;
    if removed.rows_affected == 0 {
        return Err(StoreError::MissingRecord { id });
    }
    Ok(())
}

#[async_trait]
impl RecordStore for SeaOrmStore {
    async fn get_employee(&self, id: &str) -> StoreResult<Option<Employee>> {
        let Some(model) = employee::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(backend)?
        else {
            return Ok(None);
        };
        let reports = load_reports(&self.db, &model.id).await.map_err(backend)?;
        Ok(Some(to_employee(model, reports)))
    }

    async fn get_compensation(&self, employee_id: &str) -> StoreResult<Option<Compensation>> {
        let latest = compensation::Entity::find()
            .filter(compensation::Column::EmployeeId.eq(employee_id))
            .order_by_desc(compensation::Column::Id)
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(latest.map(to_compensation))
    }

    async fn compensation_history(&self, employee_id: &str) -> StoreResult<Vec<Compensation>> {
        let rows = compensation::Entity::find()
            .filter(compensation::Column::EmployeeId.eq(employee_id))
            .order_by_asc(compensation::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(to_compensation).collect())
    }

    async fn commit(&self, batch: Batch) -> StoreResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let size = batch.len();
        let txn = self.db.begin().await.map_err(backend)?;
        for write in batch.into_writes() {
            if let Err(err) = apply(&txn, write).await {
                warn!(error = %err, size, "commit failed; rolling back batch");
                txn.rollback().await.map_err(backend)?;
                return Err(err);
            }
        }
        txn.commit().await.map_err(backend)?;
        debug!(size, "batch committed");
        Ok(())
    }
}
