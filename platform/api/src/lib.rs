//! Outward contract of the employee directory, independent of transport.
//!
//! Core services report absence as `Ok(None)`; here it becomes
//! [`ApiError::NotFound`] so every surface maps it the same way.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use products_hr::{
    Compensation, CompensationLedger, Employee, EmployeeService, HierarchyResolver, HrError,
    ReportGraph, ReportingStructure, StoreHandle,
};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },
    #[error("bad request: {0}")]
    InvalidInput(String),
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

/// Serializable error payload; internals stay hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(Arc::new(err))
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            message: self.to_string(),
        }
    }

    fn not_found(resource: &'static str, id: &str) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

impl From<HrError> for ApiError {
    fn from(value: HrError) -> Self {
        match value {
            HrError::InvalidInput(message) => Self::InvalidInput(message),
            other => Self::internal(other.into()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value)
    }
}

/// Employee, hierarchy, and compensation operations over one store handle.
#[derive(Clone)]
pub struct Directory {
    employees: EmployeeService,
    hierarchy: HierarchyResolver,
    compensation: CompensationLedger,
}

impl Directory {
    pub fn new(store: StoreHandle) -> Self {
        let employees = EmployeeService::new(store.clone());
        Self {
            hierarchy: HierarchyResolver::new(employees.clone()),
            compensation: CompensationLedger::new(store),
            employees,
        }
    }

    /// `None` in, `None` out.
    pub async fn create_employee(&self, employee: Option<Employee>) -> ApiResult<Option<Employee>> {
        if let Some(employee) = &employee {
            debug!(name = %employee.full_name(), "received employee create request");
        }
        Ok(self.employees.create(employee).await?)
    }

    pub async fn get_employee(&self, id: &str) -> ApiResult<Employee> {
        debug!(id, "received employee get request");
        self.employees
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("employee", id))
    }

    /// Replace the employee stored under `id`; the result keeps `id`.
    pub async fn replace_employee(&self, id: &str, employee: Employee) -> ApiResult<Employee> {
        debug!(id, "received employee update request");
        let existing = self
            .employees
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("employee", id))?;
        self.employees
            .replace(Some(&existing), Some(employee))
            .await?
            .ok_or_else(|| ApiError::internal(anyhow::anyhow!("replacement for {id} was dropped")))
    }

    pub async fn reporting_structure(&self, id: &str) -> ApiResult<ReportingStructure> {
        debug!(id, "received reporting structure request");
        self.hierarchy
            .resolve(id)
            .await?
            .ok_or_else(|| ApiError::not_found("employee", id))
    }

    pub async fn org_chart(&self, id: &str) -> ApiResult<ReportGraph> {
        debug!(id, "received org chart request");
        self.hierarchy
            .subordinates(id)
            .await?
            .ok_or_else(|| ApiError::not_found("employee", id))
    }

    /// `None` in, `None` out.
    pub async fn create_compensation(
        &self,
        compensation: Option<Compensation>,
    ) -> ApiResult<Option<Compensation>> {
        if let Some(compensation) = &compensation {
            debug!(employee_id = %compensation.employee_id, "received compensation create request");
        }
        Ok(self.compensation.create(compensation).await?)
    }

    pub async fn compensation(&self, employee_id: &str) -> ApiResult<Compensation> {
        debug!(employee_id, "received compensation get request");
        self.compensation
            .get_by_employee_id(employee_id)
            .await?
            .ok_or_else(|| ApiError::not_found("compensation for employee", employee_id))
    }

    pub async fn compensation_history(&self, employee_id: &str) -> ApiResult<Vec<Compensation>> {
        Ok(self.compensation.history(employee_id).await?)
    }

    pub async fn compensation_at(
        &self,
        employee_id: &str,
        at: DateTime<Utc>,
    ) -> ApiResult<Compensation> {
        self.compensation
            .effective_at(employee_id, at)
            .await?
            .ok_or_else(|| ApiError::not_found("compensation for employee", employee_id))
    }
}
