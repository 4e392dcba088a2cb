use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A person on the org chart.
///
/// `employee_id` is empty until a store assigns one. `direct_reports` holds
/// references only; the full record of a subordinate is looked up by id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_reports: Option<Vec<DirectReport>>,
}

impl Employee {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        position: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            position: position.into(),
            department: department.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.employee_id = id.into();
        self
    }

    pub fn with_reports<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.direct_reports = Some(ids.into_iter().map(DirectReport::new).collect());
        self
    }

    pub fn has_id(&self) -> bool {
        !self.employee_id.trim().is_empty()
    }

    /// Ids of direct subordinates in declared order. Absent and empty lists
    /// both yield an empty vector.
    pub fn report_ids(&self) -> Vec<String> {
        self.direct_reports
            .iter()
            .flatten()
            .map(|report| report.employee_id.clone())
            .collect()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Edge from a manager to one subordinate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectReport {
    pub employee_id: String,
}

impl DirectReport {
    pub fn new(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
        }
    }
}

/// Salary that takes effect for an employee on a given date.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Compensation {
    /// Id of the employee this record belongs to.
    #[serde(rename = "employee")]
    pub employee_id: String,
    pub salary: Decimal,
    pub effective_date: DateTime<Utc>,
}

impl Compensation {
    pub fn new(
        employee_id: impl Into<String>,
        salary: Decimal,
        effective_date: DateTime<Utc>,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            salary,
            effective_date,
        }
    }
}

/// An employee paired with the number of people below them.
///
/// Built fresh for every resolution and never stored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingStructure {
    pub employee: Employee,
    pub number_of_reports: usize,
}

impl ReportingStructure {
    pub fn new(employee: Employee) -> Self {
        Self {
            employee,
            number_of_reports: 0,
        }
    }

    pub fn increase_reports_by(&mut self, count: usize) {
        self.number_of_reports += count;
    }
}
