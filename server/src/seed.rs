use anyhow::{Context, Result};
use platform_api::{ApiError, Directory};
use products_hr::Employee;
use tracing::info;

const FIXTURE: &str = include_str!("../seed/employees.json");

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub skipped: usize,
}

pub fn fixture() -> Result<Vec<Employee>> {
    serde_json::from_str(FIXTURE).context("parsing bundled employee fixture")
}

/// Load the fixture, leaving employees that already exist untouched.
pub async fn seed(directory: &Directory) -> Result<SeedReport> {
    let mut report = SeedReport::default();
    for employee in fixture()? {
        match directory.get_employee(&employee.employee_id).await {
            Ok(_) => report.skipped += 1,
            Err(ApiError::NotFound { .. }) => {
                directory.create_employee(Some(employee)).await?;
                report.created += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
    info!(created = report.created, skipped = report.skipped, "seed finished");
    Ok(report)
}
