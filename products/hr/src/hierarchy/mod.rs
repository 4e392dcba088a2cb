//! Reporting structure resolution over the reports-to graph.

mod graph;

pub use graph::ReportGraph;

use tracing::{debug, warn};

use crate::employees::EmployeeService;
use crate::error::HrResult;
use crate::model::{Employee, ReportingStructure};

#[derive(Clone)]
pub struct HierarchyResolver {
    employees: EmployeeService,
}

impl HierarchyResolver {
    pub fn new(employees: EmployeeService) -> Self {
        Self { employees }
    }

    /// Count everyone below `employee_id`, directly or indirectly.
    pub async fn resolve(&self, employee_id: &str) -> HrResult<Option<ReportingStructure>> {
        let Some(employee) = self.employees.get_by_id(employee_id).await? else {
            return Ok(None);
        };
        let mut structure = ReportingStructure::new(employee);
        if structure.employee.report_ids().is_empty() {
            return Ok(Some(structure));
        }
        let graph = self.walk(&structure.employee).await?;
        structure.increase_reports_by(graph.count_reports(&structure.employee.employee_id));
        debug!(
            employee_id = %structure.employee.employee_id,
            reports = structure.number_of_reports,
            "reporting structure resolved"
        );
        Ok(Some(structure))
    }

    /// The reports-to graph below `employee_id`.
    pub async fn subordinates(&self, employee_id: &str) -> HrResult<Option<ReportGraph>> {
        match self.employees.get_by_id(employee_id).await? {
            Some(root) => Ok(Some(self.walk(&root).await?)),
            None => Ok(None),
        }
    }

    /// Expand every reachable employee once, loading each record through the
    /// store. A reference that no longer resolves stays in the graph as a
    /// leaf.
    async fn walk(&self, root: &Employee) -> HrResult<ReportGraph> {
        let mut graph = ReportGraph::new();
        graph.insert(root.employee_id.clone(), root.report_ids());
        let mut pending: Vec<String> = root.report_ids().into_iter().rev().collect();

        while let Some(id) = pending.pop() {
            if graph.contains(&id) {
                continue;
            }
            let reports = match self.employees.get_by_id(&id).await? {
                Some(employee) => employee.report_ids(),
                None => {
                    warn!(
                        manager = %root.employee_id,
                        report = %id,
                        "direct report does not resolve"
                    );
                    Vec::new()
                }
            };
            pending.extend(reports.iter().rev().cloned());
            graph.insert(id, reports);
        }
        Ok(graph)
    }
}
