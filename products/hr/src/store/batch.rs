use super::assign_id;
use crate::model::{Compensation, Employee};

/// One staged write.
#[derive(Clone, Debug, PartialEq)]
pub enum Write {
    AddEmployee(Employee),
    RemoveEmployee(String),
    AddCompensation(Compensation),
}

/// Writes staged by a single operation.
///
/// A batch is plain data owned by its caller, so two operations sharing a
/// store handle never see or discard each other's pending writes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Batch {
    writes: Vec<Write>,
}

impl Batch {
    /// Stage an insert. An empty id is replaced with a fresh UUID; the
    /// returned record is exactly what the commit will write.
    pub fn add_employee(&mut self, mut employee: Employee) -> Employee {
        assign_id(&mut employee);
        self.writes.push(Write::AddEmployee(employee.clone()));
        employee
    }

    /// Stage a delete of the record with `employee.employee_id`.
    pub fn remove_employee(&mut self, employee: &Employee) {
        let id = employee.employee_id.clone();
        self.writes.push(Write::RemoveEmployee(id));
    }

    pub fn add_compensation(&mut self, compensation: Compensation) -> Compensation {
        self.writes.push(Write::AddCompensation(compensation.clone()));
        compensation
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn into_writes(self) -> Vec<Write> {
        self.writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_assigns_missing_id_only() {
        let mut batch = Batch::default();
        let fresh =
            batch.add_employee(Employee::new("Debbie", "Downer", "Receiver", "Complaints"));
        let kept = batch.add_employee(Employee::default().with_id("abc"));
        assert!(fresh.has_id());
        assert_eq!(kept.employee_id, "abc");
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn writes_keep_staging_order() {
        let ringo = Employee::default().with_id("abc");
        let mut batch = Batch::default();
        batch.remove_employee(&ringo);
        batch.add_employee(ringo.clone());
        assert_eq!(
            batch.into_writes(),
            vec![Write::RemoveEmployee("abc".into()), Write::AddEmployee(ringo)]
        );
    }
}
