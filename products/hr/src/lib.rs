//! HR vertical slice: employee records, the reporting hierarchy derived from
//! them, and time-effective compensation.
//!
//! Every component receives its [`StoreHandle`] at construction; nothing in
//! this crate holds global state.

pub mod compensation;
pub mod employees;
pub mod error;
pub mod hierarchy;
pub mod model;
pub mod store;

pub use compensation::CompensationLedger;
pub use employees::EmployeeService;
pub use error::{HrError, HrResult, StoreError, StoreResult};
pub use hierarchy::{HierarchyResolver, ReportGraph};
pub use model::{Compensation, DirectReport, Employee, ReportingStructure};
pub use store::{Batch, MemoryStore, RecordStore, StoreHandle};
