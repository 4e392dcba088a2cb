pub mod compensation;
pub mod direct_report;
pub mod employee;
