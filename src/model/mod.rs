pub mod admin;
pub mod document;
pub mod employee;
pub mod payroll;
