//! Payroll record keeping over a single JSON document: an employee
//! registry, a payroll ledger that pays each employee at most once per
//! calendar month, batch runs, reports and timestamped backups.

pub mod api;
pub mod auth;
pub mod config;
pub mod docs;
pub mod error;
pub mod model;
pub mod routes;
pub mod service;
pub mod store;
pub mod utils;
