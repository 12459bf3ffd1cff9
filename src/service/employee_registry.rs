use tracing::info;

use crate::error::{LedgerError, Result};
use crate::model::employee::{Employee, EmployeeUpdate};
use crate::store::PersistentStore;

/// CRUD over the `employees` collection.
#[derive(Debug, Clone)]
pub struct EmployeeRegistry {
    store: PersistentStore,
}

impl EmployeeRegistry {
    pub fn new(store: PersistentStore) -> Self {
        Self { store }
    }

    /// Stores a new employee under the next free id.
    pub fn add(&self, name: &str, department: &str, salary: f64) -> Result<Employee> {
        let name = validate_name(name)?;
        validate_salary(salary)?;

        let employee = self.store.with_document(|doc| {
            let employee = Employee {
                id: doc.next_employee_id(),
                name,
                department: department.trim().to_string(),
                salary,
            };
            doc.employees.push(employee.clone());
            Ok(employee)
        })?;

        info!(employee_id = employee.id, name = %employee.name, "employee added");
        Ok(employee)
    }

    pub fn get(&self, id: u64) -> Option<Employee> {
        self.store.load().employee(id).cloned()
    }

    pub fn update(&self, id: u64, changes: EmployeeUpdate) -> Result<Employee> {
        let name = changes.name.as_deref().map(validate_name).transpose()?;
        if let Some(salary) = changes.salary {
            validate_salary(salary)?;
        }

        let employee = self.store.with_document(|doc| {
            let employee = doc
                .employees
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| LedgerError::not_found("employee", id))?;

            if let Some(name) = name {
                employee.name = name;
            }
            if let Some(department) = &changes.department {
                employee.department = department.trim().to_string();
            }
            if let Some(salary) = changes.salary {
                employee.salary = salary;
            }
            Ok(employee.clone())
        })?;

        info!(employee_id = id, "employee updated");
        Ok(employee)
    }

    /// Removes the employee; `false` when there was nothing to remove.
    /// Payroll records keep pointing at the deleted id.
    pub fn delete(&self, id: u64) -> Result<bool> {
        let removed = self.store.with_document(|doc| {
            let before = doc.employees.len();
            doc.employees.retain(|e| e.id != id);
            Ok(doc.employees.len() != before)
        })?;

        if removed {
            info!(employee_id = id, "employee deleted");
        }
        Ok(removed)
    }

    /// All employees in insertion order.
    pub fn list(&self) -> Vec<Employee> {
        self.store.load().employees
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::Validation("employee name is required".into()));
    }
    Ok(name.to_string())
}

fn validate_salary(salary: f64) -> Result<()> {
    if !salary.is_finite() || salary < 0.0 {
        return Err(LedgerError::Validation(format!(
            "salary must be a non-negative amount, got {}",
            salary
        )));
    }
    Ok(())
}
