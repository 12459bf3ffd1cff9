use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::admin::Admin;
use super::employee::Employee;
use super::payroll::PayrollRecord;

/// The whole persisted state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub admins: Vec<Admin>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub payroll: Vec<PayrollRecord>,
    #[serde(default)]
    pub sequences: IdSequences,
}

/// Highest identifier ever handed out per collection, so deleting the newest
/// employee does not free its id for reuse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSequences {
    #[serde(default)]
    pub employees: u64,
    #[serde(default)]
    pub payroll: u64,
}

impl Document {
    /// Builds a document from parsed JSON. A bare top-level array is an old
    /// admins-only file.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Array(_) => Ok(Self {
                admins: serde_json::from_value(value)?,
                ..Self::default()
            }),
            other => serde_json::from_value(other),
        }
    }

    pub fn next_employee_id(&mut self) -> u64 {
        let highest = self.employees.iter().map(|e| e.id).max().unwrap_or(0);
        let next = highest.max(self.sequences.employees) + 1;
        self.sequences.employees = next;
        next
    }

    pub fn next_payroll_id(&mut self) -> u64 {
        let highest = self.payroll.iter().map(|r| r.id).max().unwrap_or(0);
        let next = highest.max(self.sequences.payroll) + 1;
        self.sequences.payroll = next;
        next
    }

    pub fn employee(&self, id: u64) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(id: u64) -> Employee {
        Employee {
            id,
            name: format!("emp{}", id),
            department: String::new(),
            salary: 0.0,
        }
    }

    #[test]
    fn empty_object_has_all_collections() {
        let doc = Document::from_value(serde_json::json!({})).unwrap();
        assert_eq!(doc, Document::default());

        let text = serde_json::to_value(&doc).unwrap();
        for key in ["admins", "employees", "payroll"] {
            assert_eq!(text[key], serde_json::json!([]));
        }
    }

    #[test]
    fn bare_array_is_read_as_admins() {
        let doc = Document::from_value(serde_json::json!([
            { "username": "admin", "password": "hash" }
        ]))
        .unwrap();
        assert_eq!(doc.admins.len(), 1);
        assert!(doc.employees.is_empty());
    }

    #[test]
    fn ids_follow_max_and_high_water_mark() {
        let mut doc = Document::default();
        assert_eq!(doc.next_employee_id(), 1);

        doc.employees = vec![employee(4), employee(2)];
        assert_eq!(doc.next_employee_id(), 5);

        doc.employees.clear();
        assert_eq!(doc.next_employee_id(), 6);
    }
}
