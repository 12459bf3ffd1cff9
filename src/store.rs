//! Whole-document JSON persistence.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

use crate::error::{LedgerError, Result};
use crate::model::document::Document;

/// Owns the backing file. Everyone else works on a loaded copy and writes
/// it back through [`PersistentStore::save`] or [`PersistentStore::with_document`].
#[derive(Debug, Clone)]
pub struct PersistentStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process only
    lock: Arc<Mutex<()>>,
}

impl PersistentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the backing file. Never fails: a missing, unreadable or
    /// malformed file yields the empty document.
    pub fn load(&self) -> Document {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "data file missing, starting empty");
                return Document::default();
            }
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "data file unreadable, starting empty");
                return Document::default();
            }
        };

        match serde_json::from_slice::<Value>(&bytes).and_then(Document::from_value) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "data file malformed, starting empty");
                Document::default()
            }
        }
    }

    /// Overwrites the backing file with `doc`.
    ///
    /// The document is written to a sibling temp file and renamed over the
    /// target, so a failed write leaves the previous content in place.
    pub fn save(&self, doc: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LedgerError::io(format!("failed to create {}", parent.display()), e)
            })?;
        }

        let mut bytes = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut bytes, PrettyFormatter::with_indent(b"    "));
        doc.serialize(&mut serializer)?;
        bytes.push(b'\n');

        let temp_path = temp_path_for(&self.path);
        fs::write(&temp_path, &bytes).map_err(|e| {
            LedgerError::io(format!("failed to write {}", temp_path.display()), e)
        })?;

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(LedgerError::io(
                format!("failed to replace {}", self.path.display()),
                e,
            ));
        }

        debug!(
            path = %self.path.display(),
            employees = doc.employees.len(),
            payroll = doc.payroll.len(),
            "document saved"
        );
        Ok(())
    }

    /// Load, mutate, save. The document is written back only when `mutator`
    /// succeeds, so a rejected operation leaves the file untouched.
    pub fn with_document<T, F>(&self, mutator: F) -> Result<T>
    where
        F: FnOnce(&mut Document) -> Result<T>,
    {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut doc = self.load();
        let output = mutator(&mut doc)?;
        self.save(&doc)?;
        Ok(output)
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "document".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::admin::{Admin, AdminRole};
    use crate::model::employee::Employee;
    use crate::model::payroll::{PayBasis, PayrollRecord};
    use tempfile::tempdir;

    fn sample_document() -> Document {
        let mut doc = Document::default();
        doc.admins.push(Admin {
            username: "root".into(),
            password: "$argon2id$hash".into(),
            role: AdminRole::SuperAdmin,
        });
        doc.employees.push(Employee {
            id: 1,
            name: "Ada".into(),
            department: "Ops".into(),
            salary: 3000.0,
        });
        doc.payroll.push(PayrollRecord {
            id: 1,
            employee_id: 1,
            employee_name: "Ada".into(),
            days_worked: 15,
            basis: Some(PayBasis::Monthly { salary: 3000.0 }),
            gross_pay: 1500.0,
            tax: 75.0,
            net_pay: 1425.0,
            date: "2024-03-15".into(),
        });
        doc.sequences.employees = 1;
        doc.sequences.payroll = 1;
        doc
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = PersistentStore::new(dir.path().join("nested").join("payroll.json"));

        let doc = sample_document();
        store.save(&doc).unwrap();
        assert_eq!(store.load(), doc);

        store.save(&Document::default()).unwrap();
        assert_eq!(store.load(), Document::default());
        assert!(!temp_path_for(store.path()).exists());
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = PersistentStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load(), Document::default());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("payroll.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(PersistentStore::new(&path).load(), Document::default());

        fs::write(&path, r#"{"employees": "nope"}"#).unwrap();
        assert_eq!(PersistentStore::new(&path).load(), Document::default());
    }

    #[test]
    fn admins_without_role_are_admins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("payroll.json");
        fs::write(
            &path,
            r#"{"admins": [{"username": "old", "password": "h"}], "employees": [], "payroll": []}"#,
        )
        .unwrap();

        let doc = PersistentStore::new(&path).load();
        assert_eq!(doc.admins[0].role, AdminRole::Admin);
    }

    #[test]
    fn failed_mutation_leaves_file_unchanged() {
        let dir = tempdir().unwrap();
        let store = PersistentStore::new(dir.path().join("payroll.json"));
        store.save(&sample_document()).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let result: Result<()> = store.with_document(|doc| {
            doc.employees.clear();
            Err(LedgerError::Validation("rejected".into()))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn successful_mutation_is_persisted() {
        let dir = tempdir().unwrap();
        let store = PersistentStore::new(dir.path().join("payroll.json"));

        let id = store
            .with_document(|doc| {
                let id = doc.next_employee_id();
                doc.employees.push(Employee {
                    id,
                    name: "Bo".into(),
                    department: String::new(),
                    salary: 10.0,
                });
                Ok(id)
            })
            .unwrap();

        assert_eq!(id, 1);
        assert_eq!(store.load().employees.len(), 1);
    }
}
