use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::error::{LedgerError, Result};
use crate::model::admin::{Admin, AdminRole, AdminView};
use crate::store::PersistentStore;

/// Admin accounts kept in the `admins` collection.
#[derive(Debug, Clone)]
pub struct AdminRegistry {
    store: PersistentStore,
}

impl AdminRegistry {
    pub fn new(store: PersistentStore) -> Self {
        Self { store }
    }

    /// Registers an admin. The very first admin always becomes `super_admin`.
    pub fn add(&self, username: &str, password: &str, role: AdminRole) -> Result<AdminView> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(LedgerError::Validation(
                "username and password are required".into(),
            ));
        }

        let hashed = hash_password(password)?;

        let view = self.store.with_document(|doc| {
            if doc.admins.iter().any(|a| a.username == username) {
                return Err(LedgerError::Validation(format!(
                    "username '{}' already exists",
                    username
                )));
            }

            let role = if doc.admins.is_empty() {
                AdminRole::SuperAdmin
            } else {
                role
            };
            let admin = Admin {
                username: username.to_string(),
                password: hashed,
                role,
            };
            let view = AdminView::from(&admin);
            doc.admins.push(admin);
            Ok(view)
        })?;

        info!(username = %view.username, role = %view.role, "admin added");
        Ok(view)
    }

    /// Inputs are trimmed the same way `add` trims them.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let (username, password) = (username.trim(), password.trim());
        self.store
            .load()
            .admins
            .iter()
            .find(|a| a.username == username)
            .is_some_and(|a| verify_password(password, &a.password))
    }

    pub fn get(&self, username: &str) -> Option<AdminView> {
        let username = username.trim();
        self.store
            .load()
            .admins
            .iter()
            .find(|a| a.username == username)
            .map(AdminView::from)
    }

    /// Checks the acting admin's credentials and that their role covers
    /// `required`. Returns the acting admin's role.
    pub fn authorize(
        &self,
        username: &str,
        password: &str,
        required: AdminRole,
    ) -> Result<AdminRole> {
        if !self.verify(username, password) {
            warn!(username = username.trim(), "admin authorization failed");
            return Err(LedgerError::Unauthorized(
                "invalid admin credentials".into(),
            ));
        }

        let role = self
            .get(username)
            .map(|admin| admin.role)
            .ok_or_else(|| LedgerError::Unauthorized("invalid admin credentials".into()))?;
        if !role.permits(required) {
            return Err(LedgerError::Forbidden(format!(
                "{} role required, '{}' is {}",
                required,
                username.trim(),
                role
            )));
        }
        Ok(role)
    }

    pub fn is_empty(&self) -> bool {
        self.store.load().admins.is_empty()
    }

    pub fn list(&self) -> Vec<AdminView> {
        self.store.load().admins.iter().map(AdminView::from).collect()
    }

    /// Removes an admin; `false` for unknown usernames and for the last
    /// remaining admin.
    pub fn delete(&self, username: &str) -> Result<bool> {
        let username = username.trim();
        let removed = self.store.with_document(|doc| {
            if doc.admins.len() <= 1 {
                return Ok(false);
            }
            let before = doc.admins.len();
            doc.admins.retain(|a| a.username != username);
            Ok(doc.admins.len() != before)
        })?;

        if removed {
            info!(username, "admin deleted");
        }
        Ok(removed)
    }
}
