pub mod admin;
pub mod employee;
pub mod payroll;
pub mod report;

use std::path::Path;

use crate::service::Services;

/// Snapshots `source`; a failed backup is logged by the backup service and
/// reported to the caller as `None` since the mutation itself already succeeded.
pub(crate) fn snapshot(services: &Services, source: &Path) -> Option<String> {
    services
        .backups
        .snapshot(source)
        .ok()
        .map(|path| path.display().to_string())
}

pub(crate) fn backup_after_mutation(services: &Services) -> Option<String> {
    snapshot(services, services.store.path())
}
