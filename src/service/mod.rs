pub mod admin_registry;
pub mod backup;
pub mod employee_registry;
pub mod payroll_ledger;
pub mod report;

use crate::config::Config;
use crate::store::PersistentStore;

use admin_registry::AdminRegistry;
use backup::BackupService;
use employee_registry::EmployeeRegistry;
use payroll_ledger::PayrollLedger;
use report::ReportService;

/// Every component wired to the same backing store.
#[derive(Debug, Clone)]
pub struct Services {
    pub store: PersistentStore,
    pub employees: EmployeeRegistry,
    pub ledger: PayrollLedger,
    pub backups: BackupService,
    pub admins: AdminRegistry,
    pub reports: ReportService,
}

impl Services {
    pub fn new(config: &Config) -> Self {
        let storage = &config.storage;
        let store = PersistentStore::new(&storage.data_file);

        Self {
            employees: EmployeeRegistry::new(store.clone()),
            ledger: PayrollLedger::new(store.clone(), &storage.history_file),
            backups: BackupService::new(&storage.backup_dir),
            admins: AdminRegistry::new(store.clone()),
            reports: ReportService::new(
                store.clone(),
                &storage.export_dir,
                config.company_budget,
            ),
            store,
        }
    }
}
