use crate::api::admin::{CreateAdmin, VerifyAdmin, VerifyResponse};
use crate::api::employee::{CreateEmployee, EmployeeProfile};
use crate::api::payroll::{
    BatchResponse, ProcessPayroll, ProcessedPayroll, RunBatch, SummaryResponse,
};
use crate::api::report::BackupCreated;
use crate::model::admin::{AdminRole, AdminView};
use crate::model::employee::{Employee, EmployeeUpdate};
use crate::model::payroll::{BatchEntry, PayBasis, PayrollRecord, PayrollSummary};
use crate::service::report::{Dashboard, EmployeeTally, MonthTotal};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll Ledger API",
        version = "0.1.0",
        description = r#"
## Payroll ledger

Employees, admins and payroll records kept in a single JSON document.

### Key features
- **Employees**: create, update, delete, list and view profiles
- **Payroll**: pay one employee at most once per calendar month, with a flat 5% tax
- **Batch runs**: pay every employee's monthly salary into the payroll history
- **Reports**: ledger summary, dashboard figures, CSV export
- **Backups**: a timestamped copy of the data after every change

### Pay basis
`hourly` (rate x 8 x days), `daily` (rate x days) or `monthly` (salary / 30 x days).
"#,
    ),
    paths(
        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::employee_profile,

        crate::api::payroll::process_payroll,
        crate::api::payroll::list_payroll,
        crate::api::payroll::get_payroll,
        crate::api::payroll::run_batch,
        crate::api::payroll::payroll_summary,
        crate::api::payroll::export_csv,

        crate::api::admin::list_admins,
        crate::api::admin::create_admin,
        crate::api::admin::delete_admin,
        crate::api::admin::verify_admin,

        crate::api::report::dashboard,
        crate::api::report::create_backup,
        crate::api::report::list_backups
    ),
    components(
        schemas(
            Employee,
            EmployeeUpdate,
            CreateEmployee,
            EmployeeProfile,
            PayBasis,
            PayrollRecord,
            PayrollSummary,
            BatchEntry,
            ProcessPayroll,
            ProcessedPayroll,
            RunBatch,
            BatchResponse,
            SummaryResponse,
            AdminRole,
            AdminView,
            CreateAdmin,
            VerifyAdmin,
            VerifyResponse,
            Dashboard,
            MonthTotal,
            EmployeeTally,
            BackupCreated
        )
    ),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "Payroll", description = "Payroll ledger APIs"),
        (name = "Admin", description = "Admin account APIs"),
        (name = "Report", description = "Dashboard and backup APIs"),
    )
)]
pub struct ApiDoc;

/// Prefix the handler annotations are written against.
const DOCUMENTED_PREFIX: &str = "/api";

/// The OpenAPI document with every path moved under `api_prefix`, so the
/// docs follow a non-default `API_PREFIX`.
pub fn openapi_for(api_prefix: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let prefix = api_prefix.trim_end_matches('/');
    if prefix == DOCUMENTED_PREFIX {
        return doc;
    }

    doc.paths.paths = std::mem::take(&mut doc.paths.paths)
        .into_iter()
        .map(|(path, item)| {
            let rest = path.strip_prefix(DOCUMENTED_PREFIX).unwrap_or(&path);
            (format!("{}{}", prefix, rest), item)
        })
        .collect();
    doc
}
