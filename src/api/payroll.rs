use actix_web::{HttpResponse, Responder, http::header, web};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::{backup_after_mutation, snapshot};
use crate::auth::credentials::AdminCredentials;
use crate::error::LedgerError;
use crate::model::admin::AdminRole;
use crate::model::payroll::{BatchEntry, PayBasis, PayrollRecord, PayrollSummary};
use crate::service::Services;
use crate::service::payroll_ledger::PayrollLedger;

#[derive(Deserialize, ToSchema)]
pub struct ProcessPayroll {
    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = 15)]
    pub days_worked: u32,

    /// Defaults to the employee's monthly salary
    pub basis: Option<PayBasis>,

    /// Payment date, today (UTC) when omitted
    #[schema(example = "2024-03-15", value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct ProcessedPayroll {
    pub record: PayrollRecord,
    /// Snapshot written after the payment, if it succeeded
    pub backup: Option<String>,
}

#[derive(Deserialize, ToSchema, Default)]
pub struct RunBatch {
    #[schema(example = "2024-03-31", value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct BatchResponse {
    pub entries: Vec<BatchEntry>,
    pub summary: PayrollSummary,
    pub backup: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SummaryResponse {
    /// Single payments
    pub ledger: PayrollSummary,
    /// Batch runs
    pub batch: PayrollSummary,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[utoipa::path(
    post,
    path = "/api/payroll",
    request_body = ProcessPayroll,
    responses(
        (status = 201, description = "Payroll processed", body = ProcessedPayroll),
        (status = 400, description = "Invalid pay rate"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Employee already paid this month")
    ),
    tag = "Payroll"
)]
pub async fn process_payroll(
    services: web::Data<Services>,
    payload: web::Json<ProcessPayroll>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();

    let basis = match payload.basis {
        Some(basis) => basis,
        None => {
            let employee = services
                .employees
                .get(payload.employee_id)
                .ok_or_else(|| LedgerError::not_found("employee", payload.employee_id))?;
            PayBasis::Monthly {
                salary: employee.salary,
            }
        }
    };

    let record = services.ledger.process(
        payload.employee_id,
        payload.days_worked,
        basis,
        payload.date.unwrap_or_else(today),
    )?;
    let backup = backup_after_mutation(&services);

    Ok(HttpResponse::Created().json(ProcessedPayroll { record, backup }))
}

#[utoipa::path(
    get,
    path = "/api/payroll",
    responses(
        (status = 200, description = "Payroll ledger, newest first", body = [PayrollRecord])
    ),
    tag = "Payroll"
)]
pub async fn list_payroll(services: web::Data<Services>) -> impl Responder {
    HttpResponse::Ok().json(services.ledger.history())
}

#[utoipa::path(
    get,
    path = "/api/payroll/{id}",
    params(("id" = u64, Path, description = "Payroll record ID")),
    responses(
        (status = 200, body = PayrollRecord),
        (status = 404, description = "Payroll record not found")
    ),
    tag = "Payroll"
)]
pub async fn get_payroll(
    services: web::Data<Services>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let record = services
        .ledger
        .get(id)
        .ok_or_else(|| LedgerError::not_found("payroll record", id))?;

    Ok(HttpResponse::Ok().json(record))
}

/// Pays every employee's monthly salary into the payroll history.
/// Not guarded against running twice in a month.
#[utoipa::path(
    post,
    path = "/api/payroll/batch",
    request_body = RunBatch,
    responses(
        (status = 201, description = "Batch completed", body = BatchResponse)
    ),
    tag = "Payroll"
)]
pub async fn run_batch(
    services: web::Data<Services>,
    payload: Option<web::Json<RunBatch>>,
) -> actix_web::Result<impl Responder> {
    let date = payload
        .map(|p| p.into_inner())
        .unwrap_or_default()
        .date
        .unwrap_or_else(today);

    let entries = services.ledger.run_batch(date)?;
    let summary = PayrollLedger::summarize(&entries);
    let backup = if entries.is_empty() {
        None
    } else {
        snapshot(&services, services.ledger.history_file())
    };

    Ok(HttpResponse::Created().json(BatchResponse {
        entries,
        summary,
        backup,
    }))
}

#[utoipa::path(
    get,
    path = "/api/payroll/summary",
    responses(
        (status = 200, body = SummaryResponse)
    ),
    tag = "Payroll"
)]
pub async fn payroll_summary(services: web::Data<Services>) -> actix_web::Result<impl Responder> {
    let ledger = PayrollLedger::summarize(&services.ledger.records());
    let batch = PayrollLedger::summarize(&services.ledger.batch_history()?);

    Ok(HttpResponse::Ok().json(SummaryResponse { ledger, batch }))
}

/// Writes the CSV export and returns it as a download.
#[utoipa::path(
    get,
    path = "/api/payroll/export/csv",
    params(
        ("X-Admin-User" = String, Header, description = "Acting admin"),
        ("X-Admin-Password" = String, Header, description = "Acting admin's password")
    ),
    responses(
        (status = 200, description = "CSV ledger export", content_type = "text/csv", body = String),
        (status = 401, description = "Missing or invalid admin credentials"),
        (status = 403, description = "Acting admin below admin")
    ),
    tag = "Payroll"
)]
pub async fn export_csv(
    services: web::Data<Services>,
    creds: AdminCredentials,
) -> actix_web::Result<impl Responder> {
    services
        .admins
        .authorize(&creds.username, &creds.password, AdminRole::Admin)?;
    let path = services.reports.export_payroll_csv()?;
    let body = std::fs::read_to_string(&path)
        .map_err(|e| LedgerError::io(format!("failed to read {}", path.display()), e))?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"payroll.csv\"",
        ))
        .body(body))
}
