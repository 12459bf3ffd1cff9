use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::LedgerError;
use crate::service::Services;
use crate::service::report::Dashboard;

#[derive(Serialize, ToSchema)]
pub struct BackupCreated {
    #[schema(example = "backups/backup_20240315_090507.json")]
    pub path: String,
}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, body = Dashboard)
    ),
    tag = "Report"
)]
pub async fn dashboard(services: web::Data<Services>) -> impl Responder {
    HttpResponse::Ok().json(services.reports.dashboard(Utc::now().date_naive()))
}

/// Backs up the data file on demand.
#[utoipa::path(
    post,
    path = "/api/backups",
    responses(
        (status = 201, body = BackupCreated),
        (status = 500, description = "Nothing to back up or backup directory not writable")
    ),
    tag = "Report"
)]
pub async fn create_backup(services: web::Data<Services>) -> actix_web::Result<impl Responder> {
    let path = services.backups.snapshot(services.store.path())?;

    Ok(HttpResponse::Created().json(BackupCreated {
        path: path.display().to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/backups",
    responses(
        (status = 200, description = "Backup file names, newest first", body = [String])
    ),
    tag = "Report"
)]
pub async fn list_backups(services: web::Data<Services>) -> Result<HttpResponse, LedgerError> {
    let names: Vec<String> = services
        .backups
        .list()?
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
        .collect();

    Ok(HttpResponse::Ok().json(names))
}
