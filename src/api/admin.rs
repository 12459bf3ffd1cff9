use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::api::backup_after_mutation;
use crate::auth::credentials::AdminCredentials;
use crate::error::LedgerError;
use crate::model::admin::{AdminRole, AdminView};
use crate::service::Services;

#[derive(Deserialize, ToSchema)]
pub struct CreateAdmin {
    #[schema(example = "root")]
    pub username: String,
    #[schema(example = "change-me")]
    pub password: String,
    /// Ignored for the first admin, who is always `super_admin`
    pub role: Option<AdminRole>,
}

#[derive(Deserialize, ToSchema)]
pub struct VerifyAdmin {
    #[schema(example = "root")]
    pub username: String,
    #[schema(example = "change-me")]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct VerifyResponse {
    pub valid: bool,
    pub role: Option<AdminRole>,
}

#[utoipa::path(
    get,
    path = "/api/admins",
    responses(
        (status = 200, body = [AdminView])
    ),
    tag = "Admin"
)]
pub async fn list_admins(services: web::Data<Services>) -> impl Responder {
    HttpResponse::Ok().json(services.admins.list())
}

#[utoipa::path(
    post,
    path = "/api/admins",
    request_body = CreateAdmin,
    params(
        ("X-Admin-User" = Option<String>, Header, description = "Acting admin; not needed for the first admin"),
        ("X-Admin-Password" = Option<String>, Header, description = "Acting admin's password")
    ),
    responses(
        (status = 201, description = "Admin registered", body = AdminView),
        (status = 400, description = "Missing fields or username exists"),
        (status = 401, description = "Missing or invalid admin credentials"),
        (status = 403, description = "Acting admin below admin, or granting a higher role than their own")
    ),
    tag = "Admin"
)]
pub async fn create_admin(
    services: web::Data<Services>,
    creds: Option<AdminCredentials>,
    payload: web::Json<CreateAdmin>,
) -> actix_web::Result<impl Responder> {
    let role = payload.role.unwrap_or_default();

    // the first admin bootstraps the registry
    if !services.admins.is_empty() {
        let creds = creds
            .ok_or_else(|| LedgerError::Unauthorized("missing admin credentials".into()))?;
        let acting = services
            .admins
            .authorize(&creds.username, &creds.password, AdminRole::Admin)?;
        if !acting.permits(role) {
            return Err(LedgerError::Forbidden(format!("{} cannot grant {}", acting, role)).into());
        }
    }

    let admin = services
        .admins
        .add(&payload.username, &payload.password, role)?;
    backup_after_mutation(&services);

    Ok(HttpResponse::Created().json(admin))
}

#[utoipa::path(
    delete,
    path = "/api/admins/{username}",
    params(
        ("username" = String, Path, description = "Admin username"),
        ("X-Admin-User" = String, Header, description = "Acting admin"),
        ("X-Admin-Password" = String, Header, description = "Acting admin's password")
    ),
    responses(
        (status = 200, description = "Whether the admin was removed; the last admin is never removed", body = Object, example = json!({
            "deleted": false
        })),
        (status = 401, description = "Missing or invalid admin credentials"),
        (status = 403, description = "Acting admin below admin")
    ),
    tag = "Admin"
)]
pub async fn delete_admin(
    services: web::Data<Services>,
    creds: AdminCredentials,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    services
        .admins
        .authorize(&creds.username, &creds.password, AdminRole::Admin)?;
    let deleted = services.admins.delete(&path.into_inner())?;
    if deleted {
        backup_after_mutation(&services);
    }

    Ok(HttpResponse::Ok().json(json!({ "deleted": deleted })))
}

/// Checks a username/password pair. Issues no session or token.
#[utoipa::path(
    post,
    path = "/api/admins/verify",
    request_body = VerifyAdmin,
    responses(
        (status = 200, body = VerifyResponse)
    ),
    tag = "Admin"
)]
pub async fn verify_admin(
    services: web::Data<Services>,
    payload: web::Json<VerifyAdmin>,
) -> impl Responder {
    let valid = services.admins.verify(&payload.username, &payload.password);
    let role = valid
        .then(|| services.admins.get(&payload.username))
        .flatten()
        .map(|admin| admin.role);

    HttpResponse::Ok().json(VerifyResponse { valid, role })
}
