use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::api::backup_after_mutation;
use crate::error::LedgerError;
use crate::model::employee::{Employee, EmployeeUpdate};
use crate::model::payroll::PayrollRecord;
use crate::service::Services;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "Engineering")]
    #[serde(default)]
    pub department: String,
    #[schema(example = 3000.0)]
    pub salary: f64,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeProfile {
    pub employee: Employee,
    pub payroll: Vec<PayrollRecord>,
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Missing name or invalid salary")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    services: web::Data<Services>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    let employee = services
        .employees
        .add(&payload.name, &payload.department, payload.salary)?;
    backup_after_mutation(&services);

    Ok(HttpResponse::Created().json(employee))
}

#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Employees in insertion order", body = [Employee])
    ),
    tag = "Employee"
)]
pub async fn list_employees(services: web::Data<Services>) -> impl Responder {
    HttpResponse::Ok().json(services.employees.list())
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, body = Employee),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    services: web::Data<Services>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let employee = services
        .employees
        .get(id)
        .ok_or_else(|| LedgerError::not_found("employee", id))?;

    Ok(HttpResponse::Ok().json(employee))
}

#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    request_body = EmployeeUpdate,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 400, description = "Invalid field value"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    services: web::Data<Services>,
    path: web::Path<u64>,
    body: web::Json<EmployeeUpdate>,
) -> actix_web::Result<impl Responder> {
    let employee = services
        .employees
        .update(path.into_inner(), body.into_inner())?;
    backup_after_mutation(&services);

    Ok(HttpResponse::Ok().json(employee))
}

#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Whether an employee was removed", body = Object, example = json!({
            "deleted": true
        }))
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    services: web::Data<Services>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let deleted = services.employees.delete(path.into_inner())?;
    if deleted {
        backup_after_mutation(&services);
    }

    Ok(HttpResponse::Ok().json(json!({ "deleted": deleted })))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}/profile",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee with their payroll records", body = EmployeeProfile),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn employee_profile(
    services: web::Data<Services>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let employee = services
        .employees
        .get(id)
        .ok_or_else(|| LedgerError::not_found("employee", id))?;
    let payroll = services.ledger.records_for(id);

    Ok(HttpResponse::Ok().json(EmployeeProfile { employee, payroll }))
}
