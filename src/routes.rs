use crate::api::{admin, employee, payroll, report};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str) {
    cfg.service(
        web::scope(api_prefix)
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    )
                    // /employees/{id}/profile
                    .service(
                        web::resource("/{id}/profile")
                            .route(web::get().to(employee::employee_profile)),
                    ),
            )
            .service(
                web::scope("/payroll")
                    // /payroll
                    .service(
                        web::resource("")
                            .route(web::post().to(payroll::process_payroll))
                            .route(web::get().to(payroll::list_payroll)),
                    )
                    // fixed segments before /payroll/{id}
                    .service(web::resource("/batch").route(web::post().to(payroll::run_batch)))
                    .service(
                        web::resource("/summary").route(web::get().to(payroll::payroll_summary)),
                    )
                    .service(
                        web::resource("/export/csv").route(web::get().to(payroll::export_csv)),
                    )
                    .service(web::resource("/{id}").route(web::get().to(payroll::get_payroll))),
            )
            .service(
                web::scope("/admins")
                    .service(
                        web::resource("")
                            .route(web::get().to(admin::list_admins))
                            .route(web::post().to(admin::create_admin)),
                    )
                    .service(web::resource("/verify").route(web::post().to(admin::verify_admin)))
                    .service(
                        web::resource("/{username}").route(web::delete().to(admin::delete_admin)),
                    ),
            )
            .service(web::resource("/dashboard").route(web::get().to(report::dashboard)))
            .service(
                web::resource("/backups")
                    .route(web::get().to(report::list_backups))
                    .route(web::post().to(report::create_backup)),
            ),
    );
}
