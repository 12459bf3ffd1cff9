use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};

use payroll::config::Config;
use payroll::docs;
use payroll::routes;
use payroll::service::Services;

use tracing::info;
use tracing_appender::rolling;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Payroll ledger"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "payroll.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(
        addr = %config.server_addr,
        data_file = %config.storage.data_file.display(),
        "Server starting..."
    );

    let services = Data::new(Services::new(&config));
    let api_prefix = config.api_prefix.clone();
    let openapi = docs::openapi_for(&api_prefix);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard so JS/CSS assets resolve
                    .url("/api-doc/openapi.json", openapi.clone()),
            )
            .app_data(services.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &api_prefix))
    })
    .bind(&config.server_addr)?
    .run()
    .await?;

    Ok(())
}
