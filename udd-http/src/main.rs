#![warn(clippy::dbg_macro)]

use std::time::Duration;

use actix_web::{App, HttpServer, middleware, web};
use udd_http::error::{IoErrorContext, Result};
use udd_http::{PrometheusMiddleware, config, initialize_metrics};
use udd_resource::Udd;

async fn inner_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::load()?;

    let (metrics, db_metrics) = initialize_metrics()?;
    let db = config.open_database(Some(db_metrics))?;
    let udd = web::Data::new(Udd::new(db)?);
    log::info!(
        "serving {} resource types from {}",
        udd.registry().len(),
        config.database.display()
    );

    let metrics_data = web::Data::new(metrics.clone());
    let enable_compression = config.enable_compression;

    log::info!("listening on {}", config.bind);
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Condition::new(
                enable_compression,
                middleware::Compress::default(),
            ))
            .wrap(PrometheusMiddleware::new(metrics.clone()))
            .app_data(udd.clone())
            .app_data(metrics_data.clone())
            .configure(udd_http::configure)
    })
    .client_request_timeout(Duration::from_secs(30))
    .workers(config.workers)
    .max_connection_rate(config.max_connection_rate)
    .bind(config.bind.clone())
    .io_context("Failed to bind server")?
    .run()
    .await
    .io_context("Failed to start server")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    inner_main().await.map_err(std::io::Error::other)
}
