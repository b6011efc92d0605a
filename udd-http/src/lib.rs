#![warn(clippy::dbg_macro)]

//! HTTP front-end of the UDD API.
//!
//! Routes:
//!
//! - `/` lists the registered resource types.
//! - `/{resource}` lists instances, filtered by query-string equality.
//! - `/{resource}/doc` documents the fields of a resource type.
//! - `/{resource}/{key...}` fetches one instance by primary key.
//! - `/metrics` exposes Prometheus metrics.

use actix_web::web;

pub mod config;
pub mod error;
pub mod prometheus;
mod render;
mod resource;
mod root;

pub use error::{ApiError, Result};
pub use prometheus::{PrometheusMetrics, PrometheusMiddleware, initialize_metrics};

const CARGO_HOME_PAGE: &str = env!("CARGO_PKG_HOMEPAGE");

/// Register every route. The caller provides `web::Data<Udd>` and
/// `web::Data<Arc<PrometheusMetrics>>` as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root::get))
        .route("/metrics", web::get().to(prometheus::metrics_handler))
        .route("/{resource}", web::get().to(resource::list))
        .route("/{resource}/doc", web::get().to(resource::doc))
        .route("/{resource}/{key:.*}", web::get().to(resource::get));
}
