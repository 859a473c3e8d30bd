//! vehicleops-api library
//!
//! REST backend for recording vehicle operations: a vehicle type, its
//! category, a weekly schedule window, and a route nested under that
//! schedule. Creation runs a find-or-create cascade across the four related
//! tables; reads return the fully joined graph.
//!
//! Concurrency notes: the cascade is a sequence of independent storage
//! operations, not a transaction. Natural-key uniqueness is enforced by
//! database indexes, and inserts that lose a race re-read the winner's row.
//! The vehicle-type usage counter is a read-modify-write without locking, so
//! concurrent hits on the same type name can lose increments.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod models;
pub mod services;
pub mod time_format;

use std::sync::Arc;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

/// Builds the application router: status line, health probes, vehicle API.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "vehicleops-api up" }))
        .nest("/health", handlers::health::health_routes())
        .nest("/vehicles", handlers::vehicles::vehicle_routes())
        .with_state(state)
}
