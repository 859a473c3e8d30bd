// Each integration test binary pulls in this module; not every binary uses
// every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use vehicleops_api::{app_router, config::AppConfig, db, handlers::AppServices, AppState};

/// Helper harness for spinning up an application backed by an in-memory
/// SQLite database.
pub struct TestApp {
    router: Router,
    pub state: Arc<AppState>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        // A single pooled connection keeps every query on the same in-memory
        // database.
        let cfg = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 1,
            db_min_connections: 1,
            environment: "test".to_string(),
            ..Default::default()
        };

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to connect to in-memory sqlite");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");

        let db_arc = Arc::new(pool);
        let services = AppServices::new(db_arc.clone());
        let state = Arc::new(AppState {
            db: db_arc,
            config: cfg,
            services,
        });

        Self {
            router: app_router(state.clone()),
            state,
        }
    }

    /// Issue a single request against the router.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).expect("serializable body")))
                .expect("valid request"),
            None => builder.body(Body::empty()).expect("valid request"),
        };

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router never errors")
    }
}

/// Drains a response into its status and parsed JSON body.
pub async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };

    (status, json)
}
