pub mod common;
pub mod health;
pub mod vehicles;

use std::sync::Arc;

use crate::db::DbPool;
use crate::services::VehicleOpService;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub vehicle_ops: Arc<VehicleOpService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            vehicle_ops: Arc::new(VehicleOpService::new(db_pool)),
        }
    }
}
