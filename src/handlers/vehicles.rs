use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::info;
use validator::{Validate, ValidationError};

use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{
    errors::ApiError,
    handlers::AppState,
    models::vehicle_op::{CategoryName, DayOfWeek, VehicleOpRecord},
    services::vehicle_ops::{NewRoute, NewSchedule, NewVehicleOp},
};

/// 12-hour time accepted by the API: "H[:MM] am|pm", case-insensitive.
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\d{1,2}(:\d{2})?\s*(am|pm)$").expect("valid time regex"));

// Request DTOs

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleOpRequest {
    #[validate(length(min = 1, message = "vehicleType must not be empty"))]
    pub vehicle_type: String,

    #[validate(custom = "validate_category_name")]
    pub category: String,

    #[validate]
    pub schedule: ScheduleInput,

    #[validate]
    pub route: RouteInput,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInput {
    #[validate(custom = "validate_day_of_week")]
    pub day_of_week: String,

    #[validate(regex(path = "TIME_RE", message = "startTime must look like '9:00 am'"))]
    pub start_time: String,

    #[validate(regex(path = "TIME_RE", message = "endTime must look like '5:00 pm'"))]
    pub end_time: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RouteInput {
    #[validate(length(min = 1, message = "startLocation must not be empty"))]
    pub start_location: String,

    #[validate(length(min = 1, message = "endLocation must not be empty"))]
    pub end_location: String,

    #[validate(regex(path = "TIME_RE", message = "startTime must look like '9:00 am'"))]
    pub start_time: String,

    #[validate(regex(path = "TIME_RE", message = "endTime must look like '10:00 am'"))]
    pub end_time: String,
}

fn validate_category_name(value: &str) -> Result<(), ValidationError> {
    CategoryName::from_str(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("unknown_category"))
}

fn validate_day_of_week(value: &str) -> Result<(), ValidationError> {
    DayOfWeek::from_str(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("unknown_day_of_week"))
}

// Handler functions

/// Record a vehicle operation: find-or-create the type, category, schedule
/// and route in dependency order, then respond with the assembled record.
async fn create_vehicle_op(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateVehicleOpRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // A body that fails deserialization is a schema failure like any other
    // and gets the 400 envelope, not the extractor's bare 422.
    let Json(payload) = payload.map_err(|rejection| {
        ApiError::ValidationError(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    validate_input(&payload)?;

    // Already vetted by the validators above, so these cannot fail.
    let category = CategoryName::from_str(&payload.category)
        .map_err(|_| ApiError::ValidationError(format!("unknown category '{}'", payload.category)))?;
    let day_of_week = DayOfWeek::from_str(&payload.schedule.day_of_week).map_err(|_| {
        ApiError::ValidationError(format!(
            "unknown day of week '{}'",
            payload.schedule.day_of_week
        ))
    })?;

    let input = NewVehicleOp {
        vehicle_type: payload.vehicle_type,
        category,
        schedule: NewSchedule {
            day_of_week,
            start_time: payload.schedule.start_time,
            end_time: payload.schedule.end_time,
        },
        route: NewRoute {
            start_location: payload.route.start_location,
            end_location: payload.route.end_location,
            start_time: payload.route.start_time,
            end_time: payload.route.end_time,
        },
    };

    let graph = state
        .services
        .vehicle_ops
        .create_vehicle_op(input)
        .await
        .map_err(map_service_error)?;

    let record = VehicleOpRecord::from_graph(&graph).map_err(map_service_error)?;

    info!("Vehicle operation recorded: route {}", record.id);

    Ok(created_response(record))
}

/// List all routes with their nested schedule/category/type data.
async fn list_vehicle_ops(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let graphs = state
        .services
        .vehicle_ops
        .list_route_graphs()
        .await
        .map_err(map_service_error)?;

    let records = graphs
        .iter()
        .map(VehicleOpRecord::from_graph)
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_service_error)?;

    Ok(success_response(records))
}

/// Get one route by identity.
async fn get_vehicle_op(
    State(state): State<Arc<AppState>>,
    Path(route_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let graph = state
        .services
        .vehicle_ops
        .get_route_graph(route_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Route with id {} not found", route_id)))?;

    let record = VehicleOpRecord::from_graph(&graph).map_err(map_service_error)?;

    Ok(success_response(record))
}

/// Creates the router for vehicle operation endpoints
pub fn vehicle_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_vehicle_op))
        .route("/", get(list_vehicle_ops))
        .route("/:id", get(get_vehicle_op))
}
