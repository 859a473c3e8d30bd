use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::entities::{route, schedule, vehicle_category, vehicle_type};
use crate::errors::ServiceError;
use crate::time_format::to_12_hour;

/// Vehicle category names accepted by the API and stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum CategoryName {
    Standard,
    Standby,
    Wheelchair,
}

/// Weekday names accepted by the API and stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// A route together with its full relation chain, eagerly loaded:
/// Route -> Schedule -> VehicleCategory -> VehicleType.
#[derive(Debug, Clone)]
pub struct RouteGraph {
    pub route: route::Model,
    pub schedule: schedule::Model,
    pub category: vehicle_category::Model,
    pub vehicle_type: vehicle_type::Model,
}

/// External response shape for a vehicle operation, flattened from a
/// [`RouteGraph`] with all times rendered in 12-hour format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleOpRecord {
    pub id: i32,
    pub vehicle_type: String,
    pub vehicle_type_count: i32,
    pub category: String,
    pub schedule: ScheduleView,
    pub route: RouteView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteView {
    pub start_location: String,
    pub end_location: String,
    pub start_time: String,
    pub end_time: String,
}

impl VehicleOpRecord {
    /// Flattens an eagerly loaded route graph into the response shape.
    ///
    /// Stored times are expected to be canonical "HH:MM:SS"; anything else
    /// means the row bypassed the normalizing write path and surfaces as an
    /// internal error rather than a panic.
    pub fn from_graph(graph: &RouteGraph) -> Result<Self, ServiceError> {
        let render = |time: &str| {
            to_12_hour(time).map_err(|err| {
                ServiceError::InternalError(format!(
                    "stored time for route {} is not canonical: {}",
                    graph.route.route_id, err
                ))
            })
        };

        Ok(Self {
            id: graph.route.route_id,
            vehicle_type: graph.vehicle_type.vehicle_type_name.clone(),
            vehicle_type_count: graph.vehicle_type.count,
            category: graph.category.category_name.clone(),
            schedule: ScheduleView {
                day_of_week: graph.schedule.day_of_week.clone(),
                start_time: render(&graph.schedule.start_time)?,
                end_time: render(&graph.schedule.end_time)?,
            },
            route: RouteView {
                start_location: graph.route.start_location.clone(),
                end_location: graph.route.end_location.clone(),
                start_time: render(&graph.route.start_time)?,
                end_time: render(&graph.route.end_time)?,
            },
        })
    }
}
