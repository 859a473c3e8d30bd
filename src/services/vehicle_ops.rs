//! Find-or-create cascade over the four related vehicle-operation entities.
//!
//! The cascade always runs in dependency order Type -> Category -> Schedule ->
//! Route, because each step's natural key includes the prior step's generated
//! identity. Steps are independent storage operations, not a transaction: rows
//! created before a later failure are shared reference data and stay.

use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::{instrument, warn};

use crate::db::DbPool;
use crate::entities::{route, schedule, vehicle_category, vehicle_type};
use crate::errors::ServiceError;
use crate::models::vehicle_op::{CategoryName, DayOfWeek, RouteGraph};
use crate::time_format::to_24_hour;

/// Input for the create cascade. Validated at the HTTP boundary; times are
/// still in the user-facing 12-hour format and get normalized here.
#[derive(Debug, Clone)]
pub struct NewVehicleOp {
    pub vehicle_type: String,
    pub category: CategoryName,
    pub schedule: NewSchedule,
    pub route: NewRoute,
}

#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub day_of_week: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone)]
pub struct NewRoute {
    pub start_location: String,
    pub end_location: String,
    pub start_time: String,
    pub end_time: String,
}

/// Service for recording and reading vehicle operations.
#[derive(Clone)]
pub struct VehicleOpService {
    db_pool: Arc<DbPool>,
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

impl VehicleOpService {
    /// Creates a new vehicle operation service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Runs the full find-or-create cascade and returns the eagerly loaded
    /// route graph for response assembly.
    #[instrument(skip(self))]
    pub async fn create_vehicle_op(&self, input: NewVehicleOp) -> Result<RouteGraph, ServiceError> {
        let vehicle_type = self
            .find_or_create_vehicle_type(&input.vehicle_type)
            .await?;

        let category = self
            .find_or_create_category(input.category, vehicle_type.vehicle_type_id)
            .await?;

        let schedule = self
            .find_or_create_schedule(
                input.schedule.day_of_week,
                &input.schedule.start_time,
                &input.schedule.end_time,
                category.category_id,
            )
            .await?;

        self.find_or_create_route(&input.route, schedule.schedule_id)
            .await
    }

    /// Looks up a vehicle type by name, inserting it with `count = 1` when
    /// absent. A hit increments the usage counter and persists the new value.
    ///
    /// The increment is a read-modify-write without locking: concurrent calls
    /// for the same name can lose increments (last write wins on the read
    /// snapshot). Accepted limitation; see the concurrency notes in the
    /// crate docs.
    #[instrument(skip(self))]
    pub async fn find_or_create_vehicle_type(
        &self,
        name: &str,
    ) -> Result<vehicle_type::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = vehicle_type::Entity::find()
            .filter(vehicle_type::Column::VehicleTypeName.eq(name))
            .one(db)
            .await?;

        match existing {
            Some(found) => {
                let next_count = found.count + 1;
                let mut active: vehicle_type::ActiveModel = found.into();
                active.count = Set(next_count);
                Ok(active.update(db).await?)
            }
            None => {
                let active = vehicle_type::ActiveModel {
                    vehicle_type_name: Set(name.to_string()),
                    count: Set(1),
                    ..Default::default()
                };

                match active.insert(db).await {
                    Ok(created) => Ok(created),
                    Err(err) if is_unique_violation(&err) => {
                        // Someone else won the race; return their row.
                        warn!(name, "vehicle type insert lost a race, re-reading");
                        vehicle_type::Entity::find()
                            .filter(vehicle_type::Column::VehicleTypeName.eq(name))
                            .one(db)
                            .await?
                            .ok_or(ServiceError::DatabaseError(err))
                    }
                    Err(err) => Err(err.into()),
                }
            }
        }
    }

    /// Looks up a category by (name, vehicle_type_id), inserting when absent.
    /// Idempotent; no counter side effect.
    #[instrument(skip(self))]
    pub async fn find_or_create_category(
        &self,
        name: CategoryName,
        vehicle_type_id: i32,
    ) -> Result<vehicle_category::Model, ServiceError> {
        let db = &*self.db_pool;
        let name = name.to_string();

        let existing = vehicle_category::Entity::find()
            .filter(vehicle_category::Column::CategoryName.eq(name.as_str()))
            .filter(vehicle_category::Column::VehicleTypeId.eq(vehicle_type_id))
            .one(db)
            .await?;

        if let Some(found) = existing {
            return Ok(found);
        }

        let active = vehicle_category::ActiveModel {
            category_name: Set(name.clone()),
            vehicle_type_id: Set(vehicle_type_id),
            ..Default::default()
        };

        match active.insert(db).await {
            Ok(created) => Ok(created),
            Err(err) if is_unique_violation(&err) => {
                warn!(name, vehicle_type_id, "category insert lost a race, re-reading");
                vehicle_category::Entity::find()
                    .filter(vehicle_category::Column::CategoryName.eq(name.as_str()))
                    .filter(vehicle_category::Column::VehicleTypeId.eq(vehicle_type_id))
                    .one(db)
                    .await?
                    .ok_or(ServiceError::DatabaseError(err))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Looks up a schedule by (day_of_week, start_time, end_time,
    /// category_id) after normalizing both times to the canonical 24-hour
    /// format, inserting when absent. Idempotent.
    #[instrument(skip(self))]
    pub async fn find_or_create_schedule(
        &self,
        day_of_week: DayOfWeek,
        start_time: &str,
        end_time: &str,
        category_id: i32,
    ) -> Result<schedule::Model, ServiceError> {
        let db = &*self.db_pool;
        let day = day_of_week.to_string();
        let start_time = to_24_hour(start_time)?;
        let end_time = to_24_hour(end_time)?;

        let lookup = || {
            schedule::Entity::find()
                .filter(schedule::Column::DayOfWeek.eq(day.as_str()))
                .filter(schedule::Column::StartTime.eq(start_time.as_str()))
                .filter(schedule::Column::EndTime.eq(end_time.as_str()))
                .filter(schedule::Column::CategoryId.eq(category_id))
        };

        if let Some(found) = lookup().one(db).await? {
            return Ok(found);
        }

        let active = schedule::ActiveModel {
            day_of_week: Set(day.clone()),
            start_time: Set(start_time.clone()),
            end_time: Set(end_time.clone()),
            category_id: Set(category_id),
            ..Default::default()
        };

        match active.insert(db).await {
            Ok(created) => Ok(created),
            Err(err) if is_unique_violation(&err) => {
                warn!(day, category_id, "schedule insert lost a race, re-reading");
                lookup()
                    .one(db)
                    .await?
                    .ok_or(ServiceError::DatabaseError(err))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Looks up a route by its natural key after normalizing both times,
    /// inserting when absent, then performs the eager read-back of the whole
    /// relation chain needed for response assembly.
    #[instrument(skip(self, new_route))]
    pub async fn find_or_create_route(
        &self,
        new_route: &NewRoute,
        schedule_id: i32,
    ) -> Result<RouteGraph, ServiceError> {
        let db = &*self.db_pool;
        let start_time = to_24_hour(&new_route.start_time)?;
        let end_time = to_24_hour(&new_route.end_time)?;

        let lookup = || {
            route::Entity::find()
                .filter(route::Column::StartLocation.eq(new_route.start_location.as_str()))
                .filter(route::Column::EndLocation.eq(new_route.end_location.as_str()))
                .filter(route::Column::StartTime.eq(start_time.as_str()))
                .filter(route::Column::EndTime.eq(end_time.as_str()))
                .filter(route::Column::ScheduleId.eq(schedule_id))
        };

        let found = match lookup().one(db).await? {
            Some(found) => found,
            None => {
                let active = route::ActiveModel {
                    start_location: Set(new_route.start_location.clone()),
                    end_location: Set(new_route.end_location.clone()),
                    start_time: Set(start_time.clone()),
                    end_time: Set(end_time.clone()),
                    schedule_id: Set(schedule_id),
                    ..Default::default()
                };

                match active.insert(db).await {
                    Ok(created) => created,
                    Err(err) if is_unique_violation(&err) => {
                        warn!(schedule_id, "route insert lost a race, re-reading");
                        lookup()
                            .one(db)
                            .await?
                            .ok_or(ServiceError::DatabaseError(err))?
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        };

        self.load_graph(found).await
    }

    /// Reads one route by identity with its full relation chain.
    #[instrument(skip(self))]
    pub async fn get_route_graph(&self, route_id: i32) -> Result<Option<RouteGraph>, ServiceError> {
        let db = &*self.db_pool;

        let Some(found) = route::Entity::find_by_id(route_id).one(db).await? else {
            return Ok(None);
        };

        self.load_graph(found).await.map(Some)
    }

    /// Reads all routes with their full relation chains, in insertion order.
    /// Four queries regardless of row count: routes, then each relation level
    /// batched by the foreign keys collected from the level above.
    #[instrument(skip(self))]
    pub async fn list_route_graphs(&self) -> Result<Vec<RouteGraph>, ServiceError> {
        let db = &*self.db_pool;

        let routes = route::Entity::find()
            .order_by_asc(route::Column::RouteId)
            .all(db)
            .await?;
        if routes.is_empty() {
            return Ok(Vec::new());
        }

        let schedule_ids: Vec<i32> = routes.iter().map(|r| r.schedule_id).collect();
        let schedules: HashMap<i32, schedule::Model> = schedule::Entity::find()
            .filter(schedule::Column::ScheduleId.is_in(schedule_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.schedule_id, s))
            .collect();

        let category_ids: Vec<i32> = schedules.values().map(|s| s.category_id).collect();
        let categories: HashMap<i32, vehicle_category::Model> = vehicle_category::Entity::find()
            .filter(vehicle_category::Column::CategoryId.is_in(category_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.category_id, c))
            .collect();

        let type_ids: Vec<i32> = categories.values().map(|c| c.vehicle_type_id).collect();
        let vehicle_types: HashMap<i32, vehicle_type::Model> = vehicle_type::Entity::find()
            .filter(vehicle_type::Column::VehicleTypeId.is_in(type_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|t| (t.vehicle_type_id, t))
            .collect();

        let mut graphs = Vec::with_capacity(routes.len());
        for found in routes {
            let schedule = schedules.get(&found.schedule_id).cloned().ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "route {} references missing schedule {}",
                    found.route_id, found.schedule_id
                ))
            })?;
            let category = categories.get(&schedule.category_id).cloned().ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "schedule {} references missing category {}",
                    schedule.schedule_id, schedule.category_id
                ))
            })?;
            let vehicle_type = vehicle_types
                .get(&category.vehicle_type_id)
                .cloned()
                .ok_or_else(|| {
                    ServiceError::InternalError(format!(
                        "category {} references missing vehicle type {}",
                        category.category_id, category.vehicle_type_id
                    ))
                })?;

            graphs.push(RouteGraph {
                route: found,
                schedule,
                category,
                vehicle_type,
            });
        }

        Ok(graphs)
    }

    /// Eagerly loads the Schedule -> Category -> VehicleType chain for a
    /// route. A dangling foreign key is an internal invariant violation.
    async fn load_graph(&self, found: route::Model) -> Result<RouteGraph, ServiceError> {
        let db = &*self.db_pool;

        let schedule = schedule::Entity::find_by_id(found.schedule_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "route {} references missing schedule {}",
                    found.route_id, found.schedule_id
                ))
            })?;

        let category = vehicle_category::Entity::find_by_id(schedule.category_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "schedule {} references missing category {}",
                    schedule.schedule_id, schedule.category_id
                ))
            })?;

        let vehicle_type = vehicle_type::Entity::find_by_id(category.vehicle_type_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "category {} references missing vehicle type {}",
                    category.category_id, category.vehicle_type_id
                ))
            })?;

        Ok(RouteGraph {
            route: found,
            schedule,
            category,
            vehicle_type,
        })
    }
}
