use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

/// Weekly schedule window entity. Times are stored in the canonical 24-hour
/// "HH:MM:SS" format; the natural key is (day_of_week, start_time, end_time,
/// category_id).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub schedule_id: i32,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    pub category_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vehicle_category::Entity",
        from = "Column::CategoryId",
        to = "super::vehicle_category::Column::CategoryId"
    )]
    VehicleCategory,
    #[sea_orm(has_many = "super::route::Entity")]
    Route,
}

impl Related<super::vehicle_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VehicleCategory.def()
    }
}

impl Related<super::route::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Route.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        let now = Utc::now();

        if insert {
            active_model.created_at = Set(now);
        }

        if let ActiveValue::NotSet = active_model.updated_at {
            active_model.updated_at = Set(Some(now));
        }

        Ok(active_model)
    }
}
