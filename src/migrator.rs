// `MigrationTrait`'s async_trait expansion pins the `SchemaManager` lifetime,
// so the `&SchemaManager<'_>` spelling the idiom lint wants does not compile
// here (E0195).
#![allow(elided_lifetimes_in_paths)]

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_vehicle_types_table::Migration),
            Box::new(m20240101_000002_create_vehicle_categories_table::Migration),
            Box::new(m20240101_000003_create_schedules_table::Migration),
            Box::new(m20240101_000004_create_routes_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_vehicle_types_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_vehicle_types_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(VehicleTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(VehicleTypes::VehicleTypeId)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VehicleTypes::VehicleTypeName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VehicleTypes::Count)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(VehicleTypes::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(VehicleTypes::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            // Natural key: the type name. Backs the find-or-create lookup and
            // closes the concurrent double-insert window at the storage layer.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_vehicle_types_name")
                        .table(VehicleTypes::Table)
                        .col(VehicleTypes::VehicleTypeName)
                        .unique()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(VehicleTypes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum VehicleTypes {
        Table,
        VehicleTypeId,
        VehicleTypeName,
        Count,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_vehicle_categories_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_vehicle_types_table::VehicleTypes;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_vehicle_categories_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(VehicleCategories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(VehicleCategories::CategoryId)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VehicleCategories::CategoryName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VehicleCategories::VehicleTypeId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VehicleCategories::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VehicleCategories::UpdatedAt)
                                .timestamp()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_vehicle_categories_vehicle_type")
                                .from(
                                    VehicleCategories::Table,
                                    VehicleCategories::VehicleTypeId,
                                )
                                .to(VehicleTypes::Table, VehicleTypes::VehicleTypeId),
                        )
                        .to_owned(),
                )
                .await?;

            // Natural key: (category_name, vehicle_type_id).
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_vehicle_categories_name_type")
                        .table(VehicleCategories::Table)
                        .col(VehicleCategories::CategoryName)
                        .col(VehicleCategories::VehicleTypeId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(VehicleCategories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum VehicleCategories {
        Table,
        CategoryId,
        CategoryName,
        VehicleTypeId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_schedules_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000002_create_vehicle_categories_table::VehicleCategories;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_schedules_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Schedules::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Schedules::ScheduleId)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Schedules::DayOfWeek).string().not_null())
                        .col(ColumnDef::new(Schedules::StartTime).string().not_null())
                        .col(ColumnDef::new(Schedules::EndTime).string().not_null())
                        .col(ColumnDef::new(Schedules::CategoryId).integer().not_null())
                        .col(ColumnDef::new(Schedules::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Schedules::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_schedules_category")
                                .from(Schedules::Table, Schedules::CategoryId)
                                .to(VehicleCategories::Table, VehicleCategories::CategoryId),
                        )
                        .to_owned(),
                )
                .await?;

            // Natural key: (day_of_week, start_time, end_time, category_id).
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_schedules_window_category")
                        .table(Schedules::Table)
                        .col(Schedules::DayOfWeek)
                        .col(Schedules::StartTime)
                        .col(Schedules::EndTime)
                        .col(Schedules::CategoryId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Schedules::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Schedules {
        Table,
        ScheduleId,
        DayOfWeek,
        StartTime,
        EndTime,
        CategoryId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_routes_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000003_create_schedules_table::Schedules;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_routes_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Routes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Routes::RouteId)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Routes::StartLocation).string().not_null())
                        .col(ColumnDef::new(Routes::EndLocation).string().not_null())
                        .col(ColumnDef::new(Routes::StartTime).string().not_null())
                        .col(ColumnDef::new(Routes::EndTime).string().not_null())
                        .col(ColumnDef::new(Routes::ScheduleId).integer().not_null())
                        .col(ColumnDef::new(Routes::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Routes::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_routes_schedule")
                                .from(Routes::Table, Routes::ScheduleId)
                                .to(Schedules::Table, Schedules::ScheduleId),
                        )
                        .to_owned(),
                )
                .await?;

            // Natural key: (start_location, end_location, start_time,
            // end_time, schedule_id).
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_routes_locations_window_schedule")
                        .table(Routes::Table)
                        .col(Routes::StartLocation)
                        .col(Routes::EndLocation)
                        .col(Routes::StartTime)
                        .col(Routes::EndTime)
                        .col(Routes::ScheduleId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Routes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Routes {
        Table,
        RouteId,
        StartLocation,
        EndLocation,
        StartTime,
        EndTime,
        ScheduleId,
        CreatedAt,
        UpdatedAt,
    }
}
