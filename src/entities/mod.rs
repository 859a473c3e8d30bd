pub mod route;
pub mod schedule;
pub mod vehicle_category;
pub mod vehicle_type;
