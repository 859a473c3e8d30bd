pub mod vehicle_ops;

pub use vehicle_ops::VehicleOpService;
