pub mod vehicle_op;
