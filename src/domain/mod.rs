// Domain layer - Sensor data and pure status rules
pub mod sensor;
pub mod snapshot;
