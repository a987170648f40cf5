pub mod config;
pub mod report;
pub mod scylla;
pub mod telemetry;
