/// Operator action audit trail.
pub mod audit;
/// Layered configuration from defaults, file, and environment.
pub mod config;
/// Tracing subscriber setup.
pub mod telemetry;
