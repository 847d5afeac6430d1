pub mod config;
pub mod error;
pub mod pipeline;
pub mod source;
pub mod telemetry;
