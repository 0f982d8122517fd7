pub mod analysis;
pub mod config;
pub mod error;
pub mod summarize;
pub mod telemetry;
