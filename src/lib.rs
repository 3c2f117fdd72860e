// Public API exports
pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;

// Re-export key types for easy access
pub use application::*;
pub use config::{AppConfig, ConfigError, SpreadsheetConfig};
pub use domain::*;
pub use ports::*;
