//! Configuration module
//!
//! Application settings read from the TOML config file, and user parameters
//! persisted next to the column layouts.

pub mod config;
pub mod parameters;

pub use config::Config;
pub use parameters::UserParameters;
