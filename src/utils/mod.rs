//! Utility functions and helpers
//!
//! Application paths and the tracing setup shared by the library and the
//! debug tool.

pub mod app_paths;
pub mod logging;
