//! Lead intake for the Brand Life Co site: application submissions, the admin
//! listing/review endpoints, and the ambient configuration and telemetry glue.

pub mod applications;
pub mod config;
pub mod error;
pub mod telemetry;
