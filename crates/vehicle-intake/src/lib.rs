//! Intake backend for applicant, address, and vehicle applications.

pub mod applications;
pub mod config;
pub mod error;
pub mod telemetry;
