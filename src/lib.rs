#![forbid(unsafe_code)]

//! Club management service: members, trainers, rooms, classes and billing,
//! with conflict-free booking of personal training sessions.

pub mod config;
pub mod errors;
pub mod models;
pub mod persistence;
pub mod scheduling;
pub mod web;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
