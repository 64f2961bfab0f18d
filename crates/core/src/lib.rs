//! Core business logic for opsboard.

pub mod assist;
pub mod services;

pub use services::*;
