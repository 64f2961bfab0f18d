//! HTTP API layer for opsboard.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: auth, session, tasks, issues, projects, forms,
//!   templates, reports, notifications, assist, admin
//! - **Extractors**: authenticated request context
//! - **Middleware**: bearer-token authentication
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
