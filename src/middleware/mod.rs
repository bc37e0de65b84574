//! Axum middleware for the campus events server.

pub mod auth;
