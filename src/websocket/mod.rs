//! WebSocket module for live updates
//!
//! `/ws/live` streams catalog and registration changes to authenticated
//! clients as JSON frames.

pub mod live;

pub use live::live_handler;

use axum::{routing::get, Router};

/// Create the WebSocket router
pub fn websocket_router() -> Router {
    Router::new().route("/ws/live", get(live_handler))
}
