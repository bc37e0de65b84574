//! Live update broadcasting for connected clients.
//!
//! Mutations publish [`LiveUpdate`] values onto a broadcast channel; the
//! WebSocket layer subscribes and forwards them as JSON frames. Slow
//! subscribers miss updates (lagged) rather than blocking publishers.

mod bus;
mod types;

pub use bus::Broadcaster;
pub use types::LiveUpdate;
