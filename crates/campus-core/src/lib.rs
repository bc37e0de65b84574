//! Campus Core - registration lifecycle engine
//!
//! This crate provides the domain logic for the campus event registration
//! service, including:
//! - Auth: password hashing and signed bearer tokens (identity gate)
//! - Store: SQLite persistence for users, events, and registrations
//! - Catalog: event CRUD with the future-date invariant
//! - Ledger: registration lifecycle and live attendee counts
//! - Sweeper: background purge of expired events
//! - Live: broadcast fan-out of state changes to connected clients

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod catalog;
pub mod error;
pub mod ledger;
pub mod live;
pub mod model;
pub mod policy;
pub mod shutdown;
pub mod store;
pub mod sweeper;

pub use auth::{hash_password, verify_password, TokenSigner};
pub use catalog::{EventCatalog, EventPatch, NewEvent};
pub use error::{Error, Result};
pub use ledger::RegistrationLedger;
pub use live::{Broadcaster, LiveUpdate};
pub use model::{
    Event, EventRecord, OrganizerRef, Registration, RegistrationDetail, RegistrationStatus, Role,
    User,
};
pub use shutdown::{wait_for_shutdown_signal, ShutdownController};
pub use store::CampusStore;
pub use sweeper::ExpirySweeper;
