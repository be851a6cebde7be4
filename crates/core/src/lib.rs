//! # Parking Lot Core
//!
//! Slot allocation, occupancy queries and the line-oriented command protocol
//! for a fixed-capacity parking lot. Everything here works on in-memory
//! state; durability is delegated to a [`LotStore`] implemented elsewhere.
//!
//! ## Layers
//!
//! - [`lot`] — the lot state and create/park/unpark (lowest free slot first)
//! - [`query`] — read-only views: status, colour filter, registration lookup
//! - [`command`] / [`processor`] — parse a line, run it, render the reply
//! - [`service`] — a lock-serialized processor wired to a store

pub mod error;
pub mod lot;
pub mod query;
pub mod command;
pub mod processor;
pub mod store;
pub mod service;

// Re-export key types at crate root for ergonomics
pub use error::{CommandError, Error, LotError, Result, StoreError};
pub use lot::{Lot, ParkingRecord, SlotId};
pub use query::{FieldValue, Projection, QueryEngine, StatusRow};
pub use command::{parse_command, Command};
pub use processor::{CommandProcessor, Dispatch, Reply};
pub use store::{LotChange, LotSnapshot, LotStore};
pub use service::LotService;
