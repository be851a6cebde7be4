//! Error types for the parking lot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; none of them carry
//! user-facing text for the command protocol. Rendering happens in
//! [`crate::processor`].

use crate::lot::SlotId;
use thiserror::Error;

/// The top-level error type for all parking lot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Allocation / query errors ---
    #[error("Lot error: {0}")]
    Lot(#[from] LotError),

    // --- Command parsing errors ---
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    // --- Persistence errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Expected, non-fatal outcomes of allocator and query operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LotError {
    #[error("vehicle {0} is already parked")]
    RepeatedParking(String),

    #[error("no free slot left")]
    LotFull,

    #[error("slot {0} does not exist in this lot")]
    InvalidSlot(SlotId),

    #[error("no matching vehicle")]
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unrecognized command: {0:?}")]
    InvalidCommand(String),

    #[error("invalid argument for {verb}: {value:?}")]
    InvalidArgument { verb: String, value: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Stored lot state is inconsistent: {0}")]
    Corrupt(String),
}
