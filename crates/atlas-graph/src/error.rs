//! Error types for graph operations.
//!
//! The taxonomy is two-tier:
//!
//! - **[`Error`]**: conditions that fail the call - a rejected identifier, or
//!   a snapshot write that did not reach disk.
//! - **[`GraphWarning`]** (see the `warning` module): detected inconsistencies
//!   that the graph survives - logged, collected, and otherwise ignored.
//!
//! A persist that did not happen is never silent: save failures propagate as
//! [`Error::Snapshot`]. Load failures, by contrast, are recoverable - an
//! unreadable snapshot is treated as absent state and merely logged.

use thiserror::Error;

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Conditions that fail the calling operation.
#[derive(Debug, Error)]
pub enum Error {
    /// The empty asset identifier was passed to a mutation operation.
    #[error("asset identifier is empty")]
    InvalidIdentifier,

    /// Writing the snapshot to durable storage failed.
    #[error("snapshot persistence failed: {0}")]
    Snapshot(#[from] atlas_store::Error),
}
