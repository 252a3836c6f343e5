//! # atlas-store: atomic whole-document JSON snapshot storage
//!
//! This crate persists a single serializable value as one JSON document on
//! disk, and reads it back. It exists for state that is rewritten wholesale
//! on every save - a snapshot, not a log - where the two things that matter
//! are (a) a crash during a save must never corrupt the previous snapshot,
//! and (b) a missing or unreadable snapshot is an ordinary condition the
//! caller recovers from, not a panic.
//!
//! ## Atomicity
//!
//! Writes go through the temp-file-then-rename pattern: the document is
//! serialized to a sibling `.tmp` file, flushed, and atomically renamed over
//! the target. On POSIX systems a same-filesystem rename is atomic, so the
//! target file always holds either the old snapshot or the new one.
//!
//! ## Reading
//!
//! [`read_json`] distinguishes "file absent" (`Ok(None)`) from "file present
//! but unreadable" (`Err`). [`read_json_tolerant`] collapses both into
//! `None` with a logged warning, for callers that treat any unusable
//! snapshot as "start empty."
//!
//! # Examples
//!
//! ```no_run
//! use atlas_store::{read_json, write_json_atomic};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct State {
//!     generation: u64,
//! }
//!
//! # fn example() -> atlas_store::Result<()> {
//! write_json_atomic("state.json", &State { generation: 7 })?;
//! let state: Option<State> = read_json("state.json")?;
//! assert_eq!(state.map(|s| s.generation), Some(7));
//! # Ok(())
//! # }
//! ```

mod atomic;
mod error;
mod reader;

pub use atomic::write_json_atomic;
pub use error::{Error, Result};
pub use reader::{read_json, read_json_tolerant};
