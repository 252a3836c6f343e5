//! Snapshot persistence for the graph.
//!
//! Persistence is whole-snapshot: every save rewrites one JSON document
//! holding the stale flag and every record's edge sets, in a deterministic
//! order (records by id, edges sorted). Memoized classifications are never
//! persisted - a reloaded graph recomputes everything on first read.
//!
//! Loading is tolerant: an absent, unreadable, or structurally incompatible
//! snapshot is logged and treated as no state at all, leaving the graph
//! empty and stale so the caller knows a rebuild is required. Saving is not:
//! a save that fails to reach disk propagates an error.

use crate::error::Result;
use crate::store::GraphStore;
use crate::types::{AssetId, AssetRecord};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One record as persisted: identity plus ordered edge lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotRecord {
    id: AssetId,
    referencers: Vec<AssetId>,
    dependencies: Vec<AssetId>,
}

/// The persisted document: stale flag plus the full record set.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    stale: bool,
    records: Vec<SnapshotRecord>,
}

/// Serializes the graph to durable storage and tracks the stale flag.
///
/// The stale flag means "the graph cannot be trusted for incremental
/// updates; a full rebuild is required." It starts set, is loaded from the
/// snapshot, and is cleared only when a rebuild completes.
#[derive(Debug)]
pub struct PersistenceAdapter {
    path: PathBuf,
    stale: bool,
}

impl PersistenceAdapter {
    /// Create an adapter writing to `path`. No I/O happens until
    /// [`Self::load`] or [`Self::save`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            stale: true,
        }
    }

    /// Where the snapshot lives on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a full rebuild is required before incremental updates are
    /// trusted.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Mark the graph untrustworthy for incremental updates.
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Mark the graph consistent again after a completed rebuild.
    pub fn clear_stale(&mut self) {
        self.stale = false;
    }

    /// Read the snapshot, adopting its stale flag and returning its records.
    ///
    /// Any unusable snapshot - missing, unreadable, or incompatible - yields
    /// an empty record set with the stale flag set.
    pub fn load(&mut self) -> Vec<AssetRecord> {
        let Some(snapshot) = atlas_store::read_json_tolerant::<Snapshot, _>(&self.path) else {
            self.stale = true;
            return Vec::new();
        };

        self.stale = snapshot.stale;
        debug!(
            path = %self.path.display(),
            records = snapshot.records.len(),
            stale = snapshot.stale,
            "Loaded graph snapshot"
        );
        snapshot
            .records
            .into_iter()
            .map(|record| AssetRecord::from_edges(record.id, record.referencers, record.dependencies))
            .collect()
    }

    /// Overwrite the snapshot with the store's full record set and the
    /// current stale flag.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Snapshot`] if the document cannot be written;
    /// the previous snapshot on disk is left intact in that case.
    pub fn save(&self, store: &GraphStore) -> Result<()> {
        let mut records: Vec<SnapshotRecord> = store
            .records()
            .map(|record| SnapshotRecord {
                id: record.id(),
                referencers: sorted(record.referencers()),
                dependencies: sorted(record.dependencies()),
            })
            .collect();
        records.sort_by_key(|record| record.id);

        let snapshot = Snapshot {
            stale: self.stale,
            records,
        };
        atlas_store::write_json_atomic(&self.path, &snapshot)?;
        Ok(())
    }
}

/// Edge sets persist as sorted lists so identical graphs serialize
/// identically.
fn sorted(ids: &std::collections::HashSet<AssetId>) -> Vec<AssetId> {
    let mut ids: Vec<AssetId> = ids.iter().copied().collect();
    ids.sort_unstable();
    ids
}
