//! Incremental change handling.
//!
//! The host delivers notifications at moments when the graph must not be
//! mutated - mid save-pass, for instance - so saved/created notifications
//! are buffered and applied at the next safe point: one FIFO drain per
//! scheduling tick, followed by exactly one snapshot save. Deletions are the
//! exception: the asset must be unlinked before the host finalizes the
//! deletion, so they apply immediately and synchronously.
//!
//! While the stale flag is set the graph cannot absorb incremental updates,
//! so every notification is ignored until a rebuild runs.

use crate::error::Result;
use crate::host::AssetHost;
use crate::persist::PersistenceAdapter;
use crate::store::GraphStore;
use crate::types::AssetRecord;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Outcome reported back to the host for a deletion notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteDisposition {
    /// The engine performed no side effect on the file itself; the host
    /// proceeds with its own deletion.
    DidNotDelete,
}

/// A buffered notification awaiting the next tick.
#[derive(Debug, Clone)]
enum PendingChange {
    /// Assets were saved; each is re-added with its inbound edges preserved.
    Saved(Vec<String>),
    /// A new asset appeared at this path.
    Created(String),
}

/// Buffers host notifications and applies them at safe points.
#[derive(Debug, Default)]
pub struct ChangeReactor {
    pending: VecDeque<PendingChange>,
}

impl ChangeReactor {
    /// Create a reactor with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any notification is waiting for the next tick.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Queue a saved-assets notification for the next tick.
    ///
    /// Ignored while the graph is stale or when `paths` is empty.
    pub fn notify_saved(&mut self, persistence: &PersistenceAdapter, paths: Vec<String>) {
        if persistence.is_stale() {
            debug!("Ignoring save notification while graph is stale");
            return;
        }
        if paths.is_empty() {
            return;
        }
        self.pending.push_back(PendingChange::Saved(paths));
    }

    /// Queue a created-asset notification for the next tick.
    ///
    /// Ignored while the graph is stale.
    pub fn notify_created(&mut self, persistence: &PersistenceAdapter, path: String) {
        if persistence.is_stale() {
            debug!("Ignoring create notification while graph is stale");
            return;
        }
        self.pending.push_back(PendingChange::Created(path));
    }

    /// Handle a deletion notification immediately.
    ///
    /// The asset is unlinked from the graph right away - by the time a
    /// queued notification would run, the host has already forgotten the
    /// path. Ignored while the graph is stale. Always reports
    /// [`DeleteDisposition::DidNotDelete`]: the engine touches only the
    /// graph, never the file.
    pub fn notify_deleted(
        &mut self,
        store: &mut GraphStore,
        host: &dyn AssetHost,
        persistence: &PersistenceAdapter,
        path: &str,
    ) -> DeleteDisposition {
        if persistence.is_stale() {
            debug!("Ignoring delete notification while graph is stale");
            return DeleteDisposition::DidNotDelete;
        }
        match host.asset_id_at_path(path) {
            Some(id) => {
                if let Err(error) = store.remove(host, id) {
                    warn!(%error, %path, "Deletion notification could not be applied");
                }
            }
            None => debug!(%path, "Deleted path has no asset identity, skipping"),
        }
        DeleteDisposition::DidNotDelete
    }

    /// Drain the queue in FIFO order, then save the snapshot exactly once.
    ///
    /// A tick with nothing queued does neither. Saved assets are removed and
    /// re-added with their inbound edge set carried over, so reachability
    /// through them survives the refresh; created assets are simply added.
    ///
    /// # Errors
    ///
    /// Propagates a failed snapshot save; notifications drained before the
    /// failure stay applied to the in-memory graph.
    pub fn drain(
        &mut self,
        store: &mut GraphStore,
        host: &dyn AssetHost,
        persistence: &PersistenceAdapter,
    ) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        while let Some(change) = self.pending.pop_front() {
            match change {
                PendingChange::Saved(paths) => {
                    for path in paths {
                        let Some(id) = host.asset_id_at_path(&path) else {
                            debug!(%path, "Saved path has no asset identity, skipping");
                            continue;
                        };
                        let removed = store.remove(host, id)?;
                        store.add_or_update(host, id, removed.map(AssetRecord::into_referencers))?;
                    }
                }
                PendingChange::Created(path) => {
                    if let Some(id) = host.asset_id_at_path(&path) {
                        store.add_or_update(host, id, None)?;
                    } else {
                        debug!(%path, "Created path has no asset identity, skipping");
                    }
                }
            }
        }

        persistence.save(store)?;
        Ok(())
    }
}
