//! # atlas-graph: incremental asset dependency graph
//!
//! atlas-graph maintains a persisted dependency graph over a project's
//! content assets and classifies each one as reachable from the shipped
//! build or orphaned. It is an engine, not a tool: the host content system
//! supplies asset identities, direct references, and change notifications
//! through the [`AssetHost`] trait, and everything else - bidirectional edge
//! bookkeeping, lazy cycle-safe classification, whole-snapshot persistence,
//! batched incremental updates - lives here.
//!
//! ## Design Philosophy
//!
//! - **Graph, not scanner** - the host knows what references what; the
//!   engine makes that queryable, incremental, and durable
//! - **Lazy classification** - reachability is memoized per asset and
//!   invalidated edge-locally, so a save touching one asset never recomputes
//!   the world
//! - **Best-effort diagnostics** - inconsistencies are warnings, not
//!   failures; the graph keeps working and a rebuild repairs it
//! - **Embeddable** - single-threaded, synchronous, no global state
//!
//! ## Quick Start
//!
//! ```
//! use atlas_graph::{AssetId, Atlas, MemoryHost};
//!
//! let mut host = MemoryHost::new();
//! let script = AssetId::from_u128(1);
//! let texture = AssetId::from_u128(2);
//! host.add_asset(script, "Assets/Scripts/Player.cs", [texture]);
//! host.add_asset(texture, "Assets/Art/Player.png", []);
//!
//! let dir = tempfile::tempdir()?;
//! let mut atlas = Atlas::open(host, dir.path().join("graph.json"));
//!
//! // Full scan, then ask questions.
//! atlas.rebuild(|_| {}, || false)?;
//! assert!(atlas.is_included_in_build(script));
//! assert!(atlas.is_included_in_build(texture)); // referenced by the script
//! assert!(atlas.orphans().is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod classify;
mod error;
mod host;
mod persist;
mod reactor;
mod store;
mod types;
mod warning;

pub use error::{Error, Result};
pub use host::{AssetHost, MemoryHost};
pub use persist::PersistenceAdapter;
pub use reactor::{ChangeReactor, DeleteDisposition};
pub use store::GraphStore;
pub use types::{
    AssetId, AssetRecord, BuildClassification, ParseAssetIdError, RebuildOutcome, RebuildProgress,
};
pub use warning::{EdgeDirection, GraphWarning, WarningVisibility};

use std::path::PathBuf;
use tracing::info;

/// One graph session: a host, the store, persistence, and the reactor wired
/// together.
///
/// `Atlas` owns the components and exposes the host-invoked command surface:
/// rebuild, clear, save, classification queries, and the three change
/// notifications plus the periodic tick that drains them. The components
/// remain public for hosts that need to wire them differently.
pub struct Atlas<H> {
    host: H,
    store: GraphStore,
    persistence: PersistenceAdapter,
    reactor: ChangeReactor,
}

impl<H: AssetHost> Atlas<H> {
    /// Open a session, loading any snapshot at `snapshot_path`.
    ///
    /// An absent or unreadable snapshot starts the session empty and stale.
    pub fn open(host: H, snapshot_path: impl Into<PathBuf>) -> Self {
        Self::open_with(host, snapshot_path, WarningVisibility::default())
    }

    /// Open a session with explicit warning visibility.
    pub fn open_with(
        host: H,
        snapshot_path: impl Into<PathBuf>,
        visibility: WarningVisibility,
    ) -> Self {
        let mut persistence = PersistenceAdapter::new(snapshot_path);
        let records = persistence.load();
        let mut store = GraphStore::with_visibility(visibility);
        store.restore(records);
        Self {
            host,
            store,
            persistence,
            reactor: ChangeReactor::new(),
        }
    }

    /// The host this session reads from.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host (the engine never mutates it itself).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The underlying graph store.
    #[must_use]
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Whether a full rebuild is required before incremental updates are
    /// trusted.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.persistence.is_stale()
    }

    /// Rebuild the whole graph from a full host scan.
    ///
    /// The stale flag is set for the duration: a completed rebuild clears it
    /// and persists the snapshot; a cancelled one leaves the graph empty,
    /// the flag set, and the persisted snapshot untouched.
    ///
    /// # Errors
    ///
    /// Propagates a failed snapshot save after a completed rebuild.
    pub fn rebuild<P, C>(&mut self, mut progress: P, mut cancel: C) -> Result<RebuildOutcome>
    where
        P: FnMut(RebuildProgress<'_>),
        C: FnMut() -> bool,
    {
        self.persistence.mark_stale();
        let outcome = self
            .store
            .rebuild_all(&self.host, &mut progress, &mut cancel)?;
        match outcome {
            RebuildOutcome::Completed => {
                self.persistence.clear_stale();
                self.persistence.save(&self.store)?;
                info!(assets = self.store.len(), "Graph rebuild completed");
            }
            RebuildOutcome::Cancelled => {
                info!("Graph rebuild cancelled");
            }
        }
        Ok(outcome)
    }

    /// Empty the in-memory graph. No persistence side effect.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Persist the current graph and stale flag.
    ///
    /// # Errors
    ///
    /// Propagates a failed snapshot write; no silent data loss.
    pub fn save(&self) -> Result<()> {
        self.persistence.save(&self.store)
    }

    /// One record, if the asset is in the graph.
    #[must_use]
    pub fn record(&self, id: AssetId) -> Option<&AssetRecord> {
        self.store.get(id)
    }

    /// Classification of one asset, computed and memoized on demand.
    #[must_use]
    pub fn classification(&self, id: AssetId) -> BuildClassification {
        self.store.classification(&self.host, id)
    }

    /// Whether one asset is reachable from the shipped build.
    #[must_use]
    pub fn is_included_in_build(&self, id: AssetId) -> bool {
        self.store.is_included_in_build(&self.host, id)
    }

    /// Every asset not reachable from the shipped build, sorted by id.
    #[must_use]
    pub fn orphans(&self) -> Vec<AssetId> {
        let mut orphans: Vec<AssetId> = self
            .store
            .asset_ids()
            .filter(|&id| !self.store.is_included_in_build(&self.host, id))
            .collect();
        orphans.sort_unstable();
        orphans
    }

    /// Notification: the host saved these asset paths.
    ///
    /// Queued for the next [`Self::tick`]; each asset is refreshed with its
    /// inbound edges preserved. Ignored while stale.
    pub fn on_assets_saved(&mut self, paths: Vec<String>) {
        self.reactor.notify_saved(&self.persistence, paths);
    }

    /// Notification: the host created an asset at this path.
    ///
    /// Queued for the next [`Self::tick`]. Ignored while stale.
    pub fn on_asset_created(&mut self, path: String) {
        self.reactor.notify_created(&self.persistence, path);
    }

    /// Notification: the host is about to delete the asset at this path.
    ///
    /// Applied immediately - the asset must be unlinked before the host
    /// finalizes the deletion. Ignored while stale. Always reports that the
    /// engine did not touch the file.
    pub fn on_asset_deleted(&mut self, path: &str) -> DeleteDisposition {
        self.reactor
            .notify_deleted(&mut self.store, &self.host, &self.persistence, path)
    }

    /// Periodic tick: drain queued notifications FIFO, then save once.
    ///
    /// # Errors
    ///
    /// Propagates a failed snapshot save after the drain.
    pub fn tick(&mut self) -> Result<()> {
        self.reactor
            .drain(&mut self.store, &self.host, &self.persistence)
    }

    /// Drain the inconsistency warnings collected since the last call.
    pub fn take_warnings(&mut self) -> Vec<GraphWarning> {
        self.store.take_warnings()
    }
}
