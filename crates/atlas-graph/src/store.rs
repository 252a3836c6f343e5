//! The authoritative in-memory graph.
//!
//! [`GraphStore`] owns every [`AssetRecord`] and is the only component that
//! mutates them. Mutations keep the two edge directions mirrored: whenever an
//! edge is added or removed on one record, the counterpart record is updated
//! in the same operation and its memoized classification invalidated.
//!
//! Linking is best-effort by design: a dependency on an asset that has no
//! record yet is dropped silently rather than queued. The edge appears once
//! the depending asset is refreshed after the target exists, or on the next
//! full rebuild.

use crate::classify;
use crate::error::{Error, Result};
use crate::host::AssetHost;
use crate::types::{AssetId, AssetRecord, BuildClassification, RebuildOutcome, RebuildProgress};
use crate::warning::{EdgeDirection, GraphWarning, WarningVisibility};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// How many assets a rebuild links between cancellation polls and progress
/// reports.
const REBUILD_POLL_INTERVAL: usize = 10;

/// In-memory mapping from asset identity to its graph record.
#[derive(Debug, Default)]
pub struct GraphStore {
    records: HashMap<AssetId, AssetRecord>,
    visibility: WarningVisibility,
    warnings: Vec<GraphWarning>,
}

impl GraphStore {
    /// Create an empty store with default warning visibility.
    #[must_use]
    pub fn new() -> Self {
        Self::with_visibility(WarningVisibility::default())
    }

    /// Create an empty store with the given warning visibility.
    #[must_use]
    pub fn with_visibility(visibility: WarningVisibility) -> Self {
        Self {
            records: HashMap::new(),
            visibility,
            warnings: Vec::new(),
        }
    }

    /// Look up one record. Pure lookup, no side effects.
    #[must_use]
    pub fn get(&self, id: AssetId) -> Option<&AssetRecord> {
        self.records.get(&id)
    }

    /// Number of records in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate all records, in no particular order.
    pub fn records(&self) -> impl Iterator<Item = &AssetRecord> {
        self.records.values()
    }

    /// Iterate all asset identities, in no particular order.
    pub fn asset_ids(&self) -> impl Iterator<Item = AssetId> + '_ {
        self.records.keys().copied()
    }

    /// Create or refresh the record for `id` from the host's current
    /// direct-dependency list.
    ///
    /// Each reported dependency that is not the asset itself and already has
    /// a record is linked in both directions, and the target's memoized
    /// classification is invalidated - a new referencer can change whether
    /// the target is transitively included. Dependencies on assets with no
    /// record are dropped (best-effort linking, see the module docs).
    ///
    /// `override_referencers`, when supplied, replaces the record's inbound
    /// edge set wholesale. It exists for the remove-then-readd flow, where
    /// the inbound edges of the removed record must survive the replacement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] if `id` is the empty identifier.
    pub fn add_or_update(
        &mut self,
        host: &dyn AssetHost,
        id: AssetId,
        override_referencers: Option<HashSet<AssetId>>,
    ) -> Result<&AssetRecord> {
        if id.is_empty() {
            return Err(Error::InvalidIdentifier);
        }

        let linked: Vec<AssetId> = host
            .direct_dependencies(id)
            .into_iter()
            .filter(|&dependency| dependency != id && self.records.contains_key(&dependency))
            .collect();

        for dependency in &linked {
            if let Some(target) = self.records.get_mut(dependency) {
                target.referencers.insert(id);
                target.invalidate_classification();
            }
        }

        let record = self
            .records
            .entry(id)
            .or_insert_with(|| AssetRecord::new(id));
        record.dependencies.extend(linked);
        if let Some(referencers) = override_referencers {
            record.referencers = referencers;
        }
        Ok(record)
    }

    /// Unlink and erase the record for `id`.
    ///
    /// Every counterpart record is updated to drop its mirrored edge; a
    /// counterpart whose mirror was already absent is reported as a
    /// non-reciprocity, and a counterpart with no record at all as not
    /// present. Removing an id that has no record reports not-present and
    /// returns `None` with the store unchanged.
    ///
    /// The removed record is returned so the caller can re-derive edges for
    /// a replacement (move/rename flows preserve identity across a path
    /// change).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] if `id` is the empty identifier.
    pub fn remove(&mut self, host: &dyn AssetHost, id: AssetId) -> Result<Option<AssetRecord>> {
        if id.is_empty() {
            return Err(Error::InvalidIdentifier);
        }

        let Some(record) = self.records.remove(&id) else {
            self.report(host, GraphWarning::NotPresentInStore { asset: id });
            return Ok(None);
        };

        let mut found = Vec::new();

        // Everything known to reference this asset drops it as a dependency.
        for &referencer in &record.referencers {
            match self.records.get_mut(&referencer) {
                Some(other) => {
                    if other.dependencies.remove(&id) {
                        other.invalidate_classification();
                    } else {
                        found.push(GraphWarning::NonReciprocity {
                            counterpart: referencer,
                            asset: id,
                            missing: EdgeDirection::Dependency,
                        });
                    }
                }
                None => found.push(GraphWarning::NotPresentInStore { asset: referencer }),
            }
        }

        // Everything this asset referenced drops it as a referencer.
        for &dependency in &record.dependencies {
            match self.records.get_mut(&dependency) {
                Some(other) => {
                    if other.referencers.remove(&id) {
                        other.invalidate_classification();
                    } else {
                        found.push(GraphWarning::NonReciprocity {
                            counterpart: dependency,
                            asset: id,
                            missing: EdgeDirection::Referencer,
                        });
                    }
                }
                None => found.push(GraphWarning::NotPresentInStore { asset: dependency }),
            }
        }

        for warning in found {
            self.report(host, warning);
        }

        Ok(Some(record))
    }

    /// Empty the store unconditionally. No persistence side effect.
    pub fn clear(&mut self) {
        self.records.clear();
        self.warnings.clear();
    }

    /// Replace the store's contents with records restored from a snapshot.
    ///
    /// Restored records carry no memoized classification; everything is
    /// recomputed on first read.
    pub(crate) fn restore(&mut self, records: Vec<AssetRecord>) {
        self.records = records
            .into_iter()
            .filter(|record| !record.id().is_empty())
            .map(|record| (record.id(), record))
            .collect();
        self.warnings.clear();
    }

    /// Rebuild the whole graph from a full host scan.
    ///
    /// Discards the in-memory graph, creates one empty record per enumerated
    /// asset, then links every asset through [`Self::add_or_update`];
    /// pre-creating all records first is what makes the final edge sets
    /// independent of enumeration order. Every [`REBUILD_POLL_INTERVAL`]
    /// assets, `progress` is reported and `cancel` polled; on cancellation
    /// the graph is left empty and [`RebuildOutcome::Cancelled`] returned.
    ///
    /// # Errors
    ///
    /// Currently infallible in practice (empty identifiers from the host are
    /// skipped), but linking reports through [`Result`] like every other
    /// mutation.
    pub fn rebuild_all(
        &mut self,
        host: &dyn AssetHost,
        progress: &mut dyn FnMut(RebuildProgress<'_>),
        cancel: &mut dyn FnMut() -> bool,
    ) -> Result<RebuildOutcome> {
        self.records = HashMap::new();
        self.warnings.clear();

        let ids: Vec<AssetId> = host
            .all_asset_ids()
            .into_iter()
            .filter(|id| !id.is_empty())
            .collect();

        // Gather all assets before linking any.
        for &id in &ids {
            self.records.insert(id, AssetRecord::new(id));
        }

        let total = ids.len();
        for (index, &id) in ids.iter().enumerate() {
            if index % REBUILD_POLL_INTERVAL == 0 {
                let path = host.asset_path(id).unwrap_or_default();
                progress(RebuildProgress {
                    index,
                    total,
                    path: &path,
                });
                if cancel() {
                    self.records = HashMap::new();
                    return Ok(RebuildOutcome::Cancelled);
                }
            }
            self.add_or_update(host, id, None)?;
        }

        Ok(RebuildOutcome::Completed)
    }

    /// Classification of `id`, computing and memoizing it if needed.
    ///
    /// Returns [`BuildClassification::Unknown`] for an id with no record.
    #[must_use]
    pub fn classification(&self, host: &dyn AssetHost, id: AssetId) -> BuildClassification {
        classify::classification(self, host, id)
    }

    /// Whether `id` is reachable from the shipped build.
    #[must_use]
    pub fn is_included_in_build(&self, host: &dyn AssetHost, id: AssetId) -> bool {
        self.classification(host, id).is_included()
    }

    /// Drain the warnings collected since the last call.
    pub fn take_warnings(&mut self) -> Vec<GraphWarning> {
        std::mem::take(&mut self.warnings)
    }

    fn report(&mut self, host: &dyn AssetHost, warning: GraphWarning) {
        if !warning.is_visible(self.visibility) {
            return;
        }
        warn!("{}", warning.message(host));
        self.warnings.push(warning);
    }
}
