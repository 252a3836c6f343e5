//! Build-inclusion classification.
//!
//! Classification of one asset is an ordered rule walk, first match wins:
//!
//! 1. Referencers with an already-resolved classification - if any resolved
//!    referencer is included, the asset is `Referenced`.
//! 2. Path segment rules (`editor` marks editor-only, `resources` classifies
//!    immediately).
//! 3. Extension rules (scripts, scenes against the build scene list).
//! 4. The host's declared singleton resource path.
//! 5. Referencers not yet resolved, computed recursively.
//! 6. Default: `NotIncluded`.
//!
//! Resolved referencers are checked before anything recurses so that cycles
//! resolve deterministically: whichever member of a cycle resolves first
//! wins, and the rest read its memoized value.
//!
//! Cycle safety comes from the record's memo slot: the slot is set to the
//! in-progress sentinel before the walk runs, and a re-entrant lookup reads
//! the sentinel as `NotIncluded` instead of recursing (see
//! [`IncludeSlot::Computing`]). Rule 5 recurses only into referencers whose
//! slot is still unknown, so it never re-enters an in-progress computation.

use crate::host::AssetHost;
use crate::store::GraphStore;
use crate::types::{AssetId, AssetRecord, BuildClassification, IncludeSlot};
use tracing::debug;

/// Script source extension, matched on the lowercased path.
const SCRIPT_EXTENSION: &str = "cs";
/// Scene extension, matched on the lowercased path.
const SCENE_EXTENSION: &str = "unity";

/// Classification of `id`, memoized on its record.
///
/// Returns [`BuildClassification::Unknown`] for an id with no record.
pub(crate) fn classification(
    store: &GraphStore,
    host: &dyn AssetHost,
    id: AssetId,
) -> BuildClassification {
    let Some(record) = store.get(id) else {
        return BuildClassification::Unknown;
    };
    match record.slot() {
        IncludeSlot::Resolved(value) => value,
        // Re-entrant read during this record's own computation: report the
        // sentinel's resolved-enough value and let the cycle terminate.
        IncludeSlot::Computing => BuildClassification::NotIncluded,
        IncludeSlot::Unknown => {
            record.begin_computing();
            let value = compute(store, host, record);
            record.resolve(value);
            value
        }
    }
}

/// The rule walk. Only ever entered with `record`'s slot set to `Computing`.
fn compute(
    store: &GraphStore,
    host: &dyn AssetHost,
    record: &AssetRecord,
) -> BuildClassification {
    // Rule 1: referencers that already resolved.
    if referenced_by_resolved(store, record) {
        return BuildClassification::Referenced;
    }

    // Rules 2-4 need a path; an asset the host cannot place can still be
    // classified through its referencers below.
    let path = host.asset_path(record.id()).unwrap_or_default();
    if !path.is_empty() {
        let lowered = path.to_lowercase();
        let segments: Vec<&str> = lowered.split('/').collect();

        // Rule 2: directory segments (everything but the final one).
        let mut editor_only = false;
        for segment in &segments[..segments.len().saturating_sub(1)] {
            match *segment {
                "editor" => editor_only = true,
                "resources" => return BuildClassification::ResourceAsset,
                // Recognized, no classification effect.
                "plugins" => {}
                _ => {}
            }
        }

        // Rule 3: extension.
        match extension_of(&lowered) {
            Some(SCRIPT_EXTENSION) => {
                return if editor_only {
                    BuildClassification::NotIncludable
                } else {
                    BuildClassification::RuntimeScript
                };
            }
            Some(SCENE_EXTENSION) => {
                // The scene list stores host-cased paths, so match on the
                // original path, not the lowered one.
                if host.is_scene_in_build_list(&path) {
                    return BuildClassification::SceneInBuild;
                }
            }
            _ => {}
        }

        // Rule 4: declared singleton resource.
        if host
            .singleton_resource_path()
            .is_some_and(|singleton| singleton == path)
        {
            return BuildClassification::ResourceAsset;
        }
    }

    // Rule 5: referencers not resolved yet.
    if referenced_by_unresolved(store, host, record) {
        return BuildClassification::Referenced;
    }

    BuildClassification::NotIncluded
}

/// Whether any referencer with a resolved classification is included.
fn referenced_by_resolved(store: &GraphStore, record: &AssetRecord) -> bool {
    record.referencers().iter().any(|&referencer| {
        let Some(other) = store.get(referencer) else {
            debug!(
                asset = %record.id(),
                referencer = %referencer,
                "Referencer has no record, skipping"
            );
            return false;
        };
        match other.slot() {
            IncludeSlot::Resolved(value) => value.is_included(),
            // An in-progress referencer reads as not included.
            IncludeSlot::Computing | IncludeSlot::Unknown => false,
        }
    })
}

/// Whether recursively classifying any still-unknown referencer yields an
/// included result.
fn referenced_by_unresolved(
    store: &GraphStore,
    host: &dyn AssetHost,
    record: &AssetRecord,
) -> bool {
    record.referencers().iter().any(|&referencer| {
        match store.get(referencer) {
            Some(other) if other.slot() == IncludeSlot::Unknown => {
                classification(store, host, referencer).is_included()
            }
            // Resolved referencers were handled by the pre-pass; in-progress
            // ones are the cycle back-edge and must not be re-entered.
            _ => false,
        }
    })
}

/// The final extension of a slash-separated path, if any.
fn extension_of(path: &str) -> Option<&str> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    match file_name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() && !extension.is_empty() => Some(extension),
        _ => None,
    }
}
