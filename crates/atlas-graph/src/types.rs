//! Domain types for the atlas dependency graph.
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | Asset identity | 128-bit newtype, not path | Paths change on move; identity must not |
//! | Classification cache | Explicit three-state slot | "not computed" and "being computed" are different states |
//! | Edge sets | `HashSet` in memory | Membership tests dominate; order only matters on disk |
//! | On-disk record | Separate struct (see `persist`) | The memo slot is never persisted |

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Asset identity
// ============================================================================

/// A stable, globally unique identifier for one asset.
///
/// Identity survives moves and renames - it names the asset, not its current
/// path. Equality and hashing are by value. The all-zero value is reserved as
/// "empty" and is never a valid graph member; mutation operations reject it.
///
/// Rendered as 32 lowercase hex digits, which is also the serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(u128);

impl AssetId {
    /// The reserved empty identifier.
    pub const EMPTY: Self = Self(0);

    /// Create an identifier from its raw 128-bit value.
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value)
    }

    /// Extract the raw 128-bit value.
    #[must_use]
    pub const fn as_u128(self) -> u128 {
        self.0
    }

    /// Whether this is the reserved empty identifier.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// Error returned when parsing an [`AssetId`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("asset id must be 32 hex digits, got {found:?}")]
pub struct ParseAssetIdError {
    /// The rejected input.
    pub found: String,
}

impl FromStr for AssetId {
    type Err = ParseAssetIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseAssetIdError {
                found: s.to_string(),
            });
        }
        u128::from_str_radix(s, 16)
            .map(Self)
            .map_err(|_| ParseAssetIdError {
                found: s.to_string(),
            })
    }
}

impl Serialize for AssetId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Build classification
// ============================================================================

/// Discriminant below which a classification is outside the shipped build.
const INCLUDED_BAND_MIN: u8 = 10;

/// How an asset relates to the shipped build.
///
/// The discriminants are split into two bands: values below
/// [`INCLUDED_BAND_MIN`] are outside the build, values at or above it are
/// inside. Callers must only interpret the numeric ordering through
/// [`BuildClassification::is_included`] - the gap between the bands is
/// deliberate and individual values carry no further ordering meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildClassification {
    /// Not yet computed.
    Unknown = 0,

    /// Can never ship (e.g., an editor-only script).
    NotIncludable = 1,
    /// Nothing reachable from the build references it.
    NotIncluded = 2,

    /// A scene listed in the host's build scene list.
    SceneInBuild = 10,
    /// A script compiled into the runtime.
    RuntimeScript = 11,
    /// An asset packaged wholesale (resource folder or declared singleton).
    ResourceAsset = 12,
    /// Transitively referenced by an included asset.
    Referenced = 13,
}

impl BuildClassification {
    /// Whether this classification is in the included band.
    #[must_use]
    pub fn is_included(self) -> bool {
        self as u8 >= INCLUDED_BAND_MIN
    }

    /// Short human-readable name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::NotIncludable => "not includable",
            Self::NotIncluded => "not included",
            Self::SceneInBuild => "scene in build",
            Self::RuntimeScript => "runtime script",
            Self::ResourceAsset => "resource asset",
            Self::Referenced => "referenced",
        }
    }
}

impl fmt::Display for BuildClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Classification memo slot
// ============================================================================

/// State of a record's memoized classification.
///
/// `Computing` is the cycle guard: while a record's classification is being
/// derived, any re-entrant lookup (a reference cycle) observes `Computing`
/// and reads it as a resolved-enough `NotIncluded` instead of recursing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IncludeSlot {
    /// Never computed, or invalidated since.
    Unknown,
    /// Computation in progress on this logical thread.
    Computing,
    /// Memoized result.
    Resolved(BuildClassification),
}

// ============================================================================
// Asset record
// ============================================================================

/// One node of the dependency graph.
///
/// Holds both edge directions so removal and reverse-reachability never scan
/// the whole graph. Edge identifiers need not themselves have a record - a
/// dangling reference is legal and reported, not fatal.
#[derive(Debug, Clone)]
pub struct AssetRecord {
    id: AssetId,
    /// Assets that directly depend on this one (inbound edges).
    pub(crate) referencers: HashSet<AssetId>,
    /// Assets this one directly depends on (outbound edges).
    pub(crate) dependencies: HashSet<AssetId>,
    /// Memoized classification. Interior mutability lets lazy computation
    /// fill the cache through shared references during graph queries.
    cached: Cell<IncludeSlot>,
}

impl AssetRecord {
    /// Create an empty record for `id` with no edges.
    #[must_use]
    pub(crate) fn new(id: AssetId) -> Self {
        Self {
            id,
            referencers: HashSet::new(),
            dependencies: HashSet::new(),
            cached: Cell::new(IncludeSlot::Unknown),
        }
    }

    /// Create a record with the given edge sets and an unknown classification.
    pub(crate) fn from_edges<R, D>(id: AssetId, referencers: R, dependencies: D) -> Self
    where
        R: IntoIterator<Item = AssetId>,
        D: IntoIterator<Item = AssetId>,
    {
        Self {
            id,
            referencers: referencers.into_iter().collect(),
            dependencies: dependencies.into_iter().collect(),
            cached: Cell::new(IncludeSlot::Unknown),
        }
    }

    /// The asset this record describes.
    #[must_use]
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// Assets that directly depend on this one.
    #[must_use]
    pub fn referencers(&self) -> &HashSet<AssetId> {
        &self.referencers
    }

    /// Assets this one directly depends on.
    #[must_use]
    pub fn dependencies(&self) -> &HashSet<AssetId> {
        &self.dependencies
    }

    /// The memoized classification, or `Unknown` if it has not been computed
    /// (or was invalidated) since the last edge change.
    #[must_use]
    pub fn cached_classification(&self) -> BuildClassification {
        match self.cached.get() {
            IncludeSlot::Resolved(value) => value,
            IncludeSlot::Unknown | IncludeSlot::Computing => BuildClassification::Unknown,
        }
    }

    /// Consume the record, keeping only its inbound edge set.
    #[must_use]
    pub fn into_referencers(self) -> HashSet<AssetId> {
        self.referencers
    }

    pub(crate) fn slot(&self) -> IncludeSlot {
        self.cached.get()
    }

    pub(crate) fn begin_computing(&self) {
        self.cached.set(IncludeSlot::Computing);
    }

    pub(crate) fn resolve(&self, value: BuildClassification) {
        self.cached.set(IncludeSlot::Resolved(value));
    }

    /// Drop the memoized classification so the next read recomputes it.
    pub(crate) fn invalidate_classification(&self) {
        self.cached.set(IncludeSlot::Unknown);
    }
}

// ============================================================================
// Rebuild results
// ============================================================================

/// Terminal state of a full rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// Every asset was enumerated and linked.
    Completed,
    /// The cancellation signal fired; the graph was discarded and the stale
    /// flag left set, so the caller must retry.
    Cancelled,
}

/// Progress report emitted at the rebuild's cancellation-poll interval.
#[derive(Debug, Clone, Copy)]
pub struct RebuildProgress<'a> {
    /// Zero-based index of the asset about to be linked.
    pub index: usize,
    /// Total assets enumerated for this rebuild.
    pub total: usize,
    /// Host path of the current asset, empty if the host has none.
    pub path: &'a str,
}
