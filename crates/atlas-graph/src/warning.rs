//! Non-fatal graph inconsistency diagnostics.
//!
//! The graph keeps working when its invariants are found violated - an edge
//! missing its mirror, or an edge pointing at an identifier with no record.
//! These conditions are surfaced as [`GraphWarning`] values: logged when
//! their kind is enabled in [`WarningVisibility`], collected on the store for
//! callers that want to inspect them, and never turned into errors.

use crate::host::AssetHost;
use crate::types::AssetId;

/// Which end of a record's edge pair was missing its mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    /// The counterpart claimed to depend on the asset but did not list it as
    /// a dependency.
    Dependency,
    /// The counterpart was depended on by the asset but did not list it as a
    /// referencer.
    Referencer,
}

/// A detected graph inconsistency.
///
/// Warnings are diagnostics, not correctness gates: processing continues on
/// best-effort state whenever one is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphWarning {
    /// An edge existed in one direction but its mirrored counterpart was
    /// absent, most likely because of out-of-band mutation.
    NonReciprocity {
        /// The record whose edge set was missing the mirror.
        counterpart: AssetId,
        /// The asset being unlinked when the violation was found.
        asset: AssetId,
        /// Which edge set was missing the entry.
        missing: EdgeDirection,
    },

    /// An edge referenced an identifier with no record in the store, or a
    /// mutation targeted an identifier that was never added.
    NotPresentInStore {
        /// The identifier with no record.
        asset: AssetId,
    },
}

impl GraphWarning {
    /// Whether this warning should be reported under `visibility`.
    #[must_use]
    pub fn is_visible(&self, visibility: WarningVisibility) -> bool {
        match self {
            Self::NonReciprocity { .. } => visibility.non_reciprocity,
            Self::NotPresentInStore { .. } => visibility.not_present,
        }
    }

    /// Human-readable description, resolving identifiers through the host.
    #[must_use]
    pub fn message(&self, host: &dyn AssetHost) -> String {
        match self {
            Self::NonReciprocity {
                counterpart,
                asset,
                missing: EdgeDirection::Dependency,
            } => format!(
                "asset '{}' that depends on '{}' doesn't have it as a dependency",
                display_asset(host, *counterpart),
                display_asset(host, *asset),
            ),
            Self::NonReciprocity {
                counterpart,
                asset,
                missing: EdgeDirection::Referencer,
            } => format!(
                "asset '{}' that is referenced by '{}' doesn't have it as a referencer",
                display_asset(host, *counterpart),
                display_asset(host, *asset),
            ),
            Self::NotPresentInStore { asset } => format!(
                "asset '{}' is not present in the graph",
                display_asset(host, *asset),
            ),
        }
    }
}

/// Per-kind visibility toggles for graph warnings.
///
/// Both kinds are enabled by default. Disabling a kind suppresses both the
/// log line and collection on the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarningVisibility {
    /// Report edges missing their mirrored counterpart.
    pub non_reciprocity: bool,
    /// Report edges naming identifiers with no record.
    pub not_present: bool,
}

impl Default for WarningVisibility {
    fn default() -> Self {
        Self {
            non_reciprocity: true,
            not_present: true,
        }
    }
}

impl WarningVisibility {
    /// Visibility with every kind suppressed.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            non_reciprocity: false,
            not_present: false,
        }
    }
}

/// Render an asset for diagnostics: its host path when one resolves, or a
/// placeholder naming the raw identifier.
pub(crate) fn display_asset(host: &dyn AssetHost, id: AssetId) -> String {
    match host.asset_path(id) {
        Some(path) if !path.is_empty() => path,
        _ => format!("(missing asset with id {id})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    #[test]
    fn visibility_defaults_to_all_enabled() {
        let visibility = WarningVisibility::default();
        assert!(visibility.non_reciprocity);
        assert!(visibility.not_present);
    }

    #[test]
    fn warning_kinds_filter_independently() {
        let warning = GraphWarning::NotPresentInStore {
            asset: AssetId::from_u128(1),
        };
        let only_reciprocity = WarningVisibility {
            non_reciprocity: true,
            not_present: false,
        };
        assert!(!warning.is_visible(only_reciprocity));
        assert!(warning.is_visible(WarningVisibility::default()));
        assert!(!warning.is_visible(WarningVisibility::silent()));
    }

    #[test]
    fn message_uses_path_when_host_resolves_one() {
        let mut host = MemoryHost::new();
        let id = AssetId::from_u128(5);
        host.add_asset(id, "Assets/Things/Widget.mat", []);

        let warning = GraphWarning::NotPresentInStore { asset: id };
        let message = warning.message(&host);
        assert!(message.contains("Assets/Things/Widget.mat"));
    }

    #[test]
    fn message_falls_back_to_identifier_for_unknown_assets() {
        let host = MemoryHost::new();
        let id = AssetId::from_u128(5);

        let warning = GraphWarning::NotPresentInStore { asset: id };
        let message = warning.message(&host);
        assert!(message.contains("missing asset with id"));
        assert!(message.contains(&id.to_string()));
    }
}
