//! The host collaborator seam.
//!
//! The engine does not watch file systems or parse content. Everything it
//! knows about assets - which exist, what each one directly references,
//! where each one lives - it pulls through [`AssetHost`]. The host also
//! pushes change notifications, but those arrive through the reactor, not
//! through this trait.
//!
//! [`MemoryHost`] is a complete in-memory implementation, used by this
//! crate's tests and suitable for embedding wherever the asset universe is
//! already in memory.

use crate::types::AssetId;
use std::collections::HashMap;

/// Read-only view of the host content system.
///
/// All answers reflect the host's *current* understanding; the engine never
/// caches host answers beyond the edges it derives from them.
pub trait AssetHost {
    /// Every asset identity the host knows, for a full scan.
    fn all_asset_ids(&self) -> Vec<AssetId>;

    /// Direct, non-recursive outbound references of one asset.
    fn direct_dependencies(&self, id: AssetId) -> Vec<AssetId>;

    /// Current path of an asset, if the host can resolve one.
    fn asset_path(&self, id: AssetId) -> Option<String>;

    /// Identity of the asset at `path`, if any.
    fn asset_id_at_path(&self, path: &str) -> Option<AssetId>;

    /// Whether `path` is listed in the host's build scene list.
    fn is_scene_in_build_list(&self, path: &str) -> bool;

    /// Path of a well-known singleton resource asset, when the host's
    /// optional subsystem declares one.
    fn singleton_resource_path(&self) -> Option<String> {
        None
    }
}

/// One asset as the in-memory host knows it.
#[derive(Debug, Clone)]
struct HostedAsset {
    path: String,
    dependencies: Vec<AssetId>,
}

/// In-memory [`AssetHost`] with explicit, insertion-ordered enumeration.
///
/// Enumeration order is the order assets were added, which makes full-scan
/// behavior reproducible in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    assets: HashMap<AssetId, HostedAsset>,
    order: Vec<AssetId>,
    by_path: HashMap<String, AssetId>,
    build_scenes: Vec<String>,
    singleton_resource: Option<String>,
}

impl MemoryHost {
    /// Create an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset (or replace one with the same id), with its current path
    /// and direct dependencies.
    pub fn add_asset(
        &mut self,
        id: AssetId,
        path: impl Into<String>,
        dependencies: impl IntoIterator<Item = AssetId>,
    ) {
        let path = path.into();
        if let Some(previous) = self.assets.insert(
            id,
            HostedAsset {
                path: path.clone(),
                dependencies: dependencies.into_iter().collect(),
            },
        ) {
            self.by_path.remove(&previous.path);
        } else {
            self.order.push(id);
        }
        self.by_path.insert(path, id);
    }

    /// Replace the direct-dependency list of an existing asset.
    ///
    /// Unknown ids are ignored.
    pub fn set_dependencies(&mut self, id: AssetId, dependencies: impl IntoIterator<Item = AssetId>) {
        if let Some(asset) = self.assets.get_mut(&id) {
            asset.dependencies = dependencies.into_iter().collect();
        }
    }

    /// Forget an asset entirely.
    pub fn remove_asset(&mut self, id: AssetId) {
        if let Some(asset) = self.assets.remove(&id) {
            self.by_path.remove(&asset.path);
            self.order.retain(|&other| other != id);
        }
    }

    /// Append a scene path to the build scene list.
    pub fn add_scene_to_build(&mut self, path: impl Into<String>) {
        self.build_scenes.push(path.into());
    }

    /// Declare the optional singleton resource path.
    pub fn set_singleton_resource_path(&mut self, path: impl Into<String>) {
        self.singleton_resource = Some(path.into());
    }
}

impl AssetHost for MemoryHost {
    fn all_asset_ids(&self) -> Vec<AssetId> {
        self.order.clone()
    }

    fn direct_dependencies(&self, id: AssetId) -> Vec<AssetId> {
        self.assets
            .get(&id)
            .map(|asset| asset.dependencies.clone())
            .unwrap_or_default()
    }

    fn asset_path(&self, id: AssetId) -> Option<String> {
        self.assets.get(&id).map(|asset| asset.path.clone())
    }

    fn asset_id_at_path(&self, path: &str) -> Option<AssetId> {
        self.by_path.get(path).copied()
    }

    fn is_scene_in_build_list(&self, path: &str) -> bool {
        self.build_scenes.iter().any(|scene| scene == path)
    }

    fn singleton_resource_path(&self) -> Option<String> {
        self.singleton_resource.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: u128) -> AssetId {
        AssetId::from_u128(value)
    }

    #[test]
    fn enumeration_follows_insertion_order() {
        let mut host = MemoryHost::new();
        host.add_asset(id(3), "c", []);
        host.add_asset(id(1), "a", []);
        host.add_asset(id(2), "b", []);

        assert_eq!(host.all_asset_ids(), vec![id(3), id(1), id(2)]);
    }

    #[test]
    fn path_lookups_are_bidirectional() {
        let mut host = MemoryHost::new();
        host.add_asset(id(1), "Assets/A.mat", []);

        assert_eq!(host.asset_path(id(1)).as_deref(), Some("Assets/A.mat"));
        assert_eq!(host.asset_id_at_path("Assets/A.mat"), Some(id(1)));
        assert_eq!(host.asset_id_at_path("Assets/B.mat"), None);
    }

    #[test]
    fn replacing_an_asset_updates_its_path_index() {
        let mut host = MemoryHost::new();
        host.add_asset(id(1), "Assets/Old.mat", []);
        host.add_asset(id(1), "Assets/New.mat", []);

        assert_eq!(host.asset_id_at_path("Assets/Old.mat"), None);
        assert_eq!(host.asset_id_at_path("Assets/New.mat"), Some(id(1)));
        // Re-adding does not duplicate the enumeration entry.
        assert_eq!(host.all_asset_ids(), vec![id(1)]);
    }

    #[test]
    fn removing_an_asset_forgets_everything() {
        let mut host = MemoryHost::new();
        host.add_asset(id(1), "Assets/A.mat", []);
        host.remove_asset(id(1));

        assert!(host.all_asset_ids().is_empty());
        assert_eq!(host.asset_path(id(1)), None);
        assert_eq!(host.asset_id_at_path("Assets/A.mat"), None);
    }

    #[test]
    fn unknown_asset_has_no_dependencies() {
        let host = MemoryHost::new();
        assert!(host.direct_dependencies(id(42)).is_empty());
    }

    #[test]
    fn build_scene_list_matches_exact_paths() {
        let mut host = MemoryHost::new();
        host.add_scene_to_build("Assets/Scenes/Main.unity");

        assert!(host.is_scene_in_build_list("Assets/Scenes/Main.unity"));
        assert!(!host.is_scene_in_build_list("Assets/Scenes/Other.unity"));
    }
}
