//! Integration tests for build-inclusion classification.
//!
//! Scenario shape: build a host universe, link every asset, then query.
//! Classification is queried through the store so memoization and
//! invalidation behave exactly as they would in a live session.

use atlas_graph::{AssetHost, AssetId, BuildClassification, GraphStore, MemoryHost};
use rstest::rstest;

fn id(value: u128) -> AssetId {
    AssetId::from_u128(value)
}

/// Add every host asset to the store, twice, so all edges resolve.
fn link_all(store: &mut GraphStore, host: &MemoryHost) {
    for asset in host.all_asset_ids() {
        store.add_or_update(host, asset, None).unwrap();
    }
    for asset in host.all_asset_ids() {
        store.add_or_update(host, asset, None).unwrap();
    }
}

#[rstest]
#[case::runtime_script("Assets/Scripts/A.cs", BuildClassification::RuntimeScript)]
#[case::editor_script("Assets/Editor/Tool.cs", BuildClassification::NotIncludable)]
#[case::editor_script_nested("Assets/Editor/Nested/Tool.cs", BuildClassification::NotIncludable)]
#[case::editor_anywhere("Packages/Thing/editor/Hook.cs", BuildClassification::NotIncludable)]
#[case::editor_is_case_insensitive("Assets/EDITOR/Tool.cs", BuildClassification::NotIncludable)]
#[case::resource_asset("Assets/Resources/B.asset", BuildClassification::ResourceAsset)]
#[case::resources_case_insensitive("Assets/RESOURCES/B.asset", BuildClassification::ResourceAsset)]
#[case::editor_resources_still_resource(
    "Assets/Editor/Resources/Skin.asset",
    BuildClassification::ResourceAsset
)]
#[case::plugins_has_no_effect("Assets/Plugins/C.mat", BuildClassification::NotIncluded)]
#[case::unmatched_asset("Assets/Misc/C.mat", BuildClassification::NotIncluded)]
#[case::file_named_editor_is_not_a_directory_rule(
    "Assets/Misc/editor",
    BuildClassification::NotIncluded
)]
#[case::scene_not_in_build_list("Assets/Scenes/Side.unity", BuildClassification::NotIncluded)]
fn path_rules(#[case] path: &str, #[case] expected: BuildClassification) {
    let mut host = MemoryHost::new();
    host.add_asset(id(1), path, []);

    let mut store = GraphStore::new();
    link_all(&mut store, &host);

    assert_eq!(store.classification(&host, id(1)), expected);
    assert_eq!(
        store.is_included_in_build(&host, id(1)),
        expected.is_included()
    );
}

#[test]
fn scene_in_build_list_is_included() {
    let mut host = MemoryHost::new();
    host.add_asset(id(1), "Assets/Scenes/Main.unity", []);
    host.add_scene_to_build("Assets/Scenes/Main.unity");

    let mut store = GraphStore::new();
    link_all(&mut store, &host);

    assert_eq!(
        store.classification(&host, id(1)),
        BuildClassification::SceneInBuild
    );
}

#[test]
fn singleton_resource_path_is_included() {
    let mut host = MemoryHost::new();
    host.add_asset(id(1), "Assets/Settings/Registry.asset", []);
    host.set_singleton_resource_path("Assets/Settings/Registry.asset");

    let mut store = GraphStore::new();
    link_all(&mut store, &host);

    assert_eq!(
        store.classification(&host, id(1)),
        BuildClassification::ResourceAsset
    );
}

#[test]
fn unknown_id_classifies_as_unknown() {
    let store = GraphStore::new();
    let host = MemoryHost::new();
    assert_eq!(
        store.classification(&host, id(42)),
        BuildClassification::Unknown
    );
    assert!(!store.is_included_in_build(&host, id(42)));
}

#[test]
fn reachability_propagates_from_an_included_referencer() {
    let mut host = MemoryHost::new();
    host.add_asset(id(1), "Assets/Scripts/Root.cs", [id(2)]);
    host.add_asset(id(2), "Assets/Art/Leaf.png", []);

    let mut store = GraphStore::new();
    link_all(&mut store, &host);

    assert_eq!(
        store.classification(&host, id(2)),
        BuildClassification::Referenced
    );
}

#[test]
fn reachability_propagates_transitively() {
    let mut host = MemoryHost::new();
    host.add_asset(id(1), "Assets/Scripts/Root.cs", [id(2)]);
    host.add_asset(id(2), "Assets/Prefabs/Mid.prefab", [id(3)]);
    host.add_asset(id(3), "Assets/Art/Leaf.png", []);

    let mut store = GraphStore::new();
    link_all(&mut store, &host);

    assert_eq!(
        store.classification(&host, id(3)),
        BuildClassification::Referenced
    );
}

#[test]
fn excluded_referencers_do_not_propagate() {
    let mut host = MemoryHost::new();
    host.add_asset(id(1), "Assets/Editor/Tool.cs", [id(2)]);
    host.add_asset(id(2), "Assets/Art/Gizmo.png", []);

    let mut store = GraphStore::new();
    link_all(&mut store, &host);

    assert_eq!(
        store.classification(&host, id(1)),
        BuildClassification::NotIncludable
    );
    assert_eq!(
        store.classification(&host, id(2)),
        BuildClassification::NotIncluded
    );
}

#[test]
fn mutual_dependency_terminates_as_not_included() {
    let mut host = MemoryHost::new();
    host.add_asset(id(1), "Assets/Misc/X.mat", [id(2)]);
    host.add_asset(id(2), "Assets/Misc/Y.mat", [id(1)]);

    let mut store = GraphStore::new();
    link_all(&mut store, &host);

    assert_eq!(
        store.classification(&host, id(1)),
        BuildClassification::NotIncluded
    );
    assert_eq!(
        store.classification(&host, id(2)),
        BuildClassification::NotIncluded
    );
}

#[test]
fn cycle_reached_from_an_included_root_is_referenced() {
    // Scene -> X, X <-> Y. Querying Y first walks X, which resolves through
    // the scene while Y's own slot guards the back-edge.
    let mut host = MemoryHost::new();
    host.add_asset(id(1), "Assets/Scenes/Main.unity", [id(2)]);
    host.add_asset(id(2), "Assets/Misc/X.mat", [id(3)]);
    host.add_asset(id(3), "Assets/Misc/Y.mat", [id(2)]);
    host.add_scene_to_build("Assets/Scenes/Main.unity");

    let mut store = GraphStore::new();
    link_all(&mut store, &host);

    assert_eq!(
        store.classification(&host, id(3)),
        BuildClassification::Referenced
    );
    assert_eq!(
        store.classification(&host, id(2)),
        BuildClassification::Referenced
    );
}

#[test]
fn removing_the_root_invalidates_the_leaf() {
    let mut host = MemoryHost::new();
    host.add_asset(id(1), "Assets/Scripts/Root.cs", [id(2)]);
    host.add_asset(id(2), "Assets/Art/Leaf.png", []);

    let mut store = GraphStore::new();
    link_all(&mut store, &host);
    assert_eq!(
        store.classification(&host, id(2)),
        BuildClassification::Referenced
    );

    store.remove(&host, id(1)).unwrap();
    assert_eq!(
        store.classification(&host, id(2)),
        BuildClassification::NotIncluded
    );
}

#[test]
fn a_readd_that_drops_the_edge_invalidates_the_leaf() {
    let mut host = MemoryHost::new();
    host.add_asset(id(1), "Assets/Scripts/Root.cs", [id(2)]);
    host.add_asset(id(2), "Assets/Art/Leaf.png", []);

    let mut store = GraphStore::new();
    link_all(&mut store, &host);
    assert_eq!(
        store.classification(&host, id(2)),
        BuildClassification::Referenced
    );

    // The root no longer references the leaf; refresh it the way a save
    // notification would.
    host.set_dependencies(id(1), []);
    let removed = store.remove(&host, id(1)).unwrap();
    store
        .add_or_update(&host, id(1), removed.map(atlas_graph::AssetRecord::into_referencers))
        .unwrap();

    assert_eq!(
        store.classification(&host, id(2)),
        BuildClassification::NotIncluded
    );
}

#[test]
fn another_included_referencer_keeps_the_leaf_referenced() {
    let mut host = MemoryHost::new();
    host.add_asset(id(1), "Assets/Scripts/Root.cs", [id(3)]);
    host.add_asset(id(2), "Assets/Scripts/Other.cs", [id(3)]);
    host.add_asset(id(3), "Assets/Art/Leaf.png", []);

    let mut store = GraphStore::new();
    link_all(&mut store, &host);
    assert_eq!(
        store.classification(&host, id(3)),
        BuildClassification::Referenced
    );

    store.remove(&host, id(1)).unwrap();
    assert_eq!(
        store.classification(&host, id(3)),
        BuildClassification::Referenced
    );
}

#[test]
fn pathless_asset_classifies_through_referencers_only() {
    let mut host = MemoryHost::new();
    host.add_asset(id(1), "Assets/Scripts/Root.cs", [id(2)]);
    host.add_asset(id(2), "", []);

    let mut store = GraphStore::new();
    link_all(&mut store, &host);

    assert_eq!(
        store.classification(&host, id(2)),
        BuildClassification::Referenced
    );
}

#[test]
fn classification_is_memoized_until_invalidated() {
    let mut host = MemoryHost::new();
    host.add_asset(id(1), "Assets/Scripts/A.cs", []);

    let mut store = GraphStore::new();
    link_all(&mut store, &host);

    assert_eq!(
        store.get(id(1)).unwrap().cached_classification(),
        BuildClassification::Unknown
    );
    store.classification(&host, id(1));
    assert_eq!(
        store.get(id(1)).unwrap().cached_classification(),
        BuildClassification::RuntimeScript
    );
}
