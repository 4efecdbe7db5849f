//! Scene composition tests
//!
//! Tests for:
//! - Viewer scene: classification, per-role geometry, placement, pass-through
//! - Debug scene: fixed primitives, asset independence
//! - Scene singletons (environment light, ground)
//! - Build report for skipped nodes and degraded transforms
//! - Render state carried from settings

use std::sync::Arc;

use glam::{Quat, Vec3};
use lustre::assets::{AssetGraph, AssetHandle, EnvironmentMap};
use lustre::classify::NodeClassifier;
use lustre::compose::{BuildWarning, build_debug_scene, build_viewer_scene, build_viewer_scene_with};
use lustre::resources::geometry::{Attribute, Geometry};
use lustre::resources::material::{Material, MaterialProfiles, MaterialRole, Side};
use lustre::resources::ToneMappingMode;
use lustre::scene::{Node, NodeKey, PassThroughKind, SceneKind, Transform};
use lustre::settings::ViewerSettings;

// ============================================================================
// Helpers
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

/// Indexed pyramid: 4 shared vertices, 4 faces.
fn tetra() -> Geometry {
    let mut geo = Geometry::new();
    geo.set_attribute(
        "position",
        Attribute::new(vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ]),
    );
    geo.set_indices(&[0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3]);
    geo
}

fn environment() -> AssetHandle<EnvironmentMap> {
    AssetHandle::new("studio.hdr", EnvironmentMap::uniform(Vec3::splat(0.5)))
}

fn mesh_node(name: &str, position: Vec3) -> Node {
    let mut node = Node::with_geometry(name, tetra());
    node.transform = Transform::from_trs(position, Quat::IDENTITY, Vec3::ONE);
    node
}

/// The canonical three-part jewelry asset, all at root level.
fn jewelry_asset() -> AssetHandle<AssetGraph> {
    let mut graph = AssetGraph::new();
    graph.add_node(mesh_node("Ring_Gold_01", Vec3::new(0.0, 0.1, 0.0)));
    graph.add_node(mesh_node("Diamond_Center", Vec3::new(0.0, 0.5, 0.0)));
    graph.add_node(mesh_node("Prong_Setting", Vec3::new(0.0, 0.4, 0.0)));
    graph.update_world_matrices();
    AssetHandle::new("ring.glb", graph)
}

fn defaults() -> (ViewerSettings, lustre::SharedProfiles) {
    let settings = ViewerSettings::default();
    let profiles = settings.materials.clone().into_shared();
    (settings, profiles)
}

// ============================================================================
// Viewer scene
// ============================================================================

#[test]
fn viewer_scene_splits_three_part_asset() {
    let (settings, profiles) = defaults();
    let scene = build_viewer_scene(&jewelry_asset(), &environment(), &profiles, &settings);

    assert_eq!(scene.kind, SceneKind::Viewer);
    assert_eq!(scene.meshes_with_role(MaterialRole::Metal).count(), 1);
    assert_eq!(scene.meshes_with_role(MaterialRole::Gem).count(), 1);
    assert_eq!(scene.mesh_count(), 2);
    assert_eq!(scene.pass_through.len(), 1);

    let prong = &scene.pass_through[0];
    assert_eq!(prong.name, "Prong_Setting");
    assert_eq!(prong.kind, PassThroughKind::UnclassifiedMesh);

    assert_eq!(scene.light_count(), 1);
    assert_eq!(scene.ground_count(), 1);
    assert!(scene.report.is_clean());
}

#[test]
fn viewer_scene_attaches_role_profiles() {
    let (settings, profiles) = defaults();
    let scene = build_viewer_scene(&jewelry_asset(), &environment(), &profiles, &settings);

    let ring = scene.find_mesh("Ring_Gold_01").expect("ring mesh");
    let gold = ring.material.as_metal().expect("metal material");
    assert_eq!(gold.color.to_hex(), "#FFD700");
    assert!((gold.metalness - 1.0).abs() < EPSILON);
    assert!((gold.roughness - 0.15).abs() < EPSILON);
    assert!((gold.env_map_intensity - 2.0).abs() < EPSILON);
    assert_eq!(ring.material.side(), Side::Double);
    assert!(ring.cast_shadow && ring.receive_shadow);

    let diamond = scene.find_mesh("Diamond_Center").expect("diamond mesh");
    let gem = diamond.material.as_gem().expect("gem material");
    assert_eq!(gem.bounces, 3);
    assert!((gem.ior - 2.4).abs() < EPSILON);
    assert!(gem.fast_chroma);
    assert!(diamond.cast_shadow && !diamond.receive_shadow);
}

#[test]
fn profiles_are_shared_not_copied() {
    let (settings, profiles) = defaults();
    let scene = build_viewer_scene(&jewelry_asset(), &environment(), &profiles, &settings);

    let ring = scene.find_mesh("Ring_Gold_01").expect("ring mesh");
    match &ring.material {
        Material::Metal(p) => assert!(Arc::ptr_eq(p, profiles.metal())),
        Material::Gem(_) => panic!("ring must be metal"),
    }
}

#[test]
fn viewer_scene_processes_geometry_per_role() {
    let (settings, profiles) = defaults();
    let asset = jewelry_asset();
    let scene = build_viewer_scene(&asset, &environment(), &profiles, &settings);

    let diamond = scene.find_mesh("Diamond_Center").expect("diamond mesh");
    assert!(!diamond.geometry.is_indexed());
    assert_eq!(diamond.geometry.vertex_count(), 12);
    assert!(diamond.geometry.has_normals());

    let ring = scene.find_mesh("Ring_Gold_01").expect("ring mesh");
    assert!(ring.geometry.is_indexed());
    assert_eq!(ring.geometry.vertex_count(), 4);
    assert!(ring.geometry.has_normals());

    // Source geometry is untouched and never shared.
    for (_, node) in asset.nodes() {
        let source = node.geometry.as_ref().expect("mesh node");
        assert!(!source.has_normals());
        for (_, mesh) in scene.iter_meshes() {
            assert!(!Arc::ptr_eq(source, &mesh.geometry));
        }
    }
}

#[test]
fn pass_through_keeps_source_geometry() {
    let (settings, profiles) = defaults();
    let asset = jewelry_asset();
    let scene = build_viewer_scene(&asset, &environment(), &profiles, &settings);

    let prong = &scene.pass_through[0];
    let source = asset.get_node(prong.node).expect("source node");
    let shared = prong.geometry.as_ref().expect("unclassified mesh keeps geometry");
    assert!(Arc::ptr_eq(shared, source.geometry.as_ref().expect("mesh node")));
}

#[test]
fn metal_gets_world_matrix_gem_gets_local_trs() {
    let (settings, profiles) = defaults();

    let mut graph = AssetGraph::new();
    let mut group = Node::new("Scene_Root");
    group.transform = Transform::from_trs(Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY, Vec3::splat(2.0));
    let root = graph.add_node(group);
    graph.add_child(mesh_node("Ring_Band", Vec3::new(1.0, 0.0, 0.0)), root);
    graph.add_child(mesh_node("Gem_Top", Vec3::new(0.0, 0.5, 0.0)), root);
    graph.update_world_matrices();
    let asset = AssetHandle::new("nested.glb", graph);

    let scene = build_viewer_scene(&asset, &environment(), &profiles, &settings);

    // Band: root scale 2 applied to +X, then root's +Y.
    let band = scene.find_mesh("Ring_Band").expect("band");
    assert!(band.transform.matrix_override().is_some());
    assert!(vec3_approx(band.world_matrix().translation.into(), Vec3::new(2.0, 1.0, 0.0)));

    // Gem: local TRS only, ancestors ignored.
    let gem = scene.find_mesh("Gem_Top").expect("gem");
    assert!(gem.transform.matrix_override().is_none());
    assert!(vec3_approx(gem.transform.position, Vec3::new(0.0, 0.5, 0.0)));
    assert!(vec3_approx(gem.world_matrix().translation.into(), Vec3::new(0.0, 0.5, 0.0)));

    // The group passes through as a structural entity.
    assert_eq!(scene.pass_through.len(), 1);
    assert_eq!(scene.pass_through[0].kind, PassThroughKind::Structural);
    assert!(scene.pass_through[0].geometry.is_none());
}

#[test]
fn node_order_does_not_change_the_result() {
    let (settings, profiles) = defaults();
    let names = ["Ring_Gold_01", "Diamond_Center", "Prong_Setting"];

    let summarize = |order: &[usize]| {
        let mut graph = AssetGraph::new();
        for &i in order {
            graph.add_node(mesh_node(names[i], Vec3::new(i as f32, 0.0, 0.0)));
        }
        let asset = AssetHandle::new("ring.glb", graph);
        let scene = build_viewer_scene(&asset, &environment(), &profiles, &settings);
        let mut placed: Vec<(String, MaterialRole, [f32; 3])> = scene
            .meshes
            .values()
            .map(|m| (m.name.clone(), m.role(), m.world_matrix().translation.to_array()))
            .collect();
        placed.sort_by(|a, b| a.0.cmp(&b.0));
        placed
    };

    assert_eq!(summarize(&[0, 1, 2]), summarize(&[2, 0, 1]));
}

#[test]
fn node_without_positions_is_skipped_and_reported() {
    let (settings, profiles) = defaults();

    let mut broken = Geometry::new();
    broken.set_attribute("uv", Attribute::new(vec![[0.0, 0.0]; 3]));

    let mut graph = AssetGraph::new();
    graph.add_node(Node::with_geometry("Diamond_Broken", broken));
    graph.add_node(mesh_node("Ring_Gold_01", Vec3::ZERO));
    let asset = AssetHandle::new("broken.glb", graph);

    let scene = build_viewer_scene(&asset, &environment(), &profiles, &settings);

    assert_eq!(scene.mesh_count(), 1);
    assert_eq!(scene.report.skipped_nodes(), 1);
    assert_eq!(scene.report.warnings[0].node(), "Diamond_Broken");
}

#[test]
fn cyclic_parent_degrades_instead_of_failing() {
    let (settings, profiles) = defaults();

    let mut graph = AssetGraph::new();
    let ring = graph.add_node(mesh_node("Ring_Loop", Vec3::X));
    let group = graph.add_node(Node::new("Group"));
    graph.get_node_mut(ring).expect("ring").set_parent(Some(group));
    graph.get_node_mut(group).expect("group").set_parent(Some(ring));
    let asset = AssetHandle::new("cyclic.glb", graph);

    let scene = build_viewer_scene(&asset, &environment(), &profiles, &settings);

    assert_eq!(scene.mesh_count(), 1);
    assert_eq!(scene.report.degraded_transforms(), 1);
    assert!(matches!(
        scene.report.warnings[0],
        BuildWarning::TransformDegraded { ref node, .. } if node == "Ring_Loop"
    ));
}

struct NothingMatches;

impl NodeClassifier for NothingMatches {
    fn classify(&self, _node: &Node) -> MaterialRole {
        MaterialRole::Unclassified
    }
}

#[test]
fn custom_classifier_replaces_keyword_rules() {
    let (settings, profiles) = defaults();
    let scene = build_viewer_scene_with(
        &jewelry_asset(),
        &environment(),
        &profiles,
        &settings,
        &NothingMatches,
    );
    assert_eq!(scene.mesh_count(), 0);
    assert_eq!(scene.pass_through.len(), 3);
}

#[test]
fn source_keys_point_back_to_asset_nodes() {
    let (settings, profiles) = defaults();
    let asset = jewelry_asset();
    let scene = build_viewer_scene(&asset, &environment(), &profiles, &settings);

    for (_, mesh) in scene.iter_meshes() {
        let key: NodeKey = mesh.source.expect("built from a node");
        assert_eq!(asset.get_node(key).expect("node").name, mesh.name);
    }
}

// ============================================================================
// Debug scene
// ============================================================================

#[test]
fn debug_scene_has_two_entities_one_light_one_ground() {
    let (settings, profiles) = defaults();
    let scene = build_debug_scene(&environment(), &profiles, &settings);

    assert_eq!(scene.kind, SceneKind::Debug);
    assert_eq!(scene.entity_count(), 2);
    assert_eq!(scene.light_count(), 1);
    assert_eq!(scene.ground_count(), 1);
    assert!(scene.report.is_clean());
}

#[test]
fn debug_scene_places_sphere_and_icosahedron() {
    let (settings, profiles) = defaults();
    let scene = build_debug_scene(&environment(), &profiles, &settings);

    let metal: Vec<_> = scene.meshes_with_role(MaterialRole::Metal).collect();
    let gem: Vec<_> = scene.meshes_with_role(MaterialRole::Gem).collect();
    assert_eq!(metal.len(), 1);
    assert_eq!(gem.len(), 1);

    assert!(vec3_approx(metal[0].world_matrix().translation.into(), Vec3::new(-1.5, 0.0, 0.0)));
    assert!(vec3_approx(gem[0].world_matrix().translation.into(), Vec3::new(1.5, 0.0, 0.0)));

    // 32x32 UV sphere, detail-0 icosahedron
    assert_eq!(metal[0].geometry.vertex_count(), 33 * 33);
    assert_eq!(gem[0].geometry.vertex_count(), 60);
    assert!(metal[0].source.is_none() && gem[0].source.is_none());

    for (key, mesh) in scene.iter_meshes() {
        assert_eq!(scene.get_mesh(key).map(|m| m.uuid), Some(mesh.uuid));
    }

    // Sphere reaches x = -2.5; icosahedron vertices stop short of x = 2.5.
    let bounds = scene.bounding_box().expect("bounds");
    assert!(approx(bounds.min.x, -2.5));
    assert!(bounds.max.x > 2.3 && bounds.max.x < 2.5);
    assert!(approx(bounds.max.y, 1.0));
}

#[test]
fn debug_scene_uses_configured_profiles() {
    let mut materials = MaterialProfiles::default();
    materials.gold.roughness = 0.1;
    materials.gold.env_map_intensity = 1.0;
    let settings = ViewerSettings {
        materials,
        ..ViewerSettings::default()
    };
    let profiles = settings.materials.clone().into_shared();

    let scene = build_debug_scene(&environment(), &profiles, &settings);
    let sphere = scene.meshes_with_role(MaterialRole::Metal).next().expect("sphere");
    let gold = sphere.material.as_metal().expect("metal");
    assert!((gold.roughness - 0.1).abs() < EPSILON);
    assert!((gold.env_map_intensity - 1.0).abs() < EPSILON);
}

// ============================================================================
// Scene state from settings
// ============================================================================

#[test]
fn camera_and_background_follow_the_view() {
    let (settings, profiles) = defaults();

    let viewer = build_viewer_scene(&jewelry_asset(), &environment(), &profiles, &settings);
    assert!(vec3_approx(viewer.camera.position, Vec3::new(0.0, 0.0, 1.0)));
    assert!((viewer.camera.fov - 45.0).abs() < EPSILON);
    assert!(!viewer.environment.background);

    let debug = build_debug_scene(&environment(), &profiles, &settings);
    assert!(vec3_approx(debug.camera.position, Vec3::new(0.0, 0.0, 5.0)));
    assert!((debug.camera.fov - 75.0).abs() < EPSILON);
    assert!(debug.environment.background);
}

#[test]
fn render_and_ground_settings_are_carried() {
    let (settings, profiles) = defaults();
    let scene = build_viewer_scene(&jewelry_asset(), &environment(), &profiles, &settings);

    assert_eq!(scene.render.tone_mapping, ToneMappingMode::ACESFilmic);
    assert!(scene.render.antialias);
    assert!(scene.render.shadows);

    assert!(vec3_approx(scene.ground.position, Vec3::new(0.0, -1.5, 0.0)));
    assert!((scene.ground.opacity - 0.4).abs() < EPSILON);
    assert!((scene.ground.blur - 2.5).abs() < EPSILON);
    assert!((scene.ground.far - 4.0).abs() < EPSILON);

    let ground_up = scene.ground.world_matrix().transform_vector3(Vec3::Z);
    assert!(vec3_approx(ground_up, Vec3::Y));
    assert_eq!(scene.ground.plane_geometry().vertex_count(), 4);
}

#[test]
fn scene_keeps_environment_alive() {
    let (settings, profiles) = defaults();
    let env = environment();
    let weak = env.downgrade();

    let scene = build_debug_scene(&env, &profiles, &settings);
    drop(env);
    assert!(weak.is_alive());
    assert_eq!(scene.environment.map.source(), "studio.hdr");

    drop(scene);
    assert!(!weak.is_alive());
}

#[test]
fn scene_ids_are_unique() {
    let (settings, profiles) = defaults();
    let a = build_debug_scene(&environment(), &profiles, &settings);
    let b = build_debug_scene(&environment(), &profiles, &settings);
    assert_ne!(a.id, b.id);
}
