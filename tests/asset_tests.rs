//! Asset loading tests
//!
//! Tests for:
//! - glTF decoding into an AssetGraph (names, hierarchy, TRS, merged geometry)
//! - Environment map decoding (Radiance HDR)
//! - Asset handles and the file-system loader
//!
//! glTF documents are built in memory with base64 data URIs; HDR files are
//! written to the temp directory with the `image` crate.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use glam::Vec3;
use lustre::assets::{AssetHandle, AssetLoader, EnvironmentMap, FileAssetLoader, GltfLoader, load_environment_map};
use lustre::compose::build_viewer_scene;
use lustre::resources::MaterialRole;
use lustre::scene::PassThroughKind;
use lustre::settings::ViewerSettings;
use lustre::ViewerError;

// ============================================================================
// Helpers
// ============================================================================

const EPSILON: f32 = 1e-5;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

/// One triangle: 3 positions (36 bytes) + 3 u16 indices (6 bytes), padded.
fn triangle_buffer() -> Vec<u8> {
    let mut bytes = Vec::new();
    for v in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
        for c in v {
            bytes.extend_from_slice(&c.to_le_bytes());
        }
    }
    for i in [0u16, 1, 2] {
        bytes.extend_from_slice(&i.to_le_bytes());
    }
    bytes.resize(44, 0);
    bytes
}

/// Root(+Y 2) → Ring_Band(+X 1); an unnamed mesh; two nodes named "Diamond",
/// the second one with a two-primitive mesh (indexed + non-indexed).
fn jewelry_gltf() -> Vec<u8> {
    let uri = format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(triangle_buffer())
    );
    let doc = serde_json::json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [2, 1, 3, 4] }],
        "nodes": [
            { "name": "Ring_Band", "mesh": 0, "translation": [1.0, 0.0, 0.0] },
            { "mesh": 0 },
            { "name": "Root", "children": [0], "translation": [0.0, 2.0, 0.0] },
            { "name": "Diamond", "mesh": 0, "scale": [0.5, 0.5, 0.5] },
            { "name": "Diamond", "mesh": 1 }
        ],
        "meshes": [
            { "name": "tri", "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] },
            { "primitives": [
                { "attributes": { "POSITION": 0 }, "indices": 1 },
                { "attributes": { "POSITION": 0 } }
            ] }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
        ],
        "buffers": [{ "byteLength": 44, "uri": uri }]
    });
    serde_json::to_vec(&doc).expect("serializable")
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("lustre-{}-{name}", std::process::id()))
}

fn write_hdr(path: &Path, width: u32, height: u32, color: [f32; 3]) {
    let buf = image::Rgb32FImage::from_pixel(width, height, image::Rgb(color));
    image::DynamicImage::ImageRgb32F(buf)
        .save(path)
        .expect("hdr written");
}

// ============================================================================
// glTF
// ============================================================================

#[test]
fn gltf_nodes_and_names() {
    let graph = GltfLoader::load_slice(&jewelry_gltf()).expect("valid gltf");

    assert_eq!(graph.len(), 5);
    assert_eq!(graph.mesh_count(), 4);
    assert!(graph.find_by_name("Node_1").is_some(), "unnamed nodes get an index name");

    let map = graph.node_map();
    assert_eq!(map.len(), 5);
    assert!(map.get("Diamond").is_some());
    assert!(map.get("Diamond_1").is_some());
    assert_ne!(map.get("Diamond"), map.get("Diamond_1"));
}

#[test]
fn gltf_hierarchy_and_world_matrices() {
    let graph = GltfLoader::load_slice(&jewelry_gltf()).expect("valid gltf");

    let root = graph.find_by_name("Root").expect("root");
    let band = graph.find_by_name("Ring_Band").expect("band");
    assert_eq!(graph.get_node(band).expect("band").parent(), Some(root));
    assert!(!graph.roots().contains(&band));

    let world = graph.world_matrix(band).expect("acyclic");
    assert!(vec3_approx(world.translation.into(), Vec3::new(1.0, 2.0, 0.0)));
    let cached = graph.get_node(band).expect("band").world_matrix().translation;
    assert!(vec3_approx(cached.into(), Vec3::new(1.0, 2.0, 0.0)));

    let diamond = graph.find_by_name("Diamond").expect("diamond");
    assert!(vec3_approx(graph.get_node(diamond).expect("diamond").transform.scale, Vec3::splat(0.5)));
}

#[test]
fn gltf_primitives_are_merged_per_mesh() {
    let graph = GltfLoader::load_slice(&jewelry_gltf()).expect("valid gltf");
    let key = graph.node_map().get("Diamond_1").expect("second diamond");
    let geometry = graph
        .get_node(key)
        .and_then(|n| n.geometry.as_ref())
        .expect("mesh geometry");

    assert_eq!(geometry.vertex_count(), 6);
    assert_eq!(geometry.indices(), Some(&[0, 1, 2, 3, 4, 5][..]));
    assert!(!geometry.has_normals(), "source normals are optional");
}

#[test]
fn gltf_asset_composes_into_viewer_scene() {
    let graph = GltfLoader::load_slice(&jewelry_gltf()).expect("valid gltf");
    let asset = AssetHandle::new("memory.gltf", graph);
    let env = AssetHandle::new("uniform", EnvironmentMap::uniform(Vec3::ONE));
    let settings = ViewerSettings::default();
    let profiles = settings.materials.clone().into_shared();

    let scene = build_viewer_scene(&asset, &env, &profiles, &settings);

    assert_eq!(scene.meshes_with_role(MaterialRole::Metal).count(), 1);
    assert_eq!(scene.meshes_with_role(MaterialRole::Gem).count(), 2);
    let kinds: Vec<PassThroughKind> = scene.pass_through.iter().map(|p| p.kind).collect();
    assert_eq!(kinds.len(), 2);
    assert!(kinds.contains(&PassThroughKind::Structural));
    assert!(kinds.contains(&PassThroughKind::UnclassifiedMesh));

    let band = scene.find_mesh("Ring_Band").expect("band");
    assert!(vec3_approx(band.world_matrix().translation.into(), Vec3::new(1.0, 2.0, 0.0)));
}

#[test]
fn invalid_gltf_bytes_are_an_error() {
    let result = GltfLoader::load_slice(b"definitely not gltf");
    assert!(matches!(result, Err(ViewerError::GltfError(_))));
}

#[test]
fn missing_gltf_file_is_asset_load_failure() {
    let result = GltfLoader::load(Path::new("/no/such/ring.glb"));
    assert!(matches!(result, Err(ViewerError::AssetLoadFailed { .. })));
}

// ============================================================================
// Environment maps
// ============================================================================

#[test]
fn hdr_environment_round_trip() {
    let path = temp_path("studio.hdr");
    write_hdr(&path, 4, 2, [2.0, 1.0, 0.5]);

    let map = load_environment_map(&path).expect("decodes");
    std::fs::remove_file(&path).ok();

    assert_eq!((map.width, map.height), (4, 2));
    assert_eq!(map.pixels.len(), 8);
    // RGBE keeps 8 bits of mantissa.
    assert!((map.average_radiance() - Vec3::new(2.0, 1.0, 0.5)).abs().max_element() < 0.02);
    assert!(map.peak_luminance() > 1.0);
}

#[test]
fn environment_rejects_other_extensions() {
    let result = load_environment_map("/hdr/studio.png");
    assert!(matches!(result, Err(ViewerError::EnvironmentLoadFailed { .. })));
}

#[test]
fn environment_missing_file_is_load_failure() {
    let result = load_environment_map(temp_path("missing.exr"));
    assert!(matches!(result, Err(ViewerError::EnvironmentLoadFailed { .. })));
}

#[test]
fn uniform_environment_statistics() {
    let map = EnvironmentMap::uniform(Vec3::new(1.0, 1.0, 1.0));
    assert!(vec3_approx(map.average_radiance(), Vec3::ONE));
    assert!((map.peak_luminance() - 1.0).abs() < EPSILON);
}

// ============================================================================
// Handles and loader
// ============================================================================

#[test]
fn handles_share_one_asset() {
    let a = AssetHandle::new("uniform", EnvironmentMap::uniform(Vec3::ZERO));
    let b = a.clone();
    assert!(a.ptr_eq(&b));
    assert_eq!(a.ref_count(), 2);

    let weak = a.downgrade();
    drop(a);
    assert!(weak.is_alive());
    assert_eq!(weak.upgrade().map(|h| h.source().to_string()), Some("uniform".to_string()));
    drop(b);
    assert!(weak.upgrade().is_none());
}

#[test]
fn file_loader_resolves_site_paths() {
    let loader = FileAssetLoader::new("/srv/public");
    assert_eq!(
        loader.resolve(Path::new("/hdr/studio.exr")),
        PathBuf::from("/srv/public/hdr/studio.exr")
    );
    assert_eq!(
        loader.resolve(Path::new("3d_models/ring.glb")),
        PathBuf::from("/srv/public/3d_models/ring.glb")
    );
}

#[test]
fn file_loader_reads_environment() {
    let root = temp_path("root");
    std::fs::create_dir_all(root.join("hdr")).expect("temp dir");
    write_hdr(&root.join("hdr/studio.hdr"), 2, 1, [1.0, 1.0, 1.0]);

    let loader = FileAssetLoader::new(&root);
    let handle = loader
        .load_environment(Path::new("/hdr/studio.hdr"))
        .expect("loads");
    std::fs::remove_dir_all(&root).ok();

    assert_eq!(handle.source(), "/hdr/studio.hdr");
    assert_eq!(handle.width, 2);
}
