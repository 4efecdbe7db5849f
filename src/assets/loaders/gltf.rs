use std::path::Path;

use glam::{Quat, Vec3};

use crate::assets::AssetGraph;
use crate::errors::{Result, ViewerError};
use crate::resources::geometry::{Attribute, Geometry};
use crate::scene::node::Node;

// ============================================================================
// Intermediate data
// ============================================================================

/// Vertex streams of one mesh, merged across its triangle primitives.
#[derive(Default)]
struct MeshStreams {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
    /// Every merged primitive carried normals
    all_normals: bool,
    /// Every merged primitive carried uv0
    all_uvs: bool,
    primitives: usize,
}

impl MeshStreams {
    fn into_geometry(self) -> Option<Geometry> {
        if self.positions.is_empty() {
            return None;
        }
        let mut geometry = Geometry::new();
        geometry.set_attribute("position", Attribute::new(self.positions));
        if self.all_normals {
            geometry.set_attribute("normal", Attribute::new(self.normals));
        }
        if self.all_uvs {
            geometry.set_attribute("uv", Attribute::new(self.uvs));
        }
        geometry.set_indices(&self.indices);
        Some(geometry)
    }
}

/// glTF 2.0 (`.gltf` / `.glb`) decoder producing an [`AssetGraph`].
///
/// Only what scene composition needs is read: node names, TRS, hierarchy and
/// triangle geometry (positions, normals, uv0, indices). Materials, textures,
/// skins and animations in the file are ignored; the viewer assigns its own
/// materials by role.
pub struct GltfLoader;

impl GltfLoader {
    /// Loads a model file, resolving external buffers relative to it.
    pub fn load(path: &Path) -> Result<AssetGraph> {
        let (document, buffers, _images) =
            gltf::import(path).map_err(|e| ViewerError::AssetLoadFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let graph = Self::build(&document, &buffers)?;
        log::info!(
            "Loaded model {}: {} nodes, {} meshes",
            path.display(),
            graph.len(),
            graph.mesh_count()
        );
        Ok(graph)
    }

    /// Loads a model from memory (`.glb` bytes or `.gltf` JSON with data URIs).
    pub fn load_slice(bytes: &[u8]) -> Result<AssetGraph> {
        let (document, buffers, _images) = gltf::import_slice(bytes)?;
        Self::build(&document, &buffers)
    }

    fn build(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Result<AssetGraph> {
        Self::warn_unsupported_extensions(document);

        let mut graph = AssetGraph::new();
        let mut node_mapping = Vec::with_capacity(document.nodes().count());

        // Step 1: nodes with transform and geometry
        for node in document.nodes() {
            node_mapping.push(graph.add_node(Self::create_node(&node, buffers)));
        }

        // Step 2: hierarchy
        for node in document.nodes() {
            let parent = node_mapping[node.index()];
            for child in node.children() {
                graph.attach(node_mapping[child.index()], parent);
            }
        }

        // Step 3: world matrices
        graph.update_world_matrices();

        Ok(graph)
    }

    fn create_node(node: &gltf::Node, buffers: &[gltf::buffer::Data]) -> Node {
        let name = node
            .name()
            .map_or_else(|| format!("Node_{}", node.index()), str::to_string);

        let mut engine_node = Node::new(name);
        let (t, r, s) = node.transform().decomposed();
        engine_node.transform.position = Vec3::from_array(t);
        engine_node.transform.rotation = Quat::from_array(r);
        engine_node.transform.scale = Vec3::from_array(s);

        if let Some(mesh) = node.mesh() {
            match Self::load_mesh_geometry(&mesh, buffers) {
                Some(geometry) => engine_node.geometry = Some(geometry.into()),
                None => log::warn!(
                    "Mesh of node '{}' has no triangle geometry, keeping it as a group",
                    engine_node.name
                ),
            }
        }

        engine_node
    }

    fn load_mesh_geometry(mesh: &gltf::Mesh, buffers: &[gltf::buffer::Data]) -> Option<Geometry> {
        let mut streams = MeshStreams {
            all_normals: true,
            all_uvs: true,
            ..Default::default()
        };

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "Skipping primitive {} of mesh {:?}: mode {:?} is not supported",
                    primitive.index(),
                    mesh.name(),
                    primitive.mode()
                );
                continue;
            }

            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

            let positions: Vec<[f32; 3]> = match reader.read_positions() {
                Some(iter) => iter.collect(),
                None => {
                    log::warn!("Skipping primitive {} without positions", primitive.index());
                    continue;
                }
            };
            let vertex_count = positions.len();
            let base = streams.positions.len() as u32;

            match reader.read_normals() {
                Some(iter) => streams.normals.extend(iter),
                None => streams.all_normals = false,
            }
            match reader.read_tex_coords(0) {
                Some(iter) => streams.uvs.extend(iter.into_f32()),
                None => streams.all_uvs = false,
            }

            match reader.read_indices() {
                Some(iter) => streams.indices.extend(iter.into_u32().map(|i| base + i)),
                None => streams.indices.extend(base..base + vertex_count as u32),
            }

            streams.positions.extend(positions);
            streams.primitives += 1;
        }

        if streams.primitives > 1 {
            log::debug!(
                "Merged {} primitives of mesh {:?}",
                streams.primitives,
                mesh.name()
            );
        }

        streams.into_geometry()
    }

    fn warn_unsupported_extensions(document: &gltf::Document) {
        let required: Vec<&str> = document.extensions_required().collect();
        if !required.is_empty() {
            log::warn!("glTF file requires extensions that are ignored: {required:?}");
        }
    }
}
