//! Binary glTF (GLB) mesh reading

use nalgebra::{Point3, Vector3};
use pano3d_core::{Error, Result, TriangleMesh};

pub struct GlbReader;

impl GlbReader {
    /// Read a GLB byte buffer into a single triangle mesh.
    ///
    /// All triangle primitives in the document are concatenated. Normals
    /// and vertex colors are kept only when every primitive carries them.
    pub fn read_mesh(bytes: &[u8]) -> Result<TriangleMesh> {
        let (document, buffers, _images) = gltf::import_slice(bytes)
            .map_err(|e| Error::Parse(format!("invalid glTF binary: {}", e)))?;

        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        let mut normals = Vec::new();
        let mut colors = Vec::new();
        let mut all_have_normals = true;
        let mut all_have_colors = true;

        for mesh in document.meshes() {
            for primitive in mesh.primitives() {
                if primitive.mode() != gltf::mesh::Mode::Triangles {
                    continue;
                }
                let reader = primitive
                    .reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

                let Some(positions) = reader.read_positions() else {
                    continue;
                };
                let base = vertices.len() as u32;
                vertices.extend(positions.map(|p| Point3::new(p[0], p[1], p[2])));
                let added = vertices.len() - base as usize;

                match reader.read_normals() {
                    Some(ns) => normals.extend(ns.map(|n| Vector3::new(n[0], n[1], n[2]))),
                    None => all_have_normals = false,
                }
                match reader.read_colors(0) {
                    Some(cs) => colors.extend(cs.into_rgb_f32()),
                    None => all_have_colors = false,
                }

                match reader.read_indices() {
                    Some(indices) => {
                        let indices: Vec<u32> = indices.into_u32().collect();
                        faces.extend(
                            indices
                                .chunks_exact(3)
                                .map(|tri| [base + tri[0], base + tri[1], base + tri[2]]),
                        );
                    }
                    None => {
                        // Non-indexed primitive: consecutive triples
                        faces.extend(
                            (0..(added as u32) / 3)
                                .map(|i| [base + 3 * i, base + 3 * i + 1, base + 3 * i + 2]),
                        );
                    }
                }
            }
        }

        if vertices.is_empty() || faces.is_empty() {
            return Err(Error::InvalidData(
                "glTF binary contains no triangle geometry".to_string(),
            ));
        }

        let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);
        if all_have_normals && !normals.is_empty() {
            mesh.set_normals(normals);
        }
        if all_have_colors && !colors.is_empty() {
            mesh.set_colors(colors);
        }

        Ok(mesh)
    }
}
