//! OBJ format support

use pano3d_core::{Result, TriangleMesh};
use std::io::Write;

pub struct ObjWriter;

impl ObjWriter {
    /// Write a triangle mesh as Wavefront OBJ to any sink.
    ///
    /// Vertex colors, when present, are appended to the `v` records
    /// (the common non-standard extension). Faces reference normals with
    /// the `v//vn` form when normals are present.
    pub fn write_mesh<W: Write>(mesh: &TriangleMesh, writer: &mut W) -> Result<()> {
        for (i, vertex) in mesh.vertices.iter().enumerate() {
            match &mesh.colors {
                Some(colors) => {
                    let [r, g, b] = colors[i];
                    writeln!(
                        writer,
                        "v {} {} {} {} {} {}",
                        vertex.x, vertex.y, vertex.z, r, g, b
                    )?;
                }
                None => writeln!(writer, "v {} {} {}", vertex.x, vertex.y, vertex.z)?,
            }
        }

        if let Some(normals) = &mesh.normals {
            for normal in normals {
                writeln!(writer, "vn {} {} {}", normal.x, normal.y, normal.z)?;
            }
        }

        // OBJ indices are 1-based
        for face in &mesh.faces {
            let [a, b, c] = [face[0] + 1, face[1] + 1, face[2] + 1];
            if mesh.normals.is_some() {
                writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
            } else {
                writeln!(writer, "f {a} {b} {c}")?;
            }
        }

        Ok(())
    }
}
