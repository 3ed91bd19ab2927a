//! PLY format support

use nalgebra::{Point3, Vector3};
use pano3d_core::{Error, PointCloud, Result, TriangleMesh};
use ply_rs::{
    parser::Parser,
    ply::{
        Addable, DefaultElement, ElementDef, Ply, Property, PropertyDef, PropertyType, ScalarType,
    },
    writer::Writer,
};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

pub struct PlyReader;
pub struct PlyWriter;

impl PlyReader {
    /// Read a point cloud with optional per-vertex colors and normals.
    ///
    /// Color channels are 0-255 integers in the file and scaled to [0,1].
    pub fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let parser = Parser::<DefaultElement>::new();
        let ply = parser.read_ply(&mut reader)?;

        let Some(vertex_element) = ply.payload.get("vertex") else {
            return Err(Error::Parse("PLY file has no vertex element".to_string()));
        };

        let mut positions = Vec::with_capacity(vertex_element.len());
        for vertex in vertex_element {
            let x = extract_property_value(vertex, "x")?;
            let y = extract_property_value(vertex, "y")?;
            let z = extract_property_value(vertex, "z")?;
            positions.push(Point3::new(x, y, z));
        }

        // Colors are optional; take them only when every vertex has all
        // three channels
        let mut colors = Vec::with_capacity(vertex_element.len());
        let mut has_colors = true;
        for vertex in vertex_element {
            match (
                extract_color_channel(vertex, "red"),
                extract_color_channel(vertex, "green"),
                extract_color_channel(vertex, "blue"),
            ) {
                (Some(r), Some(g), Some(b)) => colors.push([r, g, b]),
                _ => {
                    has_colors = false;
                    break;
                }
            }
        }

        // Same for normals
        let mut normals = Vec::with_capacity(vertex_element.len());
        let mut has_normals = true;
        for vertex in vertex_element {
            match (
                extract_property_value(vertex, "nx"),
                extract_property_value(vertex, "ny"),
                extract_property_value(vertex, "nz"),
            ) {
                (Ok(nx), Ok(ny), Ok(nz)) => normals.push(Vector3::new(nx, ny, nz)),
                _ => {
                    has_normals = false;
                    break;
                }
            }
        }

        let mut cloud = PointCloud::from_positions(positions);
        if has_colors && !colors.is_empty() {
            cloud.set_colors(colors)?;
        }
        if has_normals && !normals.is_empty() {
            cloud.set_normals(normals)?;
        }

        Ok(cloud)
    }
}

impl PlyWriter {
    /// Write a triangle mesh as ASCII PLY to any sink
    pub fn write_mesh<W: Write>(mesh: &TriangleMesh, writer: &mut W) -> Result<()> {
        let mut ply = Ply::<DefaultElement>::new();

        // Define vertex element
        let mut vertex_element = ElementDef::new("vertex".to_string());
        vertex_element.count = mesh.vertices.len();
        for name in ["x", "y", "z"] {
            vertex_element.properties.add(PropertyDef::new(
                name.to_string(),
                PropertyType::Scalar(ScalarType::Float),
            ));
        }
        if mesh.normals.is_some() {
            for name in ["nx", "ny", "nz"] {
                vertex_element.properties.add(PropertyDef::new(
                    name.to_string(),
                    PropertyType::Scalar(ScalarType::Float),
                ));
            }
        }
        if mesh.colors.is_some() {
            for name in ["red", "green", "blue"] {
                vertex_element.properties.add(PropertyDef::new(
                    name.to_string(),
                    PropertyType::Scalar(ScalarType::UChar),
                ));
            }
        }
        ply.header.elements.add(vertex_element);

        // Define face element
        let mut face_element = ElementDef::new("face".to_string());
        face_element.count = mesh.faces.len();
        face_element.properties.add(PropertyDef::new(
            "vertex_indices".to_string(),
            PropertyType::List(ScalarType::UChar, ScalarType::Int),
        ));
        ply.header.elements.add(face_element);

        // Add vertex data
        let mut vertices = Vec::with_capacity(mesh.vertices.len());
        for (i, vertex) in mesh.vertices.iter().enumerate() {
            let mut element = DefaultElement::new();
            element.insert("x".to_string(), Property::Float(vertex.x));
            element.insert("y".to_string(), Property::Float(vertex.y));
            element.insert("z".to_string(), Property::Float(vertex.z));

            if let Some(normals) = &mesh.normals {
                element.insert("nx".to_string(), Property::Float(normals[i].x));
                element.insert("ny".to_string(), Property::Float(normals[i].y));
                element.insert("nz".to_string(), Property::Float(normals[i].z));
            }
            if let Some(colors) = &mesh.colors {
                let [r, g, b] = colors[i];
                element.insert("red".to_string(), Property::UChar(to_channel(r)));
                element.insert("green".to_string(), Property::UChar(to_channel(g)));
                element.insert("blue".to_string(), Property::UChar(to_channel(b)));
            }
            vertices.push(element);
        }
        ply.payload.insert("vertex".to_string(), vertices);

        // Add face data
        let mut faces = Vec::with_capacity(mesh.faces.len());
        for face in &mesh.faces {
            let mut element = DefaultElement::new();
            let indices = vec![face[0] as i32, face[1] as i32, face[2] as i32];
            element.insert("vertex_indices".to_string(), Property::ListInt(indices));
            faces.push(element);
        }
        ply.payload.insert("face".to_string(), faces);

        let writer_instance = Writer::new();
        writer_instance.write_ply(writer, &mut ply)?;

        Ok(())
    }
}

/// Extract a property value as f32 from a PLY element
fn extract_property_value(element: &DefaultElement, name: &str) -> Result<f32> {
    match element.get(name) {
        Some(Property::Float(val)) => Ok(*val),
        Some(Property::Double(val)) => Ok(*val as f32),
        Some(Property::Int(val)) => Ok(*val as f32),
        Some(Property::UInt(val)) => Ok(*val as f32),
        _ => Err(Error::Parse(format!(
            "Property '{}' not found or invalid type",
            name
        ))),
    }
}

/// Extract a 0-255 color channel scaled to [0,1]
fn extract_color_channel(element: &DefaultElement, name: &str) -> Option<f32> {
    match element.get(name) {
        Some(Property::UChar(val)) => Some(*val as f32 / 255.0),
        Some(Property::Char(val)) => Some(*val as f32 / 255.0),
        Some(Property::UShort(val)) => Some(*val as f32 / 255.0),
        Some(Property::Int(val)) => Some(*val as f32 / 255.0),
        _ => None,
    }
}

fn to_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
