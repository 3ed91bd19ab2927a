//! Model format conversion for downloaded GLB assets

use crate::{GlbReader, ObjWriter, PlyWriter};
use pano3d_core::{Error, Result};

/// Output formats the converter can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Glb,
    Obj,
    Ply,
}

impl ModelFormat {
    /// Format tags accepted by [`ModelFormat::parse`]
    pub const ALLOWED: [&'static str; 3] = ["glb", "obj", "ply"];

    /// Parse a format tag, case-insensitively
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "glb" => Some(Self::Glb),
            "obj" => Some(Self::Obj),
            "ply" => Some(Self::Ply),
            _ => None,
        }
    }

    /// Capability query: can the converter produce this format?
    pub fn supports(tag: &str) -> bool {
        Self::parse(tag).is_some()
    }

    /// File extension for the format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Glb => "glb",
            Self::Obj => "obj",
            Self::Ply => "ply",
        }
    }

    /// Mimetype served with a converted model
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Glb => "model/gltf-binary",
            Self::Obj | Self::Ply => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Re-export a binary glTF model in the requested format.
///
/// `glb` is a byte-identity passthrough; the other formats parse the GLB
/// and re-export it. Malformed or empty input surfaces
/// [`Error::Conversion`].
pub fn convert_model(glb_bytes: &[u8], format: ModelFormat) -> Result<Vec<u8>> {
    if format == ModelFormat::Glb {
        return Ok(glb_bytes.to_vec());
    }

    let mesh = GlbReader::read_mesh(glb_bytes).map_err(|e| Error::Conversion {
        format: format.to_string(),
        message: e.to_string(),
    })?;

    let mut out = Vec::new();
    let result = match format {
        ModelFormat::Obj => ObjWriter::write_mesh(&mesh, &mut out),
        ModelFormat::Ply => PlyWriter::write_mesh(&mesh, &mut out),
        ModelFormat::Glb => unreachable!(),
    };
    result.map_err(|e| Error::Conversion {
        format: format.to_string(),
        message: e.to_string(),
    })?;

    Ok(out)
}
