//! Command line interface for the viewer

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// 360° panoramic point cloud viewer
#[derive(Parser, Debug)]
#[command(name = "pano3d-viewer", version, about)]
pub struct Args {
    /// PLY file to display
    #[arg(long, default_value = "image360_2.ply")]
    pub ply: PathBuf,

    /// Maximum number of points to display
    #[arg(long, default_value_t = 3_000_000)]
    pub points: usize,

    /// Point size in pixels
    #[arg(long, default_value_t = 10.0)]
    pub size: f32,

    /// Field of view in degrees
    #[arg(long, default_value_t = 100)]
    pub fov: u32,

    /// Initial camera distance from the origin
    #[arg(long, default_value_t = 0.0)]
    pub distance: f32,

    /// Background color
    #[arg(long, value_enum, default_value_t = BackgroundColor::Black)]
    pub bgcolor: BackgroundColor,

    /// Window width
    #[arg(long, default_value_t = 1400)]
    pub width: u32,

    /// Window height
    #[arg(long, default_value_t = 900)]
    pub height: u32,

    /// View the cloud from outside instead of from within
    #[arg(long = "no-invert", action = ArgAction::SetFalse)]
    pub invert: bool,

    /// Hide normal vectors even when the file carries them
    #[arg(long = "no-normals", action = ArgAction::SetFalse)]
    pub normals: bool,

    /// Hide the coordinate axis
    #[arg(long = "no-axis", action = ArgAction::SetFalse)]
    pub axis: bool,

    /// Restrict rotation to the horizontal plane
    #[arg(long)]
    pub horizontal_only: bool,
}

/// Background palette matching the render presets
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundColor {
    Black,
    White,
    Gray,
    Darkgray,
}

impl BackgroundColor {
    /// RGBA components for the clear color
    pub fn rgba(self) -> [f64; 4] {
        match self {
            Self::Black => [0.0, 0.0, 0.0, 1.0],
            Self::White => [1.0, 1.0, 1.0, 1.0],
            Self::Gray => [0.5, 0.5, 0.5, 1.0],
            Self::Darkgray => [0.2, 0.2, 0.2, 1.0],
        }
    }
}
