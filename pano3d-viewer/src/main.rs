//! Inside-out 360° point cloud viewer
//!
//! Loads a PLY capture, optionally downsamples and inverts it, and shows it
//! from a camera standing inside the cloud.

mod cli;
mod downsample;
mod render;
mod scene;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use cli::Args;
use render::ViewConfig;
use scene::Scene;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    run(Args::parse())
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut cloud = pano3d_io::read_point_cloud(&args.ply)
        .with_context(|| format!("failed to load {}", args.ply.display()))?;
    info!(
        path = %args.ply.display(),
        points = cloud.len(),
        "PLY loaded"
    );

    let before = cloud.len();
    cloud = downsample::downsample(cloud, args.points);
    if cloud.len() < before {
        info!(from = before, to = cloud.len(), "downsampled");
    }

    if args.invert {
        cloud.invert();
        info!("points inverted: inside view");
    }

    let scene = Scene::new(
        cloud,
        args.size,
        args.bgcolor.rgba(),
        args.axis,
        args.normals,
    );
    scene.log_bounds();

    print_controls(args.horizontal_only);

    render::run(
        scene,
        ViewConfig {
            width: args.width,
            height: args.height,
            fov_degrees: args.fov as f32,
            distance: args.distance,
            horizontal_only: args.horizontal_only,
        },
    )?;

    Ok(())
}

fn print_controls(horizontal_only: bool) {
    println!("Controls:");
    if horizontal_only {
        println!("  left drag   rotate left/right (vertical rotation locked)");
    } else {
        println!("  left drag   look around");
    }
    println!("  mouse wheel zoom in/out");
    println!("  Q / Esc     quit");
}
