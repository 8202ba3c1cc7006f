//! Skinning Demo - interactive 2D linear blend skinning viewer
//!
//! Moving the pointer horizontally blends between two reference poses; the
//! mesh is skinned on the GPU and the skeleton is overlaid as debug lines.
//!
//! # Usage
//!
//! ```bash
//! skinning-demo
//! skinning-demo --left wave --right shrug --wireframe
//! skinning-demo --check
//! skinning-demo --print-shader
//! ```
//!
//! # Keyboard Shortcuts
//!
//! - L / R: Cycle the left / right pose
//! - B: Toggle bones
//! - W: Toggle wireframe
//! - ESC: Quit

mod app;
mod config;
mod debug_draw;
mod graphics;
mod scene;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use skinning_core::{debug_line_shader, reference, skinning_shader, validate_wgsl};

use crate::app::ViewerApp;
use crate::config::ViewerConfig;
use crate::scene::Scene;

#[derive(Parser)]
#[command(name = "skinning-demo")]
#[command(author, version, about = "2D linear blend skinning viewer")]
struct Args {
    /// Config file (default: config.toml in the platform config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pose blended in at the left edge of the window
    #[arg(long, value_name = "POSE")]
    left: Option<String>,

    /// Pose blended in at the right edge of the window
    #[arg(long, value_name = "POSE")]
    right: Option<String>,

    /// Hide bones and joint markers
    #[arg(long)]
    no_bones: bool,

    /// Show the host-skinned wireframe
    #[arg(long)]
    wireframe: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Print the generated skinning shader and exit
    #[arg(long)]
    print_shader: bool,

    /// Build and validate all data and shaders, then exit without a window
    #[arg(long)]
    check: bool,
}

impl Args {
    /// Command line flags take precedence over the config file.
    fn apply(&self, config: &mut ViewerConfig) {
        if let Some(left) = &self.left {
            config.blend.left = Some(left.clone());
        }
        if let Some(right) = &self.right {
            config.blend.right = Some(right.clone());
        }
        if self.no_bones {
            config.debug.draw_bones = false;
        }
        if self.wireframe {
            config.debug.draw_wireframe = true;
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

/// Generate and validate both shaders. A failure carries the compiler log.
fn build_shaders() -> Result<String> {
    let skinning = skinning_shader();
    validate_wgsl("skinning", &skinning).context("Skinning shader failed to build")?;
    validate_wgsl("debug lines", debug_line_shader())
        .context("Debug line shader failed to build")?;
    Ok(skinning)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.print_shader {
        print!("{}", skinning_shader());
        return Ok(());
    }

    let mut config = config::load(args.config.as_deref()).context("Failed to load config")?;
    args.apply(&mut config);

    tracing::info!("Starting skinning demo");

    let skinning = build_shaders()?;
    let skeleton = reference::skeleton().context("Invalid reference skeleton")?;
    let mesh = reference::mesh().context("Invalid reference mesh")?;
    let scene = Scene::new(skeleton, mesh, &config.blend).context("Invalid pose selection")?;

    if args.check {
        tracing::info!(
            "Check passed: {} poses, {} vertices, {} triangles",
            scene.skeleton().len(),
            scene.mesh().vertices().len(),
            scene.mesh().triangle_count()
        );
        return Ok(());
    }

    app::run(ViewerApp::new(config, scene, skinning, debug_line_shader()))
}
