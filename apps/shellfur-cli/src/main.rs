mod script;

use anyhow::{Context as _, Result, anyhow};
use clap::{Parser, Subcommand};
use shellfur_assets::{load_obj, uv_sphere};
use shellfur_common::{Mesh, ShellConfig};
use shellfur_input::InputSnapshot;
use shellfur_kernel::Scene;
use shellfur_render::{DebugTextRenderer, FrameView, LightingState, Renderer, Viewport};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::script::{Press, snapshot_for};

#[derive(Parser)]
#[command(name = "shellfur-cli", about = "Headless tooling for the shell fur renderer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the effective configuration
    Info,
    /// Step the scene without a window and describe each frame
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "10")]
        frames: u64,
        /// Fixed frame time in seconds
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Scripted press: `action`, `action@frame` or `action@start..end`
        #[arg(short, long = "press")]
        presses: Vec<String>,
        /// Emit one JSON object per frame instead of text
        #[arg(long)]
        json: bool,
        /// Only print every Nth frame
        #[arg(long, default_value = "1")]
        every: u64,
    },
    /// Show the letterboxed viewport for a window size
    Viewport {
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
    },
    /// Print statistics for the procedural sphere or an OBJ model
    Mesh {
        /// OBJ file; the configured sphere when omitted
        path: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<ShellConfig> {
    let config = match path {
        Some(p) => ShellConfig::load(p).with_context(|| format!("loading {}", p.display()))?,
        None => ShellConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn simulate(
    config: &ShellConfig,
    frames: u64,
    dt: f32,
    presses: &[String],
    json: bool,
    every: u64,
) -> Result<()> {
    let presses = presses
        .iter()
        .map(|p| Press::parse(p))
        .collect::<Result<Vec<_>>>()?;
    let every = every.max(1);
    let mut scene = Scene::new(config);
    let lighting = LightingState::default();
    let design = (config.window.width, config.window.height);
    let viewport = Viewport::fit(design, design).ok_or_else(|| anyhow!("window size is zero"))?;
    let renderer = DebugTextRenderer::new();

    let mut previous = InputSnapshot::new();
    for frame in 0..frames {
        let current = snapshot_for(&presses, frame);
        let outcome = scene.step(&previous, &current, dt);
        previous = current;

        if frame % every == 0 || outcome.close_requested {
            let view = FrameView::capture(&scene, &lighting, viewport);
            if json {
                println!("{}", serde_json::to_string(&view)?);
            } else {
                print!("{}", renderer.render(&view));
            }
        }
        if outcome.close_requested {
            tracing::info!(frame, "quit requested by script");
            break;
        }
    }
    Ok(())
}

fn print_mesh_stats(mesh: &Mesh) {
    println!("mesh: {}", mesh.name);
    println!("  vertices:  {}", mesh.vertices.len());
    println!("  triangles: {}", mesh.triangle_count());
    if let Some((min, max)) = mesh.bounds() {
        println!(
            "  bounds:    ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }
    for t in &mesh.textures {
        println!("  texture:   {:?} {}", t.kind, t.path);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("shellfur-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "window: {}x{} \"{}\"",
                config.window.width, config.window.height, config.window.title
            );
            println!(
                "shell: layers={} fur_length={} thickness={} density={}",
                config.shell.layers,
                config.shell.fur_length,
                config.shell.strand_thickness,
                config.shell.grid_frequency
            );
            println!(
                "wind: smoothing={} max_strength={}",
                config.wind.smoothing, config.wind.max_strength
            );
            println!(
                "mesh: {}",
                config.mesh.model.as_deref().unwrap_or("procedural sphere")
            );
        }
        Commands::Simulate {
            frames,
            dt,
            presses,
            json,
            every,
        } => simulate(&config, frames, dt, &presses, json, every)?,
        Commands::Viewport { width, height } => {
            let design = (config.window.width, config.window.height);
            match Viewport::fit(design, (width, height)) {
                Some(vp) => println!(
                    "viewport: {}x{} at ({}, {}) aspect={:.4}",
                    vp.width,
                    vp.height,
                    vp.x,
                    vp.y,
                    vp.aspect()
                ),
                None => println!("viewport: none (window is minimized)"),
            }
        }
        Commands::Mesh { path } => match path {
            Some(path) => {
                let model = load_obj(&path)?;
                println!(
                    "model: {} meshes, {} vertices, {} triangles",
                    model.meshes.len(),
                    model.vertex_count(),
                    model.triangle_count()
                );
                for mesh in &model.meshes {
                    print_mesh_stats(mesh);
                }
            }
            None => {
                let m = &config.mesh;
                print_mesh_stats(&uv_sphere(m.sphere_radius, m.sphere_stacks, m.sphere_slices));
            }
        },
    }

    Ok(())
}
