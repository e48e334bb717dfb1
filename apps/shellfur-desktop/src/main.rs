mod app;
mod keymap;
mod ui;

use anyhow::{Context as _, Result};
use clap::Parser;
use shellfur_common::ShellConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

use crate::app::GpuApp;

#[derive(Parser)]
#[command(name = "shellfur-desktop", about = "Shell-texturing fur renderer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of shell layers
    #[arg(long)]
    layers: Option<u32>,

    /// Fur length in world units
    #[arg(long)]
    fur_length: Option<f32>,

    /// OBJ model drawn instead of the procedural sphere
    #[arg(long)]
    model: Option<String>,

    /// Base texture image
    #[arg(long)]
    texture: Option<String>,
}

impl Cli {
    fn load_config(&self) -> Result<ShellConfig> {
        let mut config = match &self.config {
            Some(path) => ShellConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ShellConfig::default(),
        };
        if let Some(layers) = self.layers {
            config.shell.layers = layers;
        }
        if let Some(len) = self.fur_length {
            config.shell.fur_length = len;
        }
        if self.model.is_some() {
            config.mesh.model = self.model.clone();
        }
        if self.texture.is_some() {
            config.mesh.texture = self.texture.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = cli.load_config()?;
    tracing::info!(
        layers = config.shell.layers,
        fur_length = config.shell.fur_length,
        "shellfur-desktop starting"
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.take_init_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
