// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "pixel-loop")]
#[command(about = "Fixed-timestep raw-framebuffer render loop", long_about = None)]
pub struct Cli {
    /// Framebuffer width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Framebuffer height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Simulation rate in ticks per second
    #[arg(long)]
    pub ticks_per_second: Option<u32>,

    /// Window scale (window size = framebuffer size x scale)
    #[arg(long)]
    pub scale: Option<u32>,

    /// JSON configuration file; command-line flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,
}
