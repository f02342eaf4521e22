//! Expression matrix application: classify landmark frames from a detector
//! and stream the resulting bitmaps to an 8x8 display.

use anyhow::{Context, Result};
use clap::Parser;
use expression_matrix::{
    bitmap::Rotation,
    config::{Config, EXAMPLE_CONFIG},
    pipeline::ExpressionPipeline,
};
use log::{info, warn};
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::PathBuf,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Newline-delimited JSON landmark stream ("-" for stdin)
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Display device to open at startup
    #[arg(short, long)]
    port: Option<PathBuf>,

    /// Advisory line speed, only logged; set the real speed with stty
    #[arg(short, long)]
    baud: Option<u32>,

    /// Display rotation in degrees (0, 90, 180, 270)
    #[arg(short, long)]
    rotation: Option<u16>,

    /// Mirror each display row after rotating
    #[arg(short, long)]
    mirror: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Print an example configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    let filter = if args.debug { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(filter));

    info!("Expression Matrix");

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            match Config::from_file(path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!("Failed to load config file: {}. Using defaults.", e);
                    Config::default()
                }
            }
        }
        None => Config::default(),
    };

    if let Some(port) = args.port {
        config.transport.port = Some(port);
    }
    if let Some(baud) = args.baud {
        config.transport.baud_rate = baud;
    }
    if let Some(degrees) = args.rotation {
        config.display.rotation = Rotation::try_from(degrees)?;
    }
    if args.mirror {
        config.display.mirror = true;
    }
    config.validate()?;

    let mut pipeline = ExpressionPipeline::new(&config);
    if config.transport.port.is_some() {
        if let Err(e) = pipeline.connect_port(None) {
            warn!("{e}; continuing without a display link");
        }
    }

    let reader: Box<dyn BufRead> = if args.input == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&args.input).with_context(|| format!("Failed to open input {}", args.input))?;
        Box::new(BufReader::new(file))
    };

    let stats = pipeline.run(reader)?;
    info!(
        "Done: {} lines, {} frames, {} sent, {} rejected",
        stats.lines, stats.frames, stats.sent, stats.rejected
    );

    Ok(())
}
