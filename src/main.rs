mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use labelscope::EngineConfig;

#[derive(Parser)]
#[command(name = "labelscope", about = "Inspect and render YOLO box labels")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a magnified crop of one label to PNG
    Crop(commands::crop::CropArgs),
    /// Draw all boxes of an image to PNG
    Overlay(commands::overlay::OverlayArgs),
    /// Parse label files and report malformed lines
    Check(commands::check::CheckArgs),
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    let path = match path {
        Some(path) => path.clone(),
        None => match EngineConfig::default_path() {
            Some(path) => path,
            None => return Ok(EngineConfig::default()),
        },
    };
    Ok(EngineConfig::load(&path)?)
}

fn init_logging(config: &EngineConfig, verbose: bool) {
    if std::env::var_os("RUST_LOG").is_some() {
        env_logger::init();
        return;
    }
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        config.log_level.to_level_filter()
    };
    env_logger::Builder::new().filter_level(level).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;
    init_logging(&config, cli.verbose);

    match &cli.command {
        Commands::Crop(args) => commands::crop::run(args, &config),
        Commands::Overlay(args) => commands::overlay::run(args),
        Commands::Check(args) => commands::check::run(args),
    }
}
