use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use image::imageops::{self, FilterType};
use labelscope::error::RenderError;
use labelscope::{EngineConfig, color, magnifier};

#[derive(Args)]
pub struct CropArgs {
    /// Source image
    pub image: PathBuf,
    /// YOLO label file for the image
    pub labels: PathBuf,
    /// Index of the label to magnify
    #[arg(short, long, default_value_t = 0)]
    pub index: usize,
    /// Context around the box, 0 to 100 (defaults to the config value)
    #[arg(short, long)]
    pub padding: Option<f32>,
    /// Upscale so the longer edge has this many pixels
    #[arg(short, long)]
    pub size: Option<u32>,
    /// Output PNG
    #[arg(short, long, default_value = "crop.png")]
    pub output: PathBuf,
}

pub fn run(args: &CropArgs, config: &EngineConfig) -> Result<()> {
    let image = super::read_image(&args.image)?;
    let labels = super::read_labels(&args.labels)?;
    let label = labels.get(args.index).ok_or(RenderError::IndexOutOfRange {
        index: args.index,
        len: labels.len(),
    })?;

    let padding = args.padding.unwrap_or(config.padding);
    let crop = magnifier::render_crop(&image, label, padding, color::box_color(label.class_id))?;

    let surface = match args.size {
        Some(size) if size > 0 => {
            let (w, h) = crop.surface.dimensions();
            let ratio = size as f32 / w.max(h) as f32;
            let tw = ((w as f32 * ratio).round() as u32).max(1);
            let th = ((h as f32 * ratio).round() as u32).max(1);
            imageops::resize(&crop.surface, tw, th, FilterType::Nearest)
        }
        _ => crop.surface,
    };
    surface.save(&args.output)?;

    println!(
        "Label {} (class {}): crop {}x{} at ({}, {}) -> {}",
        args.index,
        label.class_id,
        crop.source.width,
        crop.source.height,
        crop.source.x,
        crop.source.y,
        args.output.display()
    );
    Ok(())
}
