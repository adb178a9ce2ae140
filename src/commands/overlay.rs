use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use labelscope::coords::ContentFrame;
use labelscope::overlay;
use labelscope::viewport::Viewport;

#[derive(Args)]
pub struct OverlayArgs {
    /// Source image
    pub image: PathBuf,
    /// YOLO label file for the image
    pub labels: PathBuf,
    /// Label file with detector output, drawn dimmed
    #[arg(long)]
    pub predictions: Option<PathBuf>,
    /// Draw this label as selected
    #[arg(long)]
    pub selected: Option<usize>,
    /// Output PNG
    #[arg(short, long, default_value = "overlay.png")]
    pub output: PathBuf,
}

pub fn run(args: &OverlayArgs) -> Result<()> {
    let mut image = super::read_image(&args.image)?;
    let labels = super::read_labels(&args.labels)?;
    let predictions = match &args.predictions {
        Some(path) => labelscope::detection::mark_predicted(super::read_labels(path)?),
        None => Vec::new(),
    };

    let (w, h) = image.dimensions();
    let frame = ContentFrame::for_view(w as f32, h as f32, w, h);
    let composed = overlay::compose(
        &labels,
        &predictions,
        args.selected,
        None,
        &frame,
        &Viewport::default(),
    );
    composed.rasterize(&mut image);
    image.save(&args.output)?;

    println!(
        "Drew {} boxes ({} predicted) -> {}",
        composed.items.len(),
        predictions.len(),
        args.output.display()
    );
    Ok(())
}
