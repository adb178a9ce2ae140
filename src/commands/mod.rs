pub mod check;
pub mod crop;
pub mod overlay;

use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;
use labelscope::format;
use labelscope::model::Label;

pub fn read_labels(path: &Path) -> Result<Vec<Label>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read label file {}", path.display()))?;
    let report = format::parse_report(&text);
    if report.has_skipped() {
        log::warn!(
            "{}: skipped malformed lines {:?}",
            path.display(),
            report.skipped_lines
        );
    }
    Ok(report.labels)
}

pub fn read_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?;
    Ok(image.to_rgba8())
}
