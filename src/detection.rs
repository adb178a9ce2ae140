//! Detection backend seam.
//!
//! A [`Detector`] turns an image into candidate labels. The engine never
//! trusts a backend's flags: [`run_detector`] marks every result as
//! predicted, drops low-confidence boxes and suppresses duplicates before the
//! host shows them. Accepting a prediction goes through [`Label::commit`].

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::DetectionError;
use crate::magnifier::PixelRect;
use crate::model::Label;

/// Parameters passed to a detection backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum confidence in `[0, 1]`
    pub confidence: f32,
    /// Overlap threshold for duplicate suppression in `[0, 1]`
    pub iou: f32,
    /// Tile edge in pixels for tiled inference, 0 disables tiling
    pub tile_size: u32,
    /// Fraction of a tile shared with its neighbour, in `[0, 1)`
    pub tile_overlap: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            confidence: 0.25,
            iou: 0.45,
            tile_size: 0,
            tile_overlap: 0.2,
        }
    }
}

impl DetectionConfig {
    /// Reject out-of-range parameters.
    pub fn validate(&self) -> Result<(), DetectionError> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(DetectionError::invalid_config(format!(
                "confidence {} not in [0, 1]",
                self.confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.iou) {
            return Err(DetectionError::invalid_config(format!(
                "iou {} not in [0, 1]",
                self.iou
            )));
        }
        if !(0.0..1.0).contains(&self.tile_overlap) {
            return Err(DetectionError::invalid_config(format!(
                "tile overlap {} not in [0, 1)",
                self.tile_overlap
            )));
        }
        Ok(())
    }
}

/// A source of predicted labels.
pub trait Detector {
    /// Detect objects in `image`.
    fn detect(
        &self,
        image: &RgbaImage,
        config: &DetectionConfig,
    ) -> Result<Vec<Label>, DetectionError>;
}

/// Force every label to the predicted state.
pub fn mark_predicted(labels: Vec<Label>) -> Vec<Label> {
    labels
        .into_iter()
        .map(|mut label| {
            label.predicted = true;
            label
        })
        .collect()
}

/// Intersection over union of two labels.
pub fn iou(a: &Label, b: &Label) -> f32 {
    let left = a.left().max(b.left());
    let top = a.top().max(b.top());
    let right = a.right().min(b.right());
    let bottom = a.bottom().min(b.bottom());
    if right <= left || bottom <= top {
        return 0.0;
    }

    let intersection = (right - left) * (bottom - top);
    let union = a.w * a.h + b.w * b.h - intersection;
    if union <= 0.0 {
        0.0
    } else {
        intersection / union
    }
}

/// Greedy per-class suppression, keeping the most confident box.
///
/// Output is ordered by descending confidence.
pub fn suppress_overlaps(mut labels: Vec<Label>, threshold: f32) -> Vec<Label> {
    let score = |l: &Label| l.confidence.unwrap_or(0.0);
    labels.sort_by(|a, b| score(b).total_cmp(&score(a)));

    let mut kept: Vec<Label> = Vec::with_capacity(labels.len());
    for label in labels {
        let duplicate = kept
            .iter()
            .any(|k| k.class_id == label.class_id && iou(k, &label) > threshold);
        if !duplicate {
            kept.push(label);
        }
    }
    kept
}

/// Square tiles covering the image for tiled inference.
///
/// Edge tiles are shifted inward so every tile lies inside the image; an
/// image smaller than one tile yields a single window covering it.
pub fn tile_windows(image_width: u32, image_height: u32, config: &DetectionConfig) -> Vec<PixelRect> {
    let whole = PixelRect {
        x: 0,
        y: 0,
        width: image_width,
        height: image_height,
    };
    let size = config.tile_size;
    if size == 0 || (image_width <= size && image_height <= size) {
        return vec![whole];
    }

    let overlap = config.tile_overlap.clamp(0.0, 0.95);
    let stride = ((size as f32 * (1.0 - overlap)).round() as u32).max(1);
    let starts = |extent: u32| -> Vec<u32> {
        if extent <= size {
            return vec![0];
        }
        let last = extent - size;
        let mut out: Vec<u32> = (0..last).step_by(stride as usize).collect();
        out.push(last);
        out
    };

    let mut tiles = Vec::new();
    for y in starts(image_height) {
        for x in starts(image_width) {
            tiles.push(PixelRect {
                x,
                y,
                width: size.min(image_width),
                height: size.min(image_height),
            });
        }
    }
    tiles
}

/// Run a backend and clean up its output for display.
pub fn run_detector(
    detector: &dyn Detector,
    image: &RgbaImage,
    config: &DetectionConfig,
) -> Result<Vec<Label>, DetectionError> {
    config.validate()?;
    let raw = detector.detect(image, config)?;
    let total = raw.len();

    let candidates: Vec<Label> = mark_predicted(raw)
        .into_iter()
        .filter(|l| l.is_finite() && l.confidence.unwrap_or(1.0) >= config.confidence)
        .collect();
    let kept = suppress_overlaps(candidates, config.iou);

    log::debug!("Detector returned {} boxes, kept {}", total, kept.len());
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDetector(Vec<Label>);

    impl Detector for FixedDetector {
        fn detect(
            &self,
            _image: &RgbaImage,
            _config: &DetectionConfig,
        ) -> Result<Vec<Label>, DetectionError> {
            Ok(self.0.clone())
        }
    }

    struct FailingDetector;

    impl Detector for FailingDetector {
        fn detect(
            &self,
            _image: &RgbaImage,
            _config: &DetectionConfig,
        ) -> Result<Vec<Label>, DetectionError> {
            Err(DetectionError::rejected("model not loaded"))
        }
    }

    fn scored(class_id: u32, x: f32, confidence: f32) -> Label {
        let mut label = Label::new(class_id, x, 0.5, 0.2, 0.2);
        label.confidence = Some(confidence);
        label
    }

    #[test]
    fn test_validate() {
        assert!(DetectionConfig::default().validate().is_ok());
        let bad = DetectionConfig {
            confidence: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(DetectionError::InvalidConfig { .. })
        ));
        let bad = DetectionConfig {
            tile_overlap: 1.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_mark_predicted_keeps_confidence() {
        let labels = mark_predicted(vec![scored(0, 0.5, 0.7), Label::new(1, 0.2, 0.2, 0.1, 0.1)]);
        assert!(labels.iter().all(|l| l.predicted));
        assert_eq!(labels[0].confidence, Some(0.7));
        assert_eq!(labels[1].confidence, None);
    }

    #[test]
    fn test_iou() {
        let a = Label::new(0, 0.5, 0.5, 0.2, 0.2);
        assert!((iou(&a, &a) - 1.0).abs() < 1e-5);
        let b = Label::new(0, 0.6, 0.5, 0.2, 0.2);
        // Overlap 0.1 x 0.2 over union 0.06
        assert!((iou(&a, &b) - 0.02 / 0.06).abs() < 1e-4);
        let far = Label::new(0, 0.9, 0.9, 0.1, 0.1);
        assert_eq!(iou(&a, &far), 0.0);
    }

    #[test]
    fn test_suppress_per_class() {
        let labels = vec![
            scored(0, 0.50, 0.6),
            scored(0, 0.51, 0.9),
            scored(1, 0.50, 0.5),
        ];
        let kept = suppress_overlaps(labels, 0.45);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].confidence, Some(0.9));
        assert_eq!(kept[1].class_id, 1);
    }

    #[test]
    fn test_run_detector_filters_and_marks() {
        let detector = FixedDetector(vec![
            scored(0, 0.3, 0.9),
            scored(0, 0.7, 0.1),
            Label::new(2, f32::NAN, 0.5, 0.1, 0.1),
        ]);
        let image = RgbaImage::new(10, 10);
        let out = run_detector(&detector, &image, &DetectionConfig::default()).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].predicted);
        assert_eq!(out[0].confidence, Some(0.9));
    }

    #[test]
    fn test_run_detector_propagates_rejection() {
        let image = RgbaImage::new(4, 4);
        let err = run_detector(&FailingDetector, &image, &DetectionConfig::default()).unwrap_err();
        assert!(err.to_string().contains("model not loaded"));
    }

    #[test]
    fn test_tile_windows() {
        let config = DetectionConfig {
            tile_size: 100,
            tile_overlap: 0.5,
            ..Default::default()
        };
        assert_eq!(tile_windows(80, 60, &config).len(), 1);

        let tiles = tile_windows(250, 100, &config);
        let xs: Vec<u32> = tiles.iter().map(|t| t.x).collect();
        assert_eq!(xs, vec![0, 50, 100, 150]);
        assert!(tiles.iter().all(|t| t.x + t.width <= 250 && t.y == 0));

        let untiled = tile_windows(1000, 1000, &DetectionConfig::default());
        assert_eq!(untiled[0].width, 1000);
    }
}
