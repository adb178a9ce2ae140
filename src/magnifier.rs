//! Crop-and-magnify rendering of a single label.
//!
//! The crop window is sized relative to the label, not the image, so small
//! boxes get a tight close-up and large boxes still fit. The cropped pixels
//! are copied 1:1 into a surface of exactly the crop's pixel size; stretching
//! that surface over its container is what magnifies it. A secondary
//! [`Viewport`] (scale 1..20) is layered on top as a pure presentation
//! transform and never changes which pixels are copied.

use image::RgbaImage;

use crate::color;
use crate::error::RenderError;
use crate::interaction::{PointerEvent, PointerKind, WheelEvent};
use crate::model::Label;
use crate::overlay::draw_outline;
use crate::viewport::{ScaleBounds, Viewport, WHEEL_SENSITIVITY, wheel_factor};

/// Expansion factor at padding 0.
pub const MIN_EXPANSION: f32 = 1.2;

/// Additional expansion at padding 100.
pub const EXPANSION_RANGE: f32 = 4.0;

/// Default padding slider value.
pub const DEFAULT_PADDING: f32 = 25.0;

/// Crop size multiplier for a padding slider value in `[0, 100]`.
pub fn expansion_factor(padding: f32) -> f32 {
    MIN_EXPANSION + (padding.clamp(0.0, 100.0) / 100.0) * EXPANSION_RANGE
}

/// Outline width for a crop of the given pixel size.
pub fn stroke_width(crop_width: u32, crop_height: u32) -> f32 {
    (crop_width.min(crop_height) as f32 / 50.0).max(2.0)
}

/// Round values within float noise of an integer, so `0.44 * 200` does not
/// floor to 87.
fn snap(v: f32) -> f32 {
    let r = v.round();
    if (v - r).abs() < 1e-3 { r } else { v }
}

/// Integer pixel rectangle inside an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Crop window in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropWindow {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl CropWindow {
    /// Window of `factor` times the label size, centered on the label.
    ///
    /// Each edge is clamped to `[0, 1]` on its own, so labels near the image
    /// border get an asymmetric window instead of a shifted one.
    pub fn around(label: &Label, factor: f32) -> Self {
        let half_w = label.w * factor / 2.0;
        let half_h = label.h * factor / 2.0;
        Self {
            left: (label.x - half_w).clamp(0.0, 1.0),
            top: (label.y - half_h).clamp(0.0, 1.0),
            right: (label.x + half_w).clamp(0.0, 1.0),
            bottom: (label.y + half_h).clamp(0.0, 1.0),
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Source rectangle in image pixels, or `None` if it holds no pixels.
    ///
    /// Left/top round down and right/bottom round up so the label is never
    /// cut off by rounding.
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> Option<PixelRect> {
        if !(self.width() > 0.0 && self.height() > 0.0) {
            return None;
        }
        let iw = image_width as f32;
        let ih = image_height as f32;

        let x0 = snap(self.left * iw).floor().max(0.0) as u32;
        let y0 = snap(self.top * ih).floor().max(0.0) as u32;
        let x1 = (snap(self.right * iw).ceil() as u32).min(image_width);
        let y1 = (snap(self.bottom * ih).ceil() as u32).min(image_height);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PixelRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

/// A rendered close-up of one label.
#[derive(Debug, Clone)]
pub struct Magnified {
    /// Crop pixels with the label outline drawn on top.
    pub surface: RgbaImage,
    pub window: CropWindow,
    /// Where `surface` came from in the source image.
    pub source: PixelRect,
    /// Label box in surface pixels as `(x, y, width, height)`.
    pub label_box: (f32, f32, f32, f32),
    pub stroke: f32,
}

/// Copy the crop around `label` out of `image` and outline the label.
pub fn render_crop(
    image: &RgbaImage,
    label: &Label,
    padding: f32,
    outline: [u8; 3],
) -> Result<Magnified, RenderError> {
    let (iw, ih) = image.dimensions();
    let window = CropWindow::around(label, expansion_factor(padding));
    let source = window
        .to_pixels(iw, ih)
        .ok_or(RenderError::EmptyCrop { width: iw, height: ih })?;

    let mut surface =
        image::imageops::crop_imm(image, source.x, source.y, source.width, source.height)
            .to_image();

    let (lx, ly, lw, lh) = label.to_pixels(iw, ih);
    let label_box = (lx - source.x as f32, ly - source.y as f32, lw, lh);
    let stroke = stroke_width(source.width, source.height);
    draw_outline(&mut surface, label_box, stroke, outline);

    log::trace!(
        "Rendered crop {}x{} at ({}, {}) stroke {:.1}",
        source.width,
        source.height,
        source.x,
        source.y,
        stroke
    );

    Ok(Magnified {
        surface,
        window,
        source,
        label_box,
        stroke,
    })
}

/// CSS-like presentation transform: scale about the container center, then
/// translate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

/// Detail inspector for one label with its own pan/zoom.
#[derive(Debug, Clone)]
pub struct Magnifier {
    padding: f32,
    label_index: Option<usize>,
    viewport: Viewport,
    /// Pointer position at the previous pan step.
    drag: Option<(f32, f32)>,
    wheel_sensitivity: f32,
}

impl Default for Magnifier {
    fn default() -> Self {
        Self::new(DEFAULT_PADDING)
    }
}

impl Magnifier {
    pub fn new(padding: f32) -> Self {
        Self::with_bounds(padding, ScaleBounds::MAGNIFIER)
    }

    pub fn with_bounds(padding: f32, bounds: ScaleBounds) -> Self {
        Self {
            padding: padding.clamp(0.0, 100.0),
            label_index: None,
            viewport: Viewport::new(bounds),
            drag: None,
            wheel_sensitivity: WHEEL_SENSITIVITY,
        }
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn set_padding(&mut self, padding: f32) {
        self.padding = padding.clamp(0.0, 100.0);
    }

    pub fn set_wheel_sensitivity(&mut self, sensitivity: f32) {
        self.wheel_sensitivity = sensitivity;
    }

    pub fn label_index(&self) -> Option<usize> {
        self.label_index
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Point the magnifier at another label. Resets pan/zoom on change.
    pub fn set_label(&mut self, index: Option<usize>) {
        if self.label_index != index {
            self.label_index = index;
            self.reset();
        }
    }

    /// Return the presentation transform to identity.
    pub fn reset(&mut self) {
        self.viewport.reset();
        self.drag = None;
    }

    /// Render the current label, or `None` when there is nothing to show
    /// (no label selected, or the image is not decoded yet).
    pub fn render(
        &self,
        image: Option<&RgbaImage>,
        labels: &[Label],
    ) -> Result<Option<Magnified>, RenderError> {
        let (Some(image), Some(index)) = (image, self.label_index) else {
            return Ok(None);
        };
        let label = labels.get(index).ok_or(RenderError::IndexOutOfRange {
            index,
            len: labels.len(),
        })?;
        render_crop(image, label, self.padding, color::box_color(label.class_id)).map(Some)
    }

    /// Pan the presentation with the pointer. Returns whether it changed.
    pub fn pointer(&mut self, event: PointerEvent) -> bool {
        match (event.kind, self.drag) {
            (PointerKind::Down, None) => {
                self.drag = Some(event.position);
                false
            }
            (PointerKind::Move, Some(last)) => {
                self.viewport = self.viewport.panned(last, event.position);
                self.drag = Some(event.position);
                true
            }
            (PointerKind::Up, Some(last)) => {
                self.viewport = self.viewport.panned(last, event.position);
                self.drag = None;
                true
            }
            _ => false,
        }
    }

    /// Zoom the presentation about the pointer. Returns whether it changed.
    pub fn wheel(&mut self, event: WheelEvent, center: (f32, f32)) -> bool {
        if !event.modifier {
            return false;
        }
        let before = self.viewport;
        self.viewport = self.viewport.zoomed_at(
            event.position,
            center,
            wheel_factor(event.delta, self.wheel_sensitivity),
        );
        self.viewport != before
    }

    pub fn presentation(&self) -> Presentation {
        Presentation {
            scale: self.viewport.scale,
            translate_x: self.viewport.offset_x,
            translate_y: self.viewport.offset_y,
        }
    }
}
