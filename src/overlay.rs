//! Screen-space box overlay.
//!
//! [`compose`] turns labels into screen rectangles with a visual state;
//! [`Overlay::rasterize`] paints them onto an RGBA layer.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::color;
use crate::coords::ContentFrame;
use crate::model::{Label, NormPoint};
use crate::viewport::Viewport;

/// Side length of the corner handles drawn on the selected box, in pixels.
pub const HANDLE_SIZE: f32 = 7.0;

/// Color of the ghost box while creating.
pub const PENDING_COLOR: [u8; 3] = [255, 255, 255];

/// Visual state of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxStyle {
    Normal,
    Selected,
    /// From a detector, not committed.
    Predicted,
    /// Ghost box of a create gesture.
    Pending,
}

impl BoxStyle {
    pub fn stroke(&self) -> f32 {
        match self {
            BoxStyle::Normal => 2.0,
            BoxStyle::Selected => 3.0,
            BoxStyle::Predicted | BoxStyle::Pending => 1.0,
        }
    }
}

/// A box to draw, in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayItem {
    /// Index into the saved labels, `None` for predictions and the ghost box.
    pub index: Option<usize>,
    /// `(x, y, width, height)` in screen pixels.
    pub rect: (f32, f32, f32, f32),
    pub color: [u8; 3],
    pub style: BoxStyle,
    /// Detector confidence for predicted boxes.
    pub confidence: Option<f32>,
}

/// Everything drawn over one image.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    /// Items in paint order.
    pub items: Vec<OverlayItem>,
    /// Ghost box of a create gesture in progress.
    pub preview: Option<OverlayItem>,
}

/// Screen rectangle of a label.
pub fn label_rect(label: &Label, frame: &ContentFrame, viewport: &Viewport) -> (f32, f32, f32, f32) {
    let (x, y) = frame.normalized_to_screen(NormPoint::new(label.left(), label.top()), viewport);
    let (rw, rh) = frame.rendered_size(viewport);
    (x, y, label.w * rw, label.h * rh)
}

fn dim(rgb: [u8; 3]) -> [u8; 3] {
    rgb.map(|c| (f32::from(c) * 0.6).round() as u8)
}

/// Build the overlay for one image.
///
/// Saved labels come first in collection order with the selected label
/// painted last, then predictions, then the ghost box as preview.
pub fn compose(
    labels: &[Label],
    predictions: &[Label],
    selected: Option<usize>,
    ghost: Option<&Label>,
    frame: &ContentFrame,
    viewport: &Viewport,
) -> Overlay {
    let mut items: Vec<OverlayItem> = labels
        .iter()
        .enumerate()
        .filter(|(idx, _)| Some(*idx) != selected)
        .map(|(idx, label)| {
            let (style, color) = if label.predicted {
                (BoxStyle::Predicted, dim(color::box_color(label.class_id)))
            } else {
                (BoxStyle::Normal, color::box_color(label.class_id))
            };
            OverlayItem {
                index: Some(idx),
                rect: label_rect(label, frame, viewport),
                color,
                style,
                confidence: label.confidence,
            }
        })
        .collect();

    if let Some(idx) = selected
        && let Some(label) = labels.get(idx)
    {
        items.push(OverlayItem {
            index: Some(idx),
            rect: label_rect(label, frame, viewport),
            color: color::box_color(label.class_id),
            style: BoxStyle::Selected,
            confidence: label.confidence,
        });
    }

    items.extend(predictions.iter().map(|label| OverlayItem {
        index: None,
        rect: label_rect(label, frame, viewport),
        color: dim(color::box_color(label.class_id)),
        style: BoxStyle::Predicted,
        confidence: label.confidence,
    }));

    let preview = ghost.map(|label| OverlayItem {
        index: None,
        rect: label_rect(label, frame, viewport),
        color: PENDING_COLOR,
        style: BoxStyle::Pending,
        confidence: None,
    });

    Overlay { items, preview }
}

impl Overlay {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.preview.is_none()
    }

    /// Paint all items onto `layer`.
    pub fn rasterize(&self, layer: &mut RgbaImage) {
        for item in self.items.iter().chain(self.preview.iter()) {
            draw_outline(layer, item.rect, item.style.stroke(), item.color);

            if item.style == BoxStyle::Selected {
                let (x, y, w, h) = item.rect;
                for (cx, cy) in [(x, y), (x + w, y), (x, y + h), (x + w, y + h)] {
                    draw_square(layer, (cx, cy), HANDLE_SIZE, item.color);
                }
            }
        }
    }
}

fn to_rgba(rgb: [u8; 3]) -> Rgba<u8> {
    Rgba([rgb[0], rgb[1], rgb[2], 255])
}

/// Fill an axis-aligned pixel span, clipped to the image.
fn fill(image: &mut RgbaImage, x0: i32, y0: i32, x1: i32, y1: i32, paint: Rgba<u8>) {
    let (iw, ih) = image.dimensions();
    let x0 = x0.max(0);
    let y0 = y0.max(0);
    let x1 = x1.min(i32::try_from(iw).unwrap_or(i32::MAX));
    let y1 = y1.min(i32::try_from(ih).unwrap_or(i32::MAX));
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    let rect = Rect::at(x0, y0).of_size((x1 - x0) as u32, (y1 - y0) as u32);
    draw_filled_rect_mut(image, rect, paint);
}

/// Draw a rectangle outline of `stroke` pixels centered on the box edges.
pub(crate) fn draw_outline(
    image: &mut RgbaImage,
    rect: (f32, f32, f32, f32),
    stroke: f32,
    rgb: [u8; 3],
) {
    let (x, y, w, h) = rect;
    if !(x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite()) {
        return;
    }
    let t = stroke.round().max(1.0) as i32;
    let half = stroke / 2.0;
    let x0 = (x - half).round() as i32;
    let y0 = (y - half).round() as i32;
    let x1 = ((x + w + half).round() as i32).max(x0.saturating_add(t));
    let y1 = ((y + h + half).round() as i32).max(y0.saturating_add(t));
    let paint = to_rgba(rgb);

    fill(image, x0, y0, x1, y0.saturating_add(t), paint);
    fill(image, x0, y1.saturating_sub(t), x1, y1, paint);
    fill(image, x0, y0, x0.saturating_add(t), y1, paint);
    fill(image, x1.saturating_sub(t), y0, x1, y1, paint);
}

fn draw_square(image: &mut RgbaImage, center: (f32, f32), size: f32, rgb: [u8; 3]) {
    let half = size / 2.0;
    let x0 = (center.0 - half).round() as i32;
    let y0 = (center.1 - half).round() as i32;
    let s = size.round() as i32;
    fill(
        image,
        x0,
        y0,
        x0.saturating_add(s),
        y0.saturating_add(s),
        to_rgba(rgb),
    );
}
