//! Bounding box labels in normalized center/size form.

use serde::{Deserialize, Serialize};

/// Smallest width or height a box may be edited down to (normalized units).
pub const MIN_EXTENT: f32 = 0.001;

/// A 2D point in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormPoint {
    pub x: f32,
    pub y: f32,
}

impl NormPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle given by its four edges (normalized).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edges {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Edges {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// A single bounding box label.
///
/// `x`/`y` is the box center and `w`/`h` its size, all as fractions of the
/// image width and height. Values are kept exactly as loaded; nothing here
/// clamps them, only interactive edits do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub class_id: u32,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Came from a detector and has not been committed yet.
    #[serde(default)]
    pub predicted: bool,
    /// Detector confidence, only set for predicted labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl Label {
    /// Create a saved (non-predicted) label.
    pub fn new(class_id: u32, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            class_id,
            x,
            y,
            w,
            h,
            predicted: false,
            confidence: None,
        }
    }

    /// Create a label as returned by a detector.
    pub fn predicted(class_id: u32, x: f32, y: f32, w: f32, h: f32, confidence: f32) -> Self {
        Self {
            predicted: true,
            confidence: Some(confidence.clamp(0.0, 1.0)),
            ..Self::new(class_id, x, y, w, h)
        }
    }

    /// Build a label from its edges, keeping the class and flags of `self`.
    pub fn with_edges(&self, edges: Edges) -> Self {
        Self {
            x: (edges.left + edges.right) / 2.0,
            y: (edges.top + edges.bottom) / 2.0,
            w: edges.width(),
            h: edges.height(),
            ..*self
        }
    }

    /// Build a label from a top-left corner and a size.
    pub fn from_top_left(class_id: u32, top_left: NormPoint, w: f32, h: f32) -> Self {
        Self::new(class_id, top_left.x + w / 2.0, top_left.y + h / 2.0, w, h)
    }

    pub fn left(&self) -> f32 {
        self.x - self.w / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y - self.h / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h / 2.0
    }

    pub fn edges(&self) -> Edges {
        Edges {
            left: self.left(),
            right: self.right(),
            top: self.top(),
            bottom: self.bottom(),
        }
    }

    pub fn center(&self) -> NormPoint {
        NormPoint::new(self.x, self.y)
    }

    /// Check if a normalized point lies inside the box (edges inclusive).
    pub fn contains(&self, point: NormPoint) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Box in image pixels as `(left, top, width, height)`.
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> (f32, f32, f32, f32) {
        let iw = image_width as f32;
        let ih = image_height as f32;
        (self.left() * iw, self.top() * ih, self.w * iw, self.h * ih)
    }

    /// Turn a predicted label into a saved one.
    pub fn commit(self) -> Self {
        Self {
            predicted: false,
            confidence: None,
            ..self
        }
    }

    /// Whether all geometry fields are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }
}

/// Strip the extension from an image file name to get its label key.
///
/// Only the last extension is removed, so `"a.b.jpg"` maps to `"a.b"`.
/// Directory components are dropped.
pub fn image_key(file_name: &str) -> String {
    let name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    match name.rfind('.') {
        Some(pos) if pos > 0 => name[..pos].to_string(),
        _ => name.to_string(),
    }
}
