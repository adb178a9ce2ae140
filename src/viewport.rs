//! Pan/zoom viewport transform.
//!
//! A viewport maps content pixels to screen pixels relative to the center of
//! the view:
//!
//! ```text
//! screen  = center + offset + scale * content
//! content = (screen - center - offset) / scale
//! ```
//!
//! Every view (main viewer, detail magnifier, each grid cell) owns its own
//! `Viewport` value.

use serde::{Deserialize, Serialize};

/// Allowed zoom range for a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleBounds {
    pub min: f32,
    pub max: f32,
}

impl ScaleBounds {
    /// Bounds of the main image viewer.
    pub const MAIN: ScaleBounds = ScaleBounds {
        min: 0.1,
        max: 50.0,
    };

    /// Bounds of the secondary zoom layered on a magnified crop.
    pub const MAGNIFIER: ScaleBounds = ScaleBounds {
        min: 1.0,
        max: 20.0,
    };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Finite, positive and ordered.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max
    }

    pub fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.min, self.max)
    }
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self::MAIN
    }
}

/// Default wheel sensitivity for [`wheel_factor`].
pub const WHEEL_SENSITIVITY: f32 = 0.0015;

/// Convert a wheel delta into a multiplicative zoom factor.
///
/// `exp(-delta * k)` is smooth in the delta and always positive, so it works
/// for line-based and pixel-based wheel devices alike. Negative deltas (wheel
/// up) zoom in.
pub fn wheel_factor(delta: f32, sensitivity: f32) -> f32 {
    (-delta * sensitivity).exp()
}

/// Pan/zoom transform state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    bounds: ScaleBounds,
}

impl Viewport {
    /// Create an identity viewport with the given zoom bounds.
    pub fn new(bounds: ScaleBounds) -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            bounds,
        }
    }

    /// Create a viewport with explicit scale and offset (scale is clamped).
    pub fn with_transform(bounds: ScaleBounds, scale: f32, offset_x: f32, offset_y: f32) -> Self {
        Self {
            scale: bounds.clamp(scale),
            offset_x,
            offset_y,
            bounds,
        }
    }

    pub fn bounds(&self) -> ScaleBounds {
        self.bounds
    }

    pub fn offset(&self) -> (f32, f32) {
        (self.offset_x, self.offset_y)
    }

    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.offset_x == 0.0 && self.offset_y == 0.0
    }

    /// Return to scale 1 with no offset.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    /// Map a screen point to content space.
    pub fn to_content(&self, screen: (f32, f32), center: (f32, f32)) -> (f32, f32) {
        (
            (screen.0 - center.0 - self.offset_x) / self.scale,
            (screen.1 - center.1 - self.offset_y) / self.scale,
        )
    }

    /// Map a content point to screen space.
    pub fn to_screen(&self, content: (f32, f32), center: (f32, f32)) -> (f32, f32) {
        (
            center.0 + self.offset_x + self.scale * content.0,
            center.1 + self.offset_y + self.scale * content.1,
        )
    }

    /// Offset this viewport by the pointer travel since the gesture started.
    ///
    /// `self` is the viewport captured at pointer-down. Panning is unbounded.
    pub fn panned(&self, anchor: (f32, f32), current: (f32, f32)) -> Viewport {
        Viewport {
            offset_x: self.offset_x + (current.0 - anchor.0),
            offset_y: self.offset_y + (current.1 - anchor.1),
            ..*self
        }
    }

    /// Zoom by `factor` keeping the content point under `pointer` fixed.
    pub fn zoomed_at(&self, pointer: (f32, f32), center: (f32, f32), factor: f32) -> Viewport {
        if !factor.is_finite() || factor <= 0.0 {
            return *self;
        }

        let new_scale = self.bounds.clamp(self.scale * factor);
        let ratio = new_scale / self.scale;

        // Pointer relative to the view center
        let rel_x = pointer.0 - center.0;
        let rel_y = pointer.1 - center.1;

        Viewport {
            scale: new_scale,
            offset_x: rel_x - (rel_x - self.offset_x) * ratio,
            offset_y: rel_y - (rel_y - self.offset_y) * ratio,
            bounds: self.bounds,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ScaleBounds::MAIN)
    }
}
