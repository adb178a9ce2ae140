//! Conversions between normalized, image-pixel and screen coordinates.
//!
//! Content space of the main viewer is image pixels with the origin at the
//! image center, so an identity [`Viewport`] shows the image centered in the
//! view.

use crate::model::NormPoint;
use crate::viewport::Viewport;

/// Normalized point to image pixels.
pub fn normalized_to_pixel(point: NormPoint, image_width: u32, image_height: u32) -> (f32, f32) {
    (point.x * image_width as f32, point.y * image_height as f32)
}

/// Image pixels to a normalized point. Zero-sized images map to the origin.
pub fn pixel_to_normalized(pixel: (f32, f32), image_width: u32, image_height: u32) -> NormPoint {
    if image_width == 0 || image_height == 0 {
        return NormPoint::default();
    }
    NormPoint::new(
        pixel.0 / image_width as f32,
        pixel.1 / image_height as f32,
    )
}

/// Where the image sits on screen: the view center and the image size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentFrame {
    /// Center of the view in screen pixels.
    pub center: (f32, f32),
    /// Image size in pixels.
    pub image_width: u32,
    pub image_height: u32,
}

impl ContentFrame {
    pub fn new(center: (f32, f32), image_width: u32, image_height: u32) -> Self {
        Self {
            center,
            image_width,
            image_height,
        }
    }

    /// Frame for a view of `view_width` x `view_height` with origin at (0, 0).
    pub fn for_view(view_width: f32, view_height: f32, image_width: u32, image_height: u32) -> Self {
        Self::new((view_width / 2.0, view_height / 2.0), image_width, image_height)
    }

    fn size(&self) -> (f32, f32) {
        (
            (self.image_width as f32).max(1.0),
            (self.image_height as f32).max(1.0),
        )
    }

    /// Screen point to normalized image coordinates.
    pub fn screen_to_normalized(&self, screen: (f32, f32), viewport: &Viewport) -> NormPoint {
        let (cx, cy) = viewport.to_content(screen, self.center);
        let (w, h) = self.size();
        NormPoint::new((cx + w / 2.0) / w, (cy + h / 2.0) / h)
    }

    /// Normalized image coordinates to a screen point.
    pub fn normalized_to_screen(&self, point: NormPoint, viewport: &Viewport) -> (f32, f32) {
        let (w, h) = self.size();
        let content = (point.x * w - w / 2.0, point.y * h - h / 2.0);
        viewport.to_screen(content, self.center)
    }

    /// Convert a screen-pixel delta to normalized units.
    ///
    /// Divides by the rendered size of the image, i.e. its pixel size times
    /// the viewport scale.
    pub fn screen_delta_to_normalized(&self, delta: (f32, f32), viewport: &Viewport) -> (f32, f32) {
        let (w, h) = self.size();
        (delta.0 / (w * viewport.scale), delta.1 / (h * viewport.scale))
    }

    /// Rendered size of one normalized unit on screen, per axis.
    pub fn rendered_size(&self, viewport: &Viewport) -> (f32, f32) {
        let (w, h) = self.size();
        (w * viewport.scale, h * viewport.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::ScaleBounds;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_pixel_conversions() {
        let (px, py) = normalized_to_pixel(NormPoint::new(0.25, 0.5), 800, 600);
        assert_eq!((px, py), (200.0, 300.0));
        let back = pixel_to_normalized((px, py), 800, 600);
        assert!((back.x - 0.25).abs() < EPSILON);
        assert!((back.y - 0.5).abs() < EPSILON);
        assert_eq!(pixel_to_normalized((5.0, 5.0), 0, 10), NormPoint::default());
    }

    #[test]
    fn test_identity_centers_image() {
        let frame = ContentFrame::for_view(1000.0, 800.0, 400, 200);
        let v = Viewport::default();
        let (sx, sy) = frame.normalized_to_screen(NormPoint::new(0.0, 0.0), &v);
        assert_eq!((sx, sy), (300.0, 300.0));
        let center = frame.screen_to_normalized((500.0, 400.0), &v);
        assert!((center.x - 0.5).abs() < EPSILON);
        assert!((center.y - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_screen_normalized_roundtrip_under_zoom() {
        let frame = ContentFrame::new((640.0, 360.0), 1920, 1080);
        let v = Viewport::with_transform(ScaleBounds::MAIN, 0.37, -55.0, 18.0);
        let p = NormPoint::new(0.81, 0.14);
        let screen = frame.normalized_to_screen(p, &v);
        let back = frame.screen_to_normalized(screen, &v);
        assert!((back.x - p.x).abs() < EPSILON);
        assert!((back.y - p.y).abs() < EPSILON);
    }

    #[test]
    fn test_screen_delta() {
        let frame = ContentFrame::new((0.0, 0.0), 200, 100);
        let v = Viewport::with_transform(ScaleBounds::MAIN, 2.0, 0.0, 0.0);
        let (dx, dy) = frame.screen_delta_to_normalized((40.0, 40.0), &v);
        assert!((dx - 0.1).abs() < EPSILON);
        assert!((dy - 0.2).abs() < EPSILON);
        assert_eq!(frame.rendered_size(&v), (400.0, 200.0));
    }
}
