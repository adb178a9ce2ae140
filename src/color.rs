//! Class id to display color mapping.
//!
//! Hues advance by the golden angle per index, so neighbouring class ids land
//! far apart on the color wheel without a lookup table.

/// Golden angle in degrees.
pub const GOLDEN_ANGLE: f64 = 137.507_764_050_037_85;

/// Saturation/lightness used for box outlines.
pub const BOX_SATURATION: f32 = 0.85;
pub const BOX_LIGHTNESS: f32 = 0.55;

/// Hue in degrees `[0, 360)` for a class index.
pub fn hue(index: u32) -> f32 {
    ((f64::from(index) * GOLDEN_ANGLE) % 360.0) as f32
}

/// Convert HSL to RGB.
///
/// # Arguments
/// * `h` - Hue in degrees (0-360)
/// * `s` - Saturation (0.0-1.0)
/// * `l` - Lightness (0.0-1.0)
///
/// # Returns
/// RGB tuple with values in range 0.0-1.0
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h = h.rem_euclid(360.0);
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

/// RGB bytes for a class index at the given saturation and lightness.
pub fn class_color(index: u32, saturation: f32, lightness: f32) -> [u8; 3] {
    let (r, g, b) = hsl_to_rgb(hue(index), saturation, lightness);
    let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [to_byte(r), to_byte(g), to_byte(b)]
}

/// Outline color for a class with the default box saturation/lightness.
pub fn box_color(index: u32) -> [u8; 3] {
    class_color(index, BOX_SATURATION, BOX_LIGHTNESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsl_to_rgb_red() {
        let (r, g, b) = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((r - 1.0).abs() < 0.01);
        assert!(g.abs() < 0.01);
        assert!(b.abs() < 0.01);
    }

    #[test]
    fn test_hsl_to_rgb_green() {
        let (r, g, b) = hsl_to_rgb(120.0, 1.0, 0.5);
        assert!(r.abs() < 0.01);
        assert!((g - 1.0).abs() < 0.01);
        assert!(b.abs() < 0.01);
    }

    #[test]
    fn test_hsl_to_rgb_gray() {
        let (r, g, b) = hsl_to_rgb(200.0, 0.0, 0.25);
        assert!((r - 0.25).abs() < 0.01);
        assert!((g - 0.25).abs() < 0.01);
        assert!((b - 0.25).abs() < 0.01);
    }

    #[test]
    fn test_hue_sequence() {
        assert_eq!(hue(0), 0.0);
        assert!((hue(1) - 137.50777).abs() < 1e-3);
        assert!((hue(2) - 275.01553).abs() < 1e-3);
        assert!((hue(3) - 52.52329).abs() < 1e-3);
    }

    #[test]
    fn test_hues_distinct_over_first_thousand() {
        let mut hues: Vec<f32> = (0..1000).map(hue).collect();
        hues.sort_by(|a, b| a.total_cmp(b));
        for pair in hues.windows(2) {
            assert!(pair[1] - pair[0] > 1e-4, "hues {} and {} collide", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_consecutive_indices_far_apart() {
        for i in 0..200 {
            let d = (hue(i) - hue(i + 1)).abs();
            let d = d.min(360.0 - d);
            assert!(d > 100.0, "indices {} and {} are only {} degrees apart", i, i + 1, d);
        }
    }

    #[test]
    fn test_class_color_deterministic() {
        assert_eq!(box_color(7), box_color(7));
        assert_ne!(box_color(0), box_color(1));
    }
}
