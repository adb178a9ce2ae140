//! Crop-magnifier rendering against real pixel data.

use image::{Rgba, RgbaImage};
use labelscope::error::RenderError;
use labelscope::magnifier::{self, PixelRect};
use labelscope::{Label, Magnifier, color};

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 7, 255])
    })
}

#[test]
fn full_padding_crop_is_clamped_to_image() {
    let image = gradient(200, 100);
    let label = Label::new(5, 0.5, 0.5, 0.1, 0.2);
    let outline = color::box_color(5);

    let crop = magnifier::render_crop(&image, &label, 100.0, outline).unwrap();

    assert_eq!(
        crop.source,
        PixelRect {
            x: 48,
            y: 0,
            width: 104,
            height: 100
        }
    );
    assert_eq!(crop.surface.dimensions(), (104, 100));
    assert_eq!(crop.window.top, 0.0);
    assert_eq!(crop.window.bottom, 1.0);
    assert!((crop.label_box.0 - 42.0).abs() < 1e-3);
    assert!((crop.label_box.1 - 40.0).abs() < 1e-3);
    assert_eq!(crop.stroke, 2.0);

    // Untouched pixels come straight from the source
    assert_eq!(crop.surface.get_pixel(0, 0), &Rgba([48, 0, 7, 255]));
    assert_eq!(crop.surface.get_pixel(52, 50), &Rgba([100, 50, 7, 255]));
    // Outline sits on the label's top edge
    let [r, g, b] = outline;
    assert_eq!(crop.surface.get_pixel(50, 40), &Rgba([r, g, b, 255]));
}

#[test]
fn edge_label_gets_asymmetric_window() {
    let image = gradient(200, 100);
    let label = Label::new(0, 0.02, 0.5, 0.04, 0.2);

    let crop = magnifier::render_crop(&image, &label, 0.0, [255, 0, 0]).unwrap();

    assert_eq!(crop.window.left, 0.0);
    assert!(crop.window.right > 0.04);
    assert_eq!(crop.source.x, 0);
    assert_eq!(crop.source.width, 9);
    // Label box starts at the crop's left edge
    assert!((crop.label_box.0 - 0.0).abs() < 1e-3);
}

#[test]
fn degenerate_label_reports_empty_crop() {
    let image = gradient(50, 50);
    let label = Label::new(0, 0.5, 0.5, 0.0, 0.0);
    let err = magnifier::render_crop(&image, &label, 25.0, [0, 0, 0]).unwrap_err();
    assert!(matches!(
        err,
        RenderError::EmptyCrop {
            width: 50,
            height: 50
        }
    ));
}

#[test]
fn magnifier_blank_until_image_ready() {
    let labels = vec![Label::new(0, 0.5, 0.5, 0.2, 0.2)];
    let mut magnifier = Magnifier::default();
    magnifier.set_label(Some(0));

    assert!(magnifier.render(None, &labels).unwrap().is_none());

    let image = gradient(100, 100);
    let crop = magnifier.render(Some(&image), &labels).unwrap().unwrap();
    // Default padding: 1.2 + 0.25 * 4 = 2.2 times the label size
    assert_eq!(crop.source.width, 44);
    assert_eq!(crop.source.height, 44);

    magnifier.set_label(Some(3));
    assert!(matches!(
        magnifier.render(Some(&image), &labels),
        Err(RenderError::IndexOutOfRange { index: 3, len: 1 })
    ));
}
