use image::{GrayImage, Luma};

/// Dark text-like stripes on a white page.
///
/// Stripes repeat every `spacing` pixels, each a third of a period thick, and
/// are tilted counter-clockwise by `tilt_degrees` (lines rise to the right for
/// positive tilt).
pub fn striped_page(width: u32, height: u32, spacing: f64, tilt_degrees: f64) -> GrayImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(spacing > 0.0, "stripe spacing must be positive");

    let thickness = spacing / 3.0;
    let (sin_a, cos_a) = tilt_degrees.to_radians().sin_cos();
    let cx = (width / 2) as f64;
    let cy = (height / 2) as f64;

    GrayImage::from_fn(width, height, |x, y| {
        let d = sin_a * (x as f64 - cx) + cos_a * (y as f64 - cy);
        if d.rem_euclid(spacing) < thickness {
            Luma([0])
        } else {
            Luma([255])
        }
    })
}
