//! Image I/O around the estimation core.
//!
//! - `load_image` / `load_intensity_field`: decode any raster format supported by `image`.
//! - `render_deskewed`: rotate the original page by the estimated correction.
//! - `sinogram_image`: the projection matrix as an 8-bit picture (angles down, offsets across).
use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage, ImageReader, Luma, Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

use crate::field::IntensityField;
use crate::projection::ProjectionMatrix;

/// Fill for pixels uncovered by the rotation
const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

pub fn load_image(path: &Path) -> Result<DynamicImage> {
    ImageReader::open(path)
        .with_context(|| format!("Failed to open input file: {:?}", path))?
        .decode()
        .with_context(|| format!("Failed to decode image: {:?}", path))
}

/// Decode `path`, convert to luminance and remove the mean
pub fn load_intensity_field(path: &Path) -> Result<IntensityField> {
    let img = load_image(path)?;
    IntensityField::from_luma(&img.to_luma8())
        .with_context(|| format!("Unusable image: {:?}", path))
}

/// Rotate `img` counter-clockwise by `rotation_degrees` about its center
pub fn render_deskewed(img: &DynamicImage, rotation_degrees: f64) -> RgbaImage {
    let rgba = img.to_rgba8();
    // imageproc rotates clockwise for positive angles
    let theta = -(rotation_degrees.to_radians()) as f32;
    rotate_about_center(&rgba, theta, Interpolation::Bilinear, BACKGROUND)
}

/// Normalize the projection matrix to [0, 255]; one image row per angle
pub fn sinogram_image(matrix: &ProjectionMatrix) -> GrayImage {
    let data = matrix.as_matrix();
    let (offsets, angles) = data.shape();
    let (min, max) = (data.min(), data.max());
    let range = max - min;

    GrayImage::from_fn(offsets as u32, angles as u32, |x, y| {
        let value = data[(x as usize, y as usize)];
        let level = if range > 0.0 {
            (value - min) / range * 255.0
        } else {
            0.0
        };
        Luma([level.round().clamp(0.0, 255.0) as u8])
    })
}

pub fn save_sinogram(matrix: &ProjectionMatrix, path: &Path) -> Result<()> {
    sinogram_image(matrix)
        .save(path)
        .with_context(|| format!("Failed to save sinogram: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    #[test]
    fn test_sinogram_image_layout_and_range() {
        let data = DMatrix::from_fn(6, 3, |r, c| (r + 10 * c) as f64);
        let img = sinogram_image(&ProjectionMatrix::from_matrix(data));

        // Width follows offsets, height follows angles
        assert_eq!(img.dimensions(), (6, 3));
        assert_eq!(img.get_pixel(0, 0)[0], 0);
        assert_eq!(img.get_pixel(5, 2)[0], 255);
    }

    #[test]
    fn test_sinogram_image_flat_matrix() {
        let img = sinogram_image(&ProjectionMatrix::from_matrix(DMatrix::from_element(4, 4, 7.0)));
        assert!(img.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_render_keeps_dimensions() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 10, Rgba([0, 0, 0, 255])));

        let level = render_deskewed(&img, 0.0);
        assert_eq!(level.dimensions(), (20, 10));
        assert_eq!(level.get_pixel(10, 5)[0], 0);

        let turned = render_deskewed(&img, 30.0);
        assert_eq!(turned.dimensions(), (20, 10));
        // Corners are uncovered after a 30 degree turn
        assert_eq!(*turned.get_pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(load_intensity_field(Path::new("does/not/exist.png")).is_err());
    }
}
