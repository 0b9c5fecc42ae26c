//! Zero-centered luminance samples consumed by the projector.

use image::GrayImage;
use nalgebra::DMatrix;

use crate::error::{EstimateError, Result};

/// Smallest number of rows and columns a field may have
pub const MIN_FIELD_DIM: usize = 2;

/// Page luminance with its global mean removed, indexed as (row, column)
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityField {
    data: DMatrix<f64>,
}

impl IntensityField {
    /// Wrap an already-centered matrix after validating its shape and samples
    pub fn new(data: DMatrix<f64>) -> Result<Self> {
        let (rows, cols) = data.shape();
        if rows < MIN_FIELD_DIM || cols < MIN_FIELD_DIM {
            return Err(EstimateError::invalid(format!(
                "intensity field is {}x{}, need at least {}x{}",
                rows, cols, MIN_FIELD_DIM, MIN_FIELD_DIM
            )));
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(EstimateError::invalid(
                "intensity field contains non-finite samples",
            ));
        }

        Ok(Self { data })
    }

    /// Subtract the global mean from `data`, then validate it
    pub fn centered(mut data: DMatrix<f64>) -> Result<Self> {
        if !data.is_empty() {
            let mean = data.mean();
            data.add_scalar_mut(-mean);
        }
        Self::new(data)
    }

    /// Build a centered field from 8-bit luminance
    pub fn from_luma(gray: &GrayImage) -> Result<Self> {
        let (width, height) = gray.dimensions();
        let data = DMatrix::from_fn(height as usize, width as usize, |row, col| {
            gray.get_pixel(col as u32, row as u32)[0] as f64
        });
        Self::centered(data)
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Bilinear sample at column `x`, row `y`; the field is zero outside its bounds
    pub fn sample_bilinear(&self, x: f64, y: f64) -> f64 {
        let (rows, cols) = self.data.shape();
        if !(x > -1.0 && y > -1.0 && x < cols as f64 && y < rows as f64) {
            return 0.0;
        }

        let x0 = x.floor() as isize;
        let y0 = y.floor() as isize;
        let x_frac = x - x0 as f64;
        let y_frac = y - y0 as f64;

        let get_pixel = |px: isize, py: isize| -> f64 {
            if px < 0 || py < 0 || px as usize >= cols || py as usize >= rows {
                0.0
            } else {
                self.data[(py as usize, px as usize)]
            }
        };

        let p00 = get_pixel(x0, y0);
        let p10 = get_pixel(x0 + 1, y0);
        let p01 = get_pixel(x0, y0 + 1);
        let p11 = get_pixel(x0 + 1, y0 + 1);

        let top = p00 * (1.0 - x_frac) + p10 * x_frac;
        let bottom = p01 * (1.0 - x_frac) + p11 * x_frac;
        top * (1.0 - y_frac) + bottom * y_frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use image::Luma;

    #[test]
    fn test_rejects_degenerate_shapes() {
        assert!(IntensityField::new(DMatrix::zeros(1, 10)).is_err());
        assert!(IntensityField::new(DMatrix::zeros(10, 1)).is_err());
        assert!(IntensityField::new(DMatrix::zeros(0, 0)).is_err());
        assert!(IntensityField::centered(DMatrix::zeros(0, 0)).is_err());
        assert!(IntensityField::new(DMatrix::zeros(2, 2)).is_ok());
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut data = DMatrix::zeros(4, 4);
        data[(1, 2)] = f64::NAN;
        assert!(matches!(
            IntensityField::new(data),
            Err(EstimateError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_luma_is_zero_mean() {
        let mut gray = GrayImage::from_pixel(8, 4, Luma([255]));
        for x in 0..8 {
            gray.put_pixel(x, 1, Luma([0]));
        }
        let field = IntensityField::from_luma(&gray).unwrap();

        assert_eq!((field.rows(), field.cols()), (4, 8));
        assert_abs_diff_eq!(field.as_matrix().mean(), 0.0, epsilon = 1e-9);
        // One dark row in four: mean is 191.25
        assert_abs_diff_eq!(field.as_matrix()[(1, 0)], -191.25, epsilon = 1e-9);
        assert_abs_diff_eq!(field.as_matrix()[(0, 0)], 63.75, epsilon = 1e-9);
    }

    #[test]
    fn test_bilinear_interior_and_outside() {
        let data = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 2.0, 3.0]);
        let field = IntensityField::new(data).unwrap();

        assert_abs_diff_eq!(field.sample_bilinear(0.0, 0.0), 0.0);
        assert_abs_diff_eq!(field.sample_bilinear(1.0, 1.0), 3.0);
        assert_abs_diff_eq!(field.sample_bilinear(0.5, 0.5), 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(field.sample_bilinear(5.0, 0.0), 0.0);
        // Half a pixel past the edge fades toward zero
        assert_abs_diff_eq!(field.sample_bilinear(1.5, 1.0), 1.5, epsilon = 1e-12);
    }
}
