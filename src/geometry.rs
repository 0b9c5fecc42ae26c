use nalgebra::{Matrix3, Vector3};

use crate::error::{EstimateError, Result};

/// Projections are taken over a half-turn; the other half mirrors it
pub const HALF_TURN_DEGREES: f64 = 180.0;

/// Default angular resolution of the sweep (degrees)
pub const DEFAULT_ANGLE_STEP: f64 = 1.0;

/// Rotations are reported relative to a vertical reference
const REFERENCE_ANGLE_DEGREES: f64 = 90.0;

/// Ordered set of candidate projection angles in degrees, each in [0, 180)
#[derive(Debug, Clone, PartialEq)]
pub struct AngleSet {
    angles: Vec<f64>,
}

impl AngleSet {
    /// Validate an arbitrary set of angles.
    ///
    /// The set must be non-empty, every angle finite and in [0, 180), and no
    /// angle may appear twice. Order is preserved.
    pub fn new(angles: Vec<f64>) -> Result<Self> {
        if angles.is_empty() {
            return Err(EstimateError::invalid("angle set is empty"));
        }

        for (i, &angle) in angles.iter().enumerate() {
            if !angle.is_finite() || !(0.0..HALF_TURN_DEGREES).contains(&angle) {
                return Err(EstimateError::invalid(format!(
                    "angle {} at position {} is outside [0, 180)",
                    angle, i
                )));
            }
            if angles[..i].contains(&angle) {
                return Err(EstimateError::invalid(format!(
                    "angle {} appears more than once",
                    angle
                )));
            }
        }

        Ok(Self { angles })
    }

    /// Evenly spaced sweep 0, step, 2*step, ... below 180
    pub fn uniform(step_degrees: f64) -> Result<Self> {
        if !step_degrees.is_finite() || step_degrees <= 0.0 || step_degrees > HALF_TURN_DEGREES {
            return Err(EstimateError::invalid(format!(
                "angle step {} must be in (0, 180]",
                step_degrees
            )));
        }

        let angles: Vec<f64> = (0..)
            .map(|k| k as f64 * step_degrees)
            .take_while(|&angle| angle < HALF_TURN_DEGREES - 1e-9)
            .collect();

        Self::new(angles)
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.angles
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.angles.get(index).copied()
    }

    /// Rotation to report for the projection at `index`: `90 - angle`.
    ///
    /// For the canonical one-degree sweep this is `90 - index`. Rotating the
    /// page counter-clockwise by this amount levels its text lines.
    pub fn reported_rotation(&self, index: usize) -> Option<f64> {
        self.get(index).map(|angle| REFERENCE_ANGLE_DEGREES - angle)
    }
}

impl Default for AngleSet {
    /// One-degree sweep 0, 1, ..., 179
    fn default() -> Self {
        Self {
            angles: (0..180).map(f64::from).collect(),
        }
    }
}

/// Affine map from the projection grid to sampling coordinates for one angle
///
/// The grid is rotated by `theta` about `(center, center)`:
///
/// x_in = c + (x - c) cos θ + (y - c) sin θ
/// y_in = c - (x - c) sin θ + (y - c) cos θ
///
/// Summing samples along grid columns (varying y) integrates along rays at θ.
pub fn ray_grid_matrix(theta_degrees: f64, center: f64) -> Matrix3<f64> {
    let (sin_t, cos_t) = theta_degrees.to_radians().sin_cos();

    let translate_to_origin = Matrix3::new(
        1.0, 0.0, -center,
        0.0, 1.0, -center,
        0.0, 0.0, 1.0,
    );

    let rotate = Matrix3::new(
        cos_t, sin_t, 0.0,
        -sin_t, cos_t, 0.0,
        0.0, 0.0, 1.0,
    );

    let translate_back = Matrix3::new(
        1.0, 0.0, center,
        0.0, 1.0, center,
        0.0, 0.0, 1.0,
    );

    translate_back * rotate * translate_to_origin
}

/// Transform a point using the affine matrix
pub fn transform_point(matrix: &Matrix3<f64>, x: f64, y: f64) -> (f64, f64) {
    let p = Vector3::new(x, y, 1.0);
    let result = matrix * p;
    (result.x / result.z, result.y / result.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_canonical_sweep() {
        let angles = AngleSet::default();
        assert_eq!(angles.len(), 180);
        assert_eq!(angles.get(0), Some(0.0));
        assert_eq!(angles.get(179), Some(179.0));
        assert_eq!(angles, AngleSet::uniform(DEFAULT_ANGLE_STEP).unwrap());
    }

    #[test]
    fn test_reported_rotation_offset() {
        let angles = AngleSet::default();
        assert_eq!(angles.reported_rotation(90), Some(0.0));
        assert_eq!(angles.reported_rotation(0), Some(90.0));
        assert_eq!(angles.reported_rotation(100), Some(-10.0));
        assert_eq!(angles.reported_rotation(180), None);
    }

    #[test]
    fn test_uniform_fractional_step() {
        let angles = AngleSet::uniform(0.5).unwrap();
        assert_eq!(angles.len(), 360);
        assert_eq!(angles.get(359), Some(179.5));

        let coarse = AngleSet::uniform(7.0).unwrap();
        assert_eq!(coarse.len(), 26);
    }

    #[test]
    fn test_rejects_invalid_sets() {
        assert!(AngleSet::new(vec![]).is_err());
        assert!(AngleSet::new(vec![0.0, 180.0]).is_err());
        assert!(AngleSet::new(vec![-1.0]).is_err());
        assert!(AngleSet::new(vec![f64::NAN]).is_err());
        assert!(AngleSet::new(vec![10.0, 20.0, 10.0]).is_err());
        assert!(AngleSet::uniform(0.0).is_err());
        assert!(AngleSet::uniform(-2.0).is_err());
    }

    #[test]
    fn test_ray_grid_identity_at_zero() {
        let matrix = ray_grid_matrix(0.0, 10.0);
        let (x, y) = transform_point(&matrix, 3.0, 7.0);
        assert!((x - 3.0).abs() < 1e-12);
        assert!((y - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_ray_grid_quarter_turn_walks_rows() {
        // At 90 degrees a grid column sweeps along an image row
        let matrix = ray_grid_matrix(90.0, 10.0);
        let (x0, y0) = transform_point(&matrix, 4.0, 0.0);
        let (x1, y1) = transform_point(&matrix, 4.0, 1.0);
        assert!((y0 - 16.0).abs() < 1e-9);
        assert!((y1 - y0).abs() < 1e-9);
        assert!((x1 - x0 - 1.0).abs() < 1e-9);
    }
}
