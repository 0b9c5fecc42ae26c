//! Directional projections (a discrete Radon transform) of an intensity field.
//!
//! Each angle produces one column: the field is sampled on a square grid
//! rotated by that angle and the samples are summed along grid columns. All
//! columns share the grid side length, so offsets line up across angles.

use log::debug;
use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::error::{EstimateError, Result};
use crate::field::IntensityField;
use crate::geometry::{ray_grid_matrix, transform_point, AngleSet};

/// One column of the projection matrix
pub type ProjectionRow = Vec<f64>;

/// How the projection grid covers the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionExtent {
    /// Zero-pad the field into a square of side ceil(sqrt(2) * max(rows, cols))
    /// so every ray through the field is captured at every angle
    #[default]
    Diagonal,
    /// Center-crop to a min(rows, cols) square and ignore samples outside its
    /// inscribed circle
    Inscribed,
}

/// Projection values indexed by (offset, angle); one column per angle
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionMatrix {
    data: DMatrix<f64>,
}

impl ProjectionMatrix {
    pub fn from_matrix(data: DMatrix<f64>) -> Self {
        Self { data }
    }

    /// Number of offsets (rows)
    pub fn offsets(&self) -> usize {
        self.data.nrows()
    }

    /// Number of angles (columns)
    pub fn angles(&self) -> usize {
        self.data.ncols()
    }

    pub fn column(&self, index: usize) -> Option<ProjectionRow> {
        (index < self.angles()).then(|| self.data.column(index).iter().copied().collect())
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.data
    }
}

/// Placement of the field inside the square projection grid
#[derive(Debug, Clone, Copy)]
struct GridFrame {
    side: usize,
    /// Grid coordinate minus field coordinate, per axis
    offset_x: f64,
    offset_y: f64,
    /// Squared radius outside which samples are ignored
    radius_sq: Option<f64>,
}

impl GridFrame {
    fn for_field(field: &IntensityField, extent: ProjectionExtent) -> Self {
        let (rows, cols) = (field.rows(), field.cols());
        match extent {
            ProjectionExtent::Diagonal => {
                let side = (std::f64::consts::SQRT_2 * rows.max(cols) as f64).ceil() as usize;
                Self {
                    side,
                    offset_x: (side / 2) as f64 - (cols / 2) as f64,
                    offset_y: (side / 2) as f64 - (rows / 2) as f64,
                    radius_sq: None,
                }
            }
            ProjectionExtent::Inscribed => {
                let side = rows.min(cols);
                let crop_x = (cols - side).div_ceil(2);
                let crop_y = (rows - side).div_ceil(2);
                let radius = (side / 2) as f64;
                Self {
                    side,
                    offset_x: -(crop_x as f64),
                    offset_y: -(crop_y as f64),
                    radius_sq: Some(radius * radius),
                }
            }
        }
    }

    fn center(&self) -> f64 {
        (self.side / 2) as f64
    }
}

/// Project `field` at every angle of `angles`.
///
/// Returns a matrix with one row per offset and one column per angle. Angles
/// are processed in parallel; each column is written by exactly one task, so
/// the result does not depend on scheduling.
pub fn project(
    field: &IntensityField,
    angles: &AngleSet,
    extent: ProjectionExtent,
) -> Result<ProjectionMatrix> {
    if angles.is_empty() {
        return Err(EstimateError::invalid("angle set is empty"));
    }

    let frame = GridFrame::for_field(field, extent);
    if frame.side < 2 {
        return Err(EstimateError::invalid(format!(
            "projection grid side {} is too small",
            frame.side
        )));
    }

    debug!(
        "Projecting {}x{} field at {} angles ({:?}, {} offsets)",
        field.rows(),
        field.cols(),
        angles.len(),
        extent,
        frame.side
    );

    let columns: Vec<ProjectionRow> = angles
        .as_slice()
        .par_iter()
        .map(|&theta| project_angle(field, &frame, theta))
        .collect();

    let data = DMatrix::from_iterator(frame.side, angles.len(), columns.into_iter().flatten());
    Ok(ProjectionMatrix::from_matrix(data))
}

/// Project with the default extent
pub fn project_default(field: &IntensityField, angles: &AngleSet) -> Result<ProjectionMatrix> {
    project(field, angles, ProjectionExtent::default())
}

fn project_angle(field: &IntensityField, frame: &GridFrame, theta_degrees: f64) -> ProjectionRow {
    let side = frame.side;
    let center = frame.center();
    let matrix = ray_grid_matrix(theta_degrees, center);
    // Moving one step along a ray
    let (step_x, step_y) = (matrix[(0, 1)], matrix[(1, 1)]);

    (0..side)
        .map(|x| {
            let (start_x, start_y) = transform_point(&matrix, x as f64, 0.0);
            let u = x as f64 - center;

            (0..side)
                .filter(|&y| match frame.radius_sq {
                    Some(r2) => {
                        let v = y as f64 - center;
                        u * u + v * v <= r2
                    }
                    None => true,
                })
                .map(|y| {
                    let t = y as f64;
                    let grid_x = start_x + t * step_x;
                    let grid_y = start_y + t * step_y;
                    field.sample_bilinear(grid_x - frame.offset_x, grid_y - frame.offset_y)
                })
                .sum::<f64>()
        })
        .collect()
}
