use log::debug;

use crate::error::{EstimateError, Result};
use crate::field::IntensityField;
use crate::geometry::AngleSet;
use crate::projection::{project, ProjectionExtent, ProjectionMatrix};
use crate::spectrum::{estimate_spacing, SpacingConfig, Spectrum};

/// RMS of each projection column, one entry per angle
pub type DispersionVector = Vec<f64>;

/// Tunables for the full estimation pipeline
#[derive(Debug, Clone, Default)]
pub struct EstimatorConfig {
    /// Candidate projection angles (default: 0..179 in one-degree steps)
    pub angles: AngleSet,
    /// How projections cover the field (default: diagonal padding)
    pub extent: ProjectionExtent,
    /// Window and peak search for the spacing stage
    pub spacing: SpacingConfig,
}

/// Final result of the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct SkewEstimate {
    /// Counter-clockwise rotation that levels the text lines, `90 - angle`
    pub rotation_degrees: f64,
    /// Distance between text lines in pixels
    pub line_spacing: f64,
    /// Index of the selected angle in the angle set
    pub angle_index: usize,
    /// Dominant spectral bin of the selected projection
    pub frequency_index: usize,
}

/// Estimate plus the intermediates it was derived from
#[derive(Debug, Clone)]
pub struct Analysis {
    pub estimate: SkewEstimate,
    pub angles: AngleSet,
    pub sinogram: ProjectionMatrix,
    pub dispersion: DispersionVector,
    pub spectrum: Spectrum,
}

/// Root-mean-square of `values`; zero for an empty slice
pub fn rms(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| v * v).sum();
    (sum_sq / values.len() as f64).sqrt()
}

/// Pick the "busiest" projection: the column with the largest RMS.
///
/// At the angle aligned with the text baselines the projection alternates
/// between dense text rows and empty gaps, which maximizes its RMS. Ties go
/// to the lowest index, so an all-zero matrix selects column 0.
pub fn select_angle(matrix: &ProjectionMatrix) -> Result<(usize, DispersionVector)> {
    if matrix.angles() == 0 {
        return Err(EstimateError::invalid("projection matrix has no columns"));
    }
    if matrix.offsets() == 0 {
        return Err(EstimateError::invalid("projection matrix has no rows"));
    }

    // Storage is column-major, so each chunk is one angle's projection
    let dispersion: DispersionVector = matrix
        .as_matrix()
        .as_slice()
        .chunks_exact(matrix.offsets())
        .map(rms)
        .collect();

    let mut best = 0;
    for (i, &value) in dispersion.iter().enumerate().skip(1) {
        if value > dispersion[best] {
            best = i;
        }
    }

    Ok((best, dispersion))
}

/// Run projection, angle selection and spacing estimation on `field`
pub fn estimate_skew(field: &IntensityField, config: &EstimatorConfig) -> Result<Analysis> {
    let sinogram = project(field, &config.angles, config.extent)?;

    let (angle_index, dispersion) = select_angle(&sinogram)?;
    let rotation_degrees = config
        .angles
        .reported_rotation(angle_index)
        .ok_or_else(|| EstimateError::invalid("selected angle index is out of range"))?;

    debug!(
        "Busiest projection: index {} (angle {:.2}°, rms {:.3}) -> rotation {:.2}°",
        angle_index,
        config.angles.get(angle_index).unwrap_or_default(),
        dispersion[angle_index],
        rotation_degrees
    );

    let row = sinogram
        .column(angle_index)
        .ok_or_else(|| EstimateError::invalid("selected angle index is out of range"))?;
    let spacing = estimate_spacing(&row, &config.spacing)?;

    let estimate = SkewEstimate {
        rotation_degrees,
        line_spacing: spacing.spacing,
        angle_index,
        frequency_index: spacing.frequency_index,
    };

    Ok(Analysis {
        estimate,
        angles: config.angles.clone(),
        sinogram,
        dispersion,
        spectrum: spacing.spectrum,
    })
}
