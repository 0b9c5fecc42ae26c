//! Line spacing from the dominant frequency of a projection row.

use std::f64::consts::PI;

use log::debug;
use num_complex::Complex64;
use rustfft::FftPlanner;

use crate::error::{EstimateError, Result};

/// Magnitudes of the real-input DFT, bins 0 ..= N/2
pub type Spectrum = Vec<f64>;

/// A peak at or below this fraction of the row's absolute sum counts as no peak
const DEGENERATE_PEAK_RATIO: f64 = 1e-12;

/// Tapering window applied before the transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowFunction {
    /// Three-term Blackman window
    #[default]
    Blackman,
    /// Hann window (cosine-squared taper)
    Hann,
    /// Hamming window
    Hamming,
    /// No tapering
    Rectangular,
}

/// Which bins the dominant-frequency search considers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeakSearch {
    /// Skip bin 0 so residual offsets cannot win
    #[default]
    ExcludeDc,
    /// Search every bin, bin 0 included
    IncludeDc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpacingConfig {
    pub window: WindowFunction,
    pub peak: PeakSearch,
}

/// Output of the spacing stage
#[derive(Debug, Clone, PartialEq)]
pub struct SpacingEstimate {
    /// Pixels per text line
    pub spacing: f64,
    /// Index of the dominant bin (never 0)
    pub frequency_index: usize,
    pub spectrum: Spectrum,
}

/// Generate a symmetric window of `size` samples
pub fn make_window(kind: WindowFunction, size: usize) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }

    let n = size.saturating_sub(1) as f64;
    (0..size)
        .map(|i| {
            let phase = 2.0 * PI * i as f64 / n;
            match kind {
                WindowFunction::Blackman => {
                    0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
                }
                WindowFunction::Hann => 0.5 * (1.0 - phase.cos()),
                WindowFunction::Hamming => 0.54 - 0.46 * phase.cos(),
                WindowFunction::Rectangular => 1.0,
            }
        })
        .collect()
}

/// Magnitude spectrum of `row` after tapering with `window`.
///
/// The result has `row.len() / 2 + 1` bins.
pub fn spectrum(row: &[f64], window: WindowFunction) -> Result<Spectrum> {
    validate_row(row)?;

    let n = row.len();
    let taper = make_window(window, n);
    let mut buffer: Vec<Complex64> = row
        .iter()
        .zip(taper.iter())
        .map(|(&s, &w)| Complex64::new(s * w, 0.0))
        .collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    Ok(buffer[..n / 2 + 1].iter().map(|c| c.norm()).collect())
}

/// Index of the largest bin allowed by `peak`; ties go to the lowest index
pub fn dominant_frequency(spectrum: &[f64], peak: PeakSearch) -> Option<usize> {
    let start = match peak {
        PeakSearch::ExcludeDc => 1,
        PeakSearch::IncludeDc => 0,
    };

    let mut best: Option<(usize, f64)> = None;
    for (i, &magnitude) in spectrum.iter().enumerate().skip(start) {
        match best {
            Some((_, top)) if magnitude <= top => {}
            _ => best = Some((i, magnitude)),
        }
    }

    best.map(|(i, _)| i)
}

/// Estimate text line spacing (pixels) from a projection row.
///
/// Spacing is `N / k` where `k` is the dominant bin. A row with no usable
/// peak, or whose peak lands on bin 0, is rejected rather than producing an
/// infinite spacing.
pub fn estimate_spacing(row: &[f64], config: &SpacingConfig) -> Result<SpacingEstimate> {
    let spectrum = spectrum(row, config.window)?;
    let n = row.len();

    let frequency_index = dominant_frequency(&spectrum, config.peak).ok_or_else(|| {
        EstimateError::invalid(format!("row of {} samples has no non-zero frequency bin", n))
    })?;

    let scale: f64 = row.iter().map(|v| v.abs()).sum();
    if spectrum[frequency_index] <= DEGENERATE_PEAK_RATIO * scale {
        return Err(EstimateError::invalid(
            "projection row has no dominant frequency (flat spectrum)",
        ));
    }
    if frequency_index == 0 {
        return Err(EstimateError::invalid(
            "dominant frequency is the zero-frequency bin, line spacing is undefined",
        ));
    }

    let spacing = n as f64 / frequency_index as f64;
    debug!(
        "Dominant bin {} of {} ({} samples): spacing {:.2} px",
        frequency_index,
        spectrum.len(),
        n,
        spacing
    );

    Ok(SpacingEstimate {
        spacing,
        frequency_index,
        spectrum,
    })
}

fn validate_row(row: &[f64]) -> Result<()> {
    if row.len() < 2 {
        return Err(EstimateError::invalid(format!(
            "projection row has {} samples, need at least 2",
            row.len()
        )));
    }
    if row.iter().any(|v| !v.is_finite()) {
        return Err(EstimateError::invalid("projection row contains non-finite samples"));
    }
    Ok(())
}
