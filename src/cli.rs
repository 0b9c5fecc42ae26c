use clap::Parser;
use std::path::PathBuf;

use crate::detection::EstimatorConfig;
use crate::error::Result;
use crate::geometry::{AngleSet, DEFAULT_ANGLE_STEP};
use crate::projection::ProjectionExtent;
use crate::spectrum::{PeakSearch, SpacingConfig, WindowFunction};

#[derive(Parser, Debug)]
#[command(name = "radon-deskew")]
#[command(version, about = "Detect rotation and line spacing of an image of text using a Radon transform")]
pub struct Cli {
    /// Input image path
    #[arg(short, long, required = true)]
    pub image: PathBuf,

    /// Angular resolution of the projection sweep in degrees
    #[arg(long, default_value_t = DEFAULT_ANGLE_STEP, value_parser = parse_angle_step)]
    pub angle_step: f64,

    /// Tapering window for the spectrum (blackman, hann, hamming, rectangular)
    #[arg(long, default_value = "blackman", value_parser = parse_window)]
    pub window: WindowFunction,

    /// Projection coverage (diagonal, inscribed)
    #[arg(long, default_value = "diagonal", value_parser = parse_extent)]
    pub extent: ProjectionExtent,

    /// Let the zero-frequency bin win the spacing peak search
    #[arg(long)]
    pub include_dc: bool,

    /// Save the deskewed image to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Save the sinogram (projection matrix) as an image
    #[arg(long)]
    pub sinogram: Option<PathBuf>,

    /// Show pipeline details
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn estimator_config(&self) -> Result<EstimatorConfig> {
        let peak = if self.include_dc {
            PeakSearch::IncludeDc
        } else {
            PeakSearch::ExcludeDc
        };

        Ok(EstimatorConfig {
            angles: AngleSet::uniform(self.angle_step)?,
            extent: self.extent,
            spacing: SpacingConfig {
                window: self.window,
                peak,
            },
        })
    }
}

fn parse_angle_step(s: &str) -> std::result::Result<f64, String> {
    let step: f64 = s
        .parse()
        .map_err(|_| format!("Invalid angle step: {}", s))?;

    if !step.is_finite() || step <= 0.0 || step > 180.0 {
        return Err("Angle step must be in (0, 180]".to_string());
    }

    Ok(step)
}

fn parse_window(s: &str) -> std::result::Result<WindowFunction, String> {
    match s.to_ascii_lowercase().as_str() {
        "blackman" => Ok(WindowFunction::Blackman),
        "hann" | "hanning" => Ok(WindowFunction::Hann),
        "hamming" => Ok(WindowFunction::Hamming),
        "rectangular" | "none" => Ok(WindowFunction::Rectangular),
        _ => Err(format!(
            "Unknown window '{}', expected blackman, hann, hamming or rectangular",
            s
        )),
    }
}

fn parse_extent(s: &str) -> std::result::Result<ProjectionExtent, String> {
    match s.to_ascii_lowercase().as_str() {
        "diagonal" => Ok(ProjectionExtent::Diagonal),
        "inscribed" | "circle" => Ok(ProjectionExtent::Inscribed),
        _ => Err(format!("Unknown extent '{}', expected diagonal or inscribed", s)),
    }
}
