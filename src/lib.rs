pub mod cli;
pub mod detection;
pub mod error;
pub mod field;
pub mod geometry;
pub mod io;
pub mod projection;
pub mod spectrum;

pub use cli::Cli;
pub use detection::{
    estimate_skew, rms, select_angle, Analysis, DispersionVector, EstimatorConfig, SkewEstimate,
};
pub use error::{EstimateError, Result};
pub use field::IntensityField;
pub use geometry::AngleSet;
pub use io::{load_image, load_intensity_field, render_deskewed, save_sinogram, sinogram_image};
pub use projection::{project, project_default, ProjectionExtent, ProjectionMatrix, ProjectionRow};
pub use spectrum::{
    dominant_frequency, estimate_spacing, make_window, spectrum, PeakSearch, SpacingConfig,
    SpacingEstimate, Spectrum, WindowFunction,
};
