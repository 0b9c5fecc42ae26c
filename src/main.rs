use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use radon_deskew::{estimate_skew, load_image, render_deskewed, save_sinogram, Cli, IntensityField};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load input image and convert to a centered luminance field
    let img = load_image(&cli.image)?;
    debug!("Loaded image: {:?} ({}x{})", cli.image, img.width(), img.height());

    let field = IntensityField::from_luma(&img.to_luma8())
        .with_context(|| format!("Unusable image: {:?}", cli.image))?;

    let config = cli
        .estimator_config()
        .context("Invalid estimator configuration")?;
    debug!(
        "Sweeping {} angles, extent {:?}, window {:?}, peak search {:?}",
        config.angles.len(),
        config.extent,
        config.spacing.window,
        config.spacing.peak
    );

    let analysis = estimate_skew(&field, &config).context("Failed to estimate skew")?;
    let estimate = &analysis.estimate;

    println!("Rotation: {:.2} degrees", estimate.rotation_degrees);
    println!("Line spacing: {:.2} pixels", estimate.line_spacing);

    if let Some(path) = &cli.sinogram {
        save_sinogram(&analysis.sinogram, path)?;
        info!(
            "Saved sinogram: {:?} ({} offsets x {} angles)",
            path,
            analysis.sinogram.offsets(),
            analysis.sinogram.angles()
        );
    }

    if let Some(path) = &cli.output {
        let deskewed = render_deskewed(&img, estimate.rotation_degrees);
        deskewed
            .save(path)
            .with_context(|| format!("Failed to save output: {:?}", path))?;
        info!("Saved deskewed image: {:?}", path);
    }

    Ok(())
}
