use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use patchfill::inpaint::{Inpaint, InpaintConfig, Raster};
use patchfill::logger;

use tracing::info;

/// Fill the masked region of an image with content synthesized from the rest of it.
#[derive(Parser, Debug)]
#[command(name = "patchfill", version, about)]
struct Cli {
    /// Image to repair
    image: PathBuf,

    /// Mask image; pixels brighter than the threshold are filled
    mask: PathBuf,

    /// Where to write the result (format picked from the extension)
    output: PathBuf,

    /// Patch radius; the comparison window is 2 * radius + 1 pixels wide
    #[arg(short, long, default_value_t = 2)]
    radius: usize,

    /// Seed for reproducible output
    #[arg(short, long)]
    seed: Option<u64>,

    /// Mask luminance threshold
    #[arg(short, long, default_value_t = 127)]
    threshold: u8,

    /// Return the raw reconstruction instead of restoring pixels outside the mask
    #[arg(long)]
    keep_raw: bool,

    /// Print a per-phase timing table
    #[arg(long)]
    timings: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        logger::init_with_default("debug");
    } else {
        logger::init();
    }

    info!("Starting patchfill...");

    let image = image::open(&cli.image)
        .with_context(|| format!("failed to open image {}", cli.image.display()))?;
    let mask = image::open(&cli.mask)
        .with_context(|| format!("failed to open mask {}", cli.mask.display()))?;

    let config = InpaintConfig::builder()
        .patch_radius(cli.radius)
        .seed(cli.seed)
        .mask_threshold(cli.threshold)
        .preserve_unmasked(!cli.keep_raw)
        .build();
    info!("Patch radius: {}", config.patch_radius);

    let mut inpaint = Inpaint::new(config);
    let (result, timings) = inpaint
        .patch_with_timings(&Raster::from_dynamic(&image), &Raster::from(&mask.to_luma8()))
        .context("inpainting failed")?;

    result
        .to_dynamic()?
        .save(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    if cli.timings {
        timings.print_summary();
    } else {
        timings.log_summary();
    }

    info!(output = %cli.output.display(), "Done");
    Ok(())
}
