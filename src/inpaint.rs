//! PatchMatch inpainting module
//!
//! This module fills masked regions of an image with content synthesized from
//! the rest of the image, using a coarse-to-fine PatchMatch search and
//! patch-vote reconstruction.

pub mod common;
pub mod config;
pub mod em;
pub mod masked_image;
pub mod nnf;
pub mod observer;
pub mod pipeline;
pub mod pyramid;
pub mod raster;
pub mod timing;

#[cfg(test)]
mod tests;

pub use common::{InpaintError, Result};

pub use config::{InpaintConfig, InpaintConfigBuilder};

pub use masked_image::MaskedImage;

pub use nnf::{Correspondence, MAX_DIST, NearestNeighborField, SimilarityTable};

pub use observer::{LevelObserver, NoopObserver};

pub use pipeline::Inpaint;

pub use pyramid::Pyramid;

pub use raster::{ChannelKind, Raster};

pub use timing::{InpaintTimings, StepTiming, Timer};
