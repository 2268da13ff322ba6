//! Pixel raster module
//!
//! This module provides the 8-bit interleaved pixel buffer the engine works on,
//! together with resampling, weighted colour mixing and `image` crate interop.

mod buffer;
mod convert;
mod mix;
mod resample;
pub mod types;

pub use buffer::Raster;
pub use mix::{MIX_WEIGHT_TOTAL, mix_weighted};
pub use types::ChannelKind;
