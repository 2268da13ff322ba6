//! Common utilities module
//!
//! This module contains shared utilities used across the inpainting engine.

pub mod error;

pub use error::{InpaintError, Result};
