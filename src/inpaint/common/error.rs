use thiserror::Error;

#[derive(Error, Debug)]
pub enum InpaintError {
    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Mask is {mask_width}x{mask_height} but image is {image_width}x{image_height}")]
    DimensionMismatch {
        image_width: usize,
        image_height: usize,
        mask_width: usize,
        mask_height: usize,
    },

    #[error("Patch radius {radius} is invalid for a {width}x{height} image")]
    InvalidPatchRadius {
        radius: usize,
        width: usize,
        height: usize,
    },

    #[error("Mask must have exactly one channel, got {0}")]
    MaskChannels(usize),

    #[error("Sample buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, InpaintError>;
