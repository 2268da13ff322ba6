use std::slice::ChunksExact;

use crate::inpaint::common::error::{InpaintError, Result};
use crate::inpaint::raster::types::ChannelKind;

/// Row-major, channel-interleaved 8-bit pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub(super) width: usize,
    pub(super) height: usize,
    pub(super) kinds: Vec<ChannelKind>,
    pub(super) samples: Vec<u8>,
}

impl Raster {
    /// Creates a zero-filled raster.
    pub fn new(width: usize, height: usize, kinds: &[ChannelKind]) -> Self {
        Self {
            width,
            height,
            kinds: kinds.to_vec(),
            samples: vec![0; width * height * kinds.len()],
        }
    }

    /// Wraps an existing sample buffer.
    ///
    /// # Errors
    ///
    /// * `InpaintError::UnsupportedFormat` - no channels were given
    /// * `InpaintError::BufferSize` - `samples` does not hold exactly `width * height * kinds.len()` bytes
    pub fn from_samples(
        width: usize,
        height: usize,
        kinds: &[ChannelKind],
        samples: Vec<u8>,
    ) -> Result<Self> {
        if kinds.is_empty() {
            return Err(InpaintError::UnsupportedFormat(
                "raster needs at least one channel".to_string(),
            ));
        }
        let expected = width * height * kinds.len();
        if samples.len() != expected {
            return Err(InpaintError::BufferSize {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            kinds: kinds.to_vec(),
            samples,
        })
    }

    /// Single-channel mask raster, `true` cells stored as 255.
    pub fn from_mask_fn(width: usize, height: usize, is_hole: impl Fn(usize, usize) -> bool) -> Self {
        let mut mask = Self::new(width, height, ChannelKind::GRAY);
        for y in 0..height {
            for x in 0..width {
                if is_hole(x, y) {
                    mask.samples[y * width + x] = u8::MAX;
                }
            }
        }
        mask
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channel_count(&self) -> usize {
        self.kinds.len()
    }

    pub fn channel_kinds(&self) -> &[ChannelKind] {
        &self.kinds
    }

    pub fn is_color(&self, channel: usize) -> bool {
        self.kinds[channel].is_color()
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * self.kinds.len()
    }

    /// Raw channel bytes of one pixel.
    pub fn pixel_bytes(&self, x: usize, y: usize) -> &[u8] {
        let start = self.offset(x, y);
        &self.samples[start..start + self.kinds.len()]
    }

    pub fn pixel_bytes_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let start = self.offset(x, y);
        let channels = self.kinds.len();
        &mut self.samples[start..start + channels]
    }

    /// Channel values of one pixel normalized to `[0, 1]`.
    pub fn pixel(&self, x: usize, y: usize) -> Vec<f32> {
        self.pixel_bytes(x, y)
            .iter()
            .map(|&v| v as f32 / u8::MAX as f32)
            .collect()
    }

    /// Writes normalized channel values, clamping to `[0, 1]`.
    pub fn set_pixel(&mut self, x: usize, y: usize, values: &[f32]) {
        for (dst, &v) in self.pixel_bytes_mut(x, y).iter_mut().zip(values) {
            *dst = (v.clamp(0.0, 1.0) * u8::MAX as f32).round() as u8;
        }
    }

    /// Sequential row-major iteration over raw row bytes.
    pub fn rows(&self) -> ChunksExact<'_, u8> {
        self.samples.chunks_exact((self.width * self.kinds.len()).max(1))
    }

    /// Binarizes a single-channel raster: samples above `threshold` become 255, others 0.
    pub fn threshold(&self, threshold: u8) -> Self {
        Self {
            width: self.width,
            height: self.height,
            kinds: self.kinds.clone(),
            samples: self
                .samples
                .iter()
                .map(|&v| if v > threshold { u8::MAX } else { 0 })
                .collect(),
        }
    }
}
