//! Conversions between `Raster` and the `image` crate buffer types.

use image::{DynamicImage, GrayImage, ImageBuffer, RgbImage, RgbaImage};

use crate::inpaint::common::error::{InpaintError, Result};
use crate::inpaint::raster::buffer::Raster;
use crate::inpaint::raster::types::ChannelKind;

// `image` buffers are length-checked on construction, so the layout is trusted here.
fn from_buffer((w, h): (u32, u32), kinds: &[ChannelKind], raw: &[u8]) -> Raster {
    Raster {
        width: w as usize,
        height: h as usize,
        kinds: kinds.to_vec(),
        samples: raw.to_vec(),
    }
}

impl From<&RgbaImage> for Raster {
    fn from(img: &RgbaImage) -> Self {
        from_buffer(img.dimensions(), ChannelKind::RGBA, img.as_raw())
    }
}

impl From<&RgbImage> for Raster {
    fn from(img: &RgbImage) -> Self {
        from_buffer(img.dimensions(), ChannelKind::RGB, img.as_raw())
    }
}

impl From<&GrayImage> for Raster {
    fn from(img: &GrayImage) -> Self {
        from_buffer(img.dimensions(), ChannelKind::GRAY, img.as_raw())
    }
}

impl Raster {
    /// Converts a decoded image, keeping an alpha channel only when the source has one.
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        match img {
            DynamicImage::ImageLuma8(gray) => Raster::from(gray),
            DynamicImage::ImageRgb8(rgb) => Raster::from(rgb),
            DynamicImage::ImageRgba8(rgba) => Raster::from(rgba),
            other if other.color().has_alpha() => Raster::from(&other.to_rgba8()),
            other => Raster::from(&other.to_rgb8()),
        }
    }

    /// Converts back into an `image` crate buffer.
    ///
    /// # Errors
    ///
    /// * `InpaintError::UnsupportedFormat` - the channel layout is not gray, RGB or RGBA
    pub fn to_dynamic(&self) -> Result<DynamicImage> {
        let (w, h) = (self.width() as u32, self.height() as u32);
        let samples = self.samples().to_vec();
        let kinds = self.channel_kinds();

        let image = if kinds == ChannelKind::GRAY {
            ImageBuffer::from_raw(w, h, samples).map(DynamicImage::ImageLuma8)
        } else if kinds == ChannelKind::RGB {
            ImageBuffer::from_raw(w, h, samples).map(DynamicImage::ImageRgb8)
        } else if kinds == ChannelKind::RGBA {
            ImageBuffer::from_raw(w, h, samples).map(DynamicImage::ImageRgba8)
        } else {
            None
        };

        image.ok_or_else(|| {
            InpaintError::UnsupportedFormat(format!("channel layout {:?}", kinds))
        })
    }
}
