use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

use crate::inpaint::raster::buffer::Raster;
use crate::inpaint::raster::types::ChannelKind;

impl Raster {
    /// Bilinear resample to `width x height`, sampling at pixel centres.
    ///
    /// Every channel (alpha included) is interpolated the same way. Layouts
    /// other than gray, RGB and RGBA are resized one channel at a time.
    pub fn resample_bilinear(&self, width: usize, height: usize) -> Raster {
        let mut out = Raster::new(width, height, self.channel_kinds());
        if self.width() == 0 || self.height() == 0 || width == 0 || height == 0 {
            return out;
        }

        let (sw, sh) = (self.width() as u32, self.height() as u32);
        let (w, h) = (width as u32, height as u32);
        let kinds = self.channel_kinds();

        if kinds == ChannelKind::GRAY {
            let src = GrayImage::from_fn(sw, sh, |x, y| Luma([self.pixel_bytes(x as usize, y as usize)[0]]));
            out.samples = imageops::resize(&src, w, h, FilterType::Triangle).into_raw();
        } else if kinds == ChannelKind::RGB {
            let src = RgbImage::from_fn(sw, sh, |x, y| {
                let p = self.pixel_bytes(x as usize, y as usize);
                Rgb([p[0], p[1], p[2]])
            });
            out.samples = imageops::resize(&src, w, h, FilterType::Triangle).into_raw();
        } else if kinds == ChannelKind::RGBA {
            let src = RgbaImage::from_fn(sw, sh, |x, y| {
                let p = self.pixel_bytes(x as usize, y as usize);
                Rgba([p[0], p[1], p[2], p[3]])
            });
            out.samples = imageops::resize(&src, w, h, FilterType::Triangle).into_raw();
        } else {
            let channels = self.channel_count();
            for c in 0..channels {
                let plane = GrayImage::from_fn(sw, sh, |x, y| Luma([self.pixel_bytes(x as usize, y as usize)[c]]));
                let resized = imageops::resize(&plane, w, h, FilterType::Triangle);
                for (i, v) in resized.into_raw().into_iter().enumerate() {
                    out.samples[i * channels + c] = v;
                }
            }
        }

        out
    }
}
