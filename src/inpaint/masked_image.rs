//! Image + hole mask pair with dense caches for the matching inner loops.

use crate::inpaint::common::error::{InpaintError, Result};
use crate::inpaint::raster::{ChannelKind, MIX_WEIGHT_TOTAL, Raster, mix_weighted};

/// Equal quarter weights for the 2x2 box filter.
const BOX_WEIGHTS: [u32; 4] = [MIX_WEIGHT_TOTAL / 4; 4];

/// A colour raster paired with a same-sized hole mask.
///
/// Any nonzero mask sample marks a hole. Pixel samples and hole flags are
/// mirrored into flat caches which are rebuilt whenever a raster is replaced.
#[derive(Debug, Clone)]
pub struct MaskedImage {
    image: Raster,
    mask: Raster,
    pixels: Vec<u8>,
    holes: Vec<bool>,
}

impl MaskedImage {
    /// Pairs an image with a single-channel mask of identical dimensions.
    ///
    /// # Errors
    ///
    /// * `InpaintError::MaskChannels` - the mask is not single-channel
    /// * `InpaintError::DimensionMismatch` - mask and image sizes differ
    pub fn new(image: Raster, mask: Raster) -> Result<Self> {
        if mask.channel_count() != 1 {
            return Err(InpaintError::MaskChannels(mask.channel_count()));
        }
        if image.width() != mask.width() || image.height() != mask.height() {
            return Err(InpaintError::DimensionMismatch {
                image_width: image.width(),
                image_height: image.height(),
                mask_width: mask.width(),
                mask_height: mask.height(),
            });
        }
        Ok(Self::from_parts(image, mask))
    }

    fn from_parts(image: Raster, mask: Raster) -> Self {
        let mut masked = Self {
            image,
            mask,
            pixels: Vec::new(),
            holes: Vec::new(),
        };
        masked.recache();
        masked
    }

    fn recache(&mut self) {
        self.pixels.clear();
        self.pixels.reserve(self.image.samples().len());
        for row in self.image.rows() {
            self.pixels.extend_from_slice(row);
        }

        self.holes.clear();
        self.holes.reserve(self.mask.samples().len());
        for row in self.mask.rows() {
            self.holes.extend(row.iter().map(|&m| m != 0));
        }
    }

    pub fn width(&self) -> usize {
        self.image.width()
    }

    pub fn height(&self) -> usize {
        self.image.height()
    }

    pub fn channel_count(&self) -> usize {
        self.image.channel_count()
    }

    pub fn channel_kinds(&self) -> &[ChannelKind] {
        self.image.channel_kinds()
    }

    pub fn image(&self) -> &Raster {
        &self.image
    }

    pub fn mask(&self) -> &Raster {
        &self.mask
    }

    pub fn into_image(self) -> Raster {
        self.image
    }

    /// Cached samples, row-major and channel-interleaved.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let c = self.channel_count();
        let start = (y * self.width() + x) * c;
        &self.pixels[start..start + c]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, values: &[u8]) {
        let c = self.channel_count();
        let start = (y * self.width() + x) * c;
        self.pixels[start..start + c].copy_from_slice(values);
        self.image.pixel_bytes_mut(x, y).copy_from_slice(values);
    }

    /// Replaces every sample at once; `pixels` must match the current layout.
    pub(crate) fn replace_pixels(&mut self, pixels: Vec<u8>) {
        debug_assert_eq!(pixels.len(), self.pixels.len());
        self.image.samples_mut().copy_from_slice(&pixels);
        self.pixels = pixels;
    }

    /// Whether `(x, y)` is a hole. Coordinates must be in bounds.
    #[inline]
    pub fn is_masked(&self, x: usize, y: usize) -> bool {
        self.holes[y * self.width() + x]
    }

    pub fn set_masked(&mut self, x: usize, y: usize, hole: bool) {
        let idx = y * self.width() + x;
        self.holes[idx] = hole;
        self.mask.samples_mut()[idx] = if hole { u8::MAX } else { 0 };
    }

    pub fn count_masked(&self) -> usize {
        self.holes.iter().filter(|&&h| h).count()
    }

    pub fn clear_mask(&mut self) {
        self.mask.samples_mut().fill(0);
        self.holes.fill(false);
    }

    /// Halves both dimensions with a 2x2 box filter over image and mask.
    ///
    /// Odd trailing rows and columns are dropped, so the result is
    /// `floor(w / 2) x floor(h / 2)`. Leaves the image untouched when either
    /// halved dimension would be zero.
    pub fn downsample_half(&mut self) {
        let (w, h) = (self.width() / 2, self.height() / 2);
        if w < 1 || h < 1 {
            return;
        }
        let image = box_half(&self.image, w, h);
        let mask = box_half(&self.mask, w, h);
        self.image = image;
        self.mask = mask;
        self.recache();
    }

    /// Bilinearly resampled copy of image and mask at `width x height`.
    pub fn upscaled(&self, width: usize, height: usize) -> Self {
        Self::from_parts(
            self.image.resample_bilinear(width, height),
            self.mask.resample_bilinear(width, height),
        )
    }

    /// Sum of squared channel differences between `(x, y)` here and `(xo, yo)` in `other`.
    #[inline]
    pub fn distance(&self, x: usize, y: usize, other: &MaskedImage, xo: usize, yo: usize) -> u32 {
        self.pixel(x, y)
            .iter()
            .zip(other.pixel(xo, yo))
            .map(|(&a, &b)| {
                let d = a as i32 - b as i32;
                (d * d) as u32
            })
            .sum()
    }

    /// Copies every pixel that is not a hole in `original` back over this image.
    pub fn restore_unmasked_from(&mut self, original: &MaskedImage) {
        debug_assert_eq!(
            (self.width(), self.height()),
            (original.width(), original.height())
        );
        for y in 0..self.height() {
            for x in 0..self.width() {
                if !original.is_masked(x, y) {
                    self.set_pixel(x, y, original.pixel(x, y));
                }
            }
        }
    }
}

fn box_half(src: &Raster, width: usize, height: usize) -> Raster {
    let mut dst = Raster::new(width, height, src.channel_kinds());
    for y in 0..height {
        let (sy, sy1) = (2 * y, 2 * y + 1);
        for x in 0..width {
            let (sx, sx1) = (2 * x, 2 * x + 1);
            let quad = [
                src.pixel_bytes(sx, sy),
                src.pixel_bytes(sx1, sy),
                src.pixel_bytes(sx, sy1),
                src.pixel_bytes(sx1, sy1),
            ];
            mix_weighted(&quad, &BOX_WEIGHTS, dst.pixel_bytes_mut(x, y));
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> Raster {
        let mut samples = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            for x in 0..width {
                samples.extend_from_slice(&[(x * 10) as u8, (y * 10) as u8, 77]);
            }
        }
        Raster::from_samples(width, height, ChannelKind::RGB, samples).unwrap()
    }

    fn square_hole(width: usize, height: usize) -> Raster {
        Raster::from_mask_fn(width, height, |x, y| (2..4).contains(&x) && (2..4).contains(&y))
    }

    #[test]
    fn test_new_rejects_mismatched_mask() {
        let err = MaskedImage::new(gradient(4, 4), Raster::new(4, 5, ChannelKind::GRAY)).unwrap_err();
        assert!(matches!(err, InpaintError::DimensionMismatch { mask_height: 5, .. }));
    }

    #[test]
    fn test_new_rejects_multichannel_mask() {
        let err = MaskedImage::new(gradient(4, 4), gradient(4, 4)).unwrap_err();
        assert!(matches!(err, InpaintError::MaskChannels(3)));
    }

    #[test]
    fn test_count_masked_on_clone_and_clear() {
        let img = MaskedImage::new(gradient(6, 6), square_hole(6, 6)).unwrap();
        assert_eq!(img.count_masked(), 4);

        let mut copy = img.clone();
        assert_eq!(copy.count_masked(), img.count_masked());

        copy.clear_mask();
        assert_eq!(copy.count_masked(), 0);
        assert_eq!(img.count_masked(), 4);
    }

    #[test]
    fn test_downsample_halves_odd_dimensions() {
        let mut img = MaskedImage::new(gradient(7, 5), Raster::new(7, 5, ChannelKind::GRAY)).unwrap();
        img.downsample_half();
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!((img.mask().width(), img.mask().height()), (3, 2));
        // Average of x in {2, 3} -> 25, y in {0, 1} -> 5
        assert_eq!(img.pixel(1, 0), &[25, 5, 77]);
    }

    #[test]
    fn test_downsample_noop_when_too_small() {
        let mut img = MaskedImage::new(gradient(1, 8), Raster::new(1, 8, ChannelKind::GRAY)).unwrap();
        img.downsample_half();
        assert_eq!((img.width(), img.height()), (1, 8));
    }

    #[test]
    fn test_downsample_keeps_partial_holes() {
        let mask = Raster::from_mask_fn(4, 4, |x, y| x == 1 && y == 1);
        let mut img = MaskedImage::new(gradient(4, 4), mask).unwrap();
        img.downsample_half();
        assert!(img.is_masked(0, 0));
        assert_eq!(img.count_masked(), 1);
    }

    #[test]
    fn test_downsample_upscale_round_trip_dimensions() {
        let mut img = MaskedImage::new(gradient(9, 6), Raster::new(9, 6, ChannelKind::GRAY)).unwrap();
        img.downsample_half();
        assert_eq!((img.width(), img.height()), (4, 3));

        // Doubling loses the dropped odd column.
        let doubled = img.upscaled(img.width() * 2, img.height() * 2);
        assert_eq!((doubled.width(), doubled.height()), (8, 6));

        let restored = img.upscaled(9, 6);
        assert_eq!((restored.width(), restored.height()), (9, 6));
        assert_eq!(restored.count_masked(), 0);
    }

    #[test]
    fn test_upscaled_leaves_receiver_untouched() {
        let img = MaskedImage::new(gradient(4, 4), square_hole(4, 4)).unwrap();
        let up = img.upscaled(8, 8);
        assert_eq!((img.width(), img.height()), (4, 4));
        assert_eq!((up.width(), up.height()), (8, 8));
        assert!(up.is_masked(5, 5));
        assert!(!up.is_masked(0, 0));
    }

    #[test]
    fn test_pixel_distance() {
        let a = MaskedImage::new(gradient(4, 4), Raster::new(4, 4, ChannelKind::GRAY)).unwrap();
        assert_eq!(a.distance(1, 1, &a, 1, 1), 0);
        // (10, 10, 77) vs (30, 0, 77)
        assert_eq!(a.distance(1, 1, &a, 3, 0), 400 + 100);
    }

    #[test]
    fn test_set_pixel_writes_through_to_raster() {
        let mut img = MaskedImage::new(gradient(3, 3), Raster::new(3, 3, ChannelKind::GRAY)).unwrap();
        img.set_pixel(2, 1, &[1, 2, 3]);
        assert_eq!(img.pixel(2, 1), &[1, 2, 3]);
        assert_eq!(img.image().pixel_bytes(2, 1), &[1, 2, 3]);
    }

    #[test]
    fn test_restore_unmasked_only_touches_known_pixels() {
        let original = MaskedImage::new(gradient(6, 6), square_hole(6, 6)).unwrap();
        let mut filled = original.clone();
        for y in 0..6 {
            for x in 0..6 {
                filled.set_pixel(x, y, &[1, 1, 1]);
            }
        }
        filled.restore_unmasked_from(&original);
        assert_eq!(filled.pixel(0, 0), original.pixel(0, 0));
        assert_eq!(filled.pixel(2, 2), &[1, 1, 1]);
    }
}
