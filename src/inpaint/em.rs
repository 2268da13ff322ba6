//! Patch-vote reconstruction (the expectation-maximization step)

use rayon::prelude::*;

use crate::inpaint::masked_image::MaskedImage;
use crate::inpaint::nnf::NearestNeighborField;

/// Distinct values of an 8-bit sample.
const BINS: usize = 256;
/// Pixels with less accumulated vote weight keep their previous value.
const MIN_VOTE_WEIGHT: f32 = 1.0;
/// Cumulative-weight window averaged per channel.
const LOW_QUANTILE: f32 = 0.4;
const HIGH_QUANTILE: f32 = 0.6;

/// Per-channel weighted histogram of candidate sample values.
#[derive(Debug, Clone)]
pub(crate) struct VoteHistogram {
    bins: Vec<f32>,
}

impl VoteHistogram {
    pub(crate) fn new(channels: usize) -> Self {
        Self {
            bins: vec![0.0; channels * BINS],
        }
    }

    pub(crate) fn clear(&mut self) {
        self.bins.fill(0.0);
    }

    pub(crate) fn add(&mut self, pixel: &[u8], weight: f32) {
        for (c, &v) in pixel.iter().enumerate() {
            self.bins[c * BINS + v as usize] += weight;
        }
    }

    /// Mean of the values whose cumulative weight lies between the 40th and 60th percentile.
    ///
    /// The bins crossing either bound are included whole.
    pub(crate) fn trimmed_mean(&self, channel: usize, total: f32) -> u8 {
        let low = LOW_QUANTILE * total;
        let high = HIGH_QUANTILE * total;
        let bins = &self.bins[channel * BINS..(channel + 1) * BINS];

        let mut cdf = 0.0f32;
        let mut value_sum = 0.0f32;
        let mut weight_sum = 0.0f32;
        for (value, &w) in bins.iter().enumerate() {
            cdf += w;
            if cdf < low {
                continue;
            }
            value_sum += value as f32 * w;
            weight_sum += w;
            if cdf > high {
                break;
            }
        }

        if weight_sum <= 0.0 {
            return 0;
        }
        (value_sum / weight_sum).round().clamp(0.0, u8::MAX as f32) as u8
    }
}

/// Rebuilds `target` from the source pixels its overlapping patches point at.
///
/// Every patch of the NNF radius covering a target pixel votes with the
/// source pixel at the same offset inside its matched patch, weighted by the
/// match similarity. Hole pixels in `source` never vote. When `upscaled` is
/// set, `target` has twice the resolution of the NNF and each fine pixel
/// reads the coarse entry covering it, offset by its sub-pixel parity.
///
/// Only colour channels are rewritten; alpha keeps the value already in `target`.
pub fn em_step(nnf: &NearestNeighborField, source: &MaskedImage, target: &mut MaskedImage, upscaled: bool) {
    let r = nnf.radius() as isize;
    let (tw, th) = (target.width() as isize, target.height() as isize);
    let (sw, sh) = (source.width() as isize, source.height() as isize);
    let (fw, fh) = (nnf.width(), nnf.height());
    let channels = target.channel_count();
    let color: Vec<bool> = target.channel_kinds().iter().map(|k| k.is_color()).collect();

    let mut pixels = target.pixels().to_vec();
    let row_len = (target.width() * channels).max(1);

    pixels
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each_init(
            || VoteHistogram::new(channels),
            |histogram, (y, row)| {
                let y = y as isize;
                for x in 0..tw {
                    histogram.clear();
                    let mut total = 0.0f32;

                    for dy in -r..=r {
                        for dx in -r..=r {
                            let (xpt, ypt) = (x + dx, y + dy);
                            if xpt < 0 || ypt < 0 || xpt >= tw || ypt >= th {
                                continue;
                            }

                            let (xst, yst, weight) = if upscaled {
                                let xf = ((xpt / 2) as usize).min(fw - 1);
                                let yf = ((ypt / 2) as usize).min(fh - 1);
                                let m = nnf.correspondence(xf, yf);
                                (
                                    2 * m.x as isize + xpt % 2,
                                    2 * m.y as isize + ypt % 2,
                                    nnf.similarity(m.distance),
                                )
                            } else {
                                let m = nnf.correspondence(xpt as usize, ypt as usize);
                                (m.x as isize, m.y as isize, nnf.similarity(m.distance))
                            };

                            let (xs, ys) = (xst - dx, yst - dy);
                            if xs < 0 || ys < 0 || xs >= sw || ys >= sh {
                                continue;
                            }
                            let (xs, ys) = (xs as usize, ys as usize);
                            if source.is_masked(xs, ys) {
                                continue;
                            }

                            histogram.add(source.pixel(xs, ys), weight);
                            total += weight;
                        }
                    }

                    if total < MIN_VOTE_WEIGHT {
                        continue;
                    }

                    let start = x as usize * channels;
                    let pixel = &mut row[start..start + channels];
                    for (c, value) in pixel.iter_mut().enumerate() {
                        if color[c] {
                            *value = histogram.trimmed_mean(c, total);
                        }
                    }
                }
            },
        );

    target.replace_pixels(pixels);
}
