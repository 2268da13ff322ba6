//! PatchMatch nearest-neighbour field
//!
//! Maps every pixel of a target image to its best known matching patch centre in
//! a source image. The field is seeded at random (coarsest level) or from a
//! coarser field, then refined by propagation and random search.

mod field;
mod similarity;

pub use field::{Correspondence, MAX_DIST};
pub use similarity::SimilarityTable;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::inpaint::masked_image::MaskedImage;
use field::Field;

/// Random reseeds tried per pixel while its distance is stuck at `MAX_DIST`.
const MAX_RESEED_RETRIES: usize = 20;

/// Largest squared difference a single channel can contribute.
const CHANNEL_SSD_MAX: u64 = 255 * 255;

pub struct NearestNeighborField {
    input: MaskedImage,
    output: MaskedImage,
    field: Field,
    radius: usize,
    similarity: SimilarityTable,
    rng: StdRng,
}

impl NearestNeighborField {
    /// Creates an unseeded field from `input` (target) to `output` (source).
    ///
    /// Every entry starts at `(0, 0)` with the sentinel distance; call
    /// [`randomize`](Self::randomize) before minimizing.
    pub fn new(input: MaskedImage, output: MaskedImage, radius: usize, rng: StdRng) -> Self {
        let field = Field::new(input.width(), input.height());
        Self {
            input,
            output,
            field,
            radius,
            similarity: SimilarityTable::new(),
            rng,
        }
    }

    /// Seeds a field for a finer level from the correspondences of `coarser`.
    ///
    /// Each pixel looks up the coarser entry covering it, scales the matched
    /// position by the source resolution ratio, then gets a fresh distance.
    /// The random generator and similarity table are carried over.
    pub fn from_coarser(coarser: NearestNeighborField, input: MaskedImage, output: MaskedImage) -> Self {
        let NearestNeighborField {
            field: coarse_field,
            output: coarse_output,
            radius,
            similarity,
            rng,
            ..
        } = coarser;

        let (w, h) = (input.width(), input.height());
        let (ow, oh) = (output.width(), output.height());
        let (cw, ch) = (coarse_field.width(), coarse_field.height());

        let x_scale = w as f32 / cw as f32;
        let y_scale = h as f32 / ch as f32;
        let out_x_scale = ow as f32 / coarse_output.width() as f32;
        let out_y_scale = oh as f32 / coarse_output.height() as f32;

        let mut field = Field::new(w, h);
        for y in 0..h {
            let yl = ((y as f32 / y_scale) as usize).min(ch - 1);
            for x in 0..w {
                let xl = ((x as f32 / x_scale) as usize).min(cw - 1);
                let coarse = coarse_field.get(xl, yl);
                field.set(
                    x,
                    y,
                    Correspondence {
                        x: ((coarse.x as f32 * out_x_scale) as usize).min(ow - 1),
                        y: ((coarse.y as f32 * out_y_scale) as usize).min(oh - 1),
                        distance: MAX_DIST,
                    },
                );
            }
        }

        let mut nnf = Self {
            input,
            output,
            field,
            radius,
            similarity,
            rng,
        };
        debug!(
            from_width = cw,
            from_height = ch,
            width = w,
            height = h,
            "Seeding nearest-neighbour field from coarser level"
        );
        nnf.initialize();
        nnf
    }

    /// Assigns every pixel a uniformly random source position, then computes distances.
    pub fn randomize(&mut self) {
        let (ow, oh) = (self.output.width(), self.output.height());
        for y in 0..self.field.height() {
            for x in 0..self.field.width() {
                let entry = Correspondence {
                    x: self.rng.random_range(0..ow),
                    y: self.rng.random_range(0..oh),
                    distance: MAX_DIST,
                };
                self.field.set(x, y, entry);
            }
        }
        self.initialize();
    }

    /// Computes real distances, reseeding entries whose patch is entirely invalid.
    ///
    /// An entry still at `MAX_DIST` after `MAX_RESEED_RETRIES` attempts is kept as is.
    fn initialize(&mut self) {
        let (ow, oh) = (self.output.width(), self.output.height());
        let mut exhausted = 0usize;

        for y in 0..self.field.height() {
            for x in 0..self.field.width() {
                let mut entry = self.field.get(x, y);
                entry.distance = self.patch_distance(x, y, entry.x, entry.y);

                let mut retries = 0;
                while entry.distance == MAX_DIST && retries < MAX_RESEED_RETRIES {
                    entry.x = self.rng.random_range(0..ow);
                    entry.y = self.rng.random_range(0..oh);
                    entry.distance = self.patch_distance(x, y, entry.x, entry.y);
                    retries += 1;
                }
                if entry.distance == MAX_DIST {
                    exhausted += 1;
                }
                self.field.set(x, y, entry);
            }
        }

        if exhausted > 0 {
            debug!(exhausted, "Correspondences left without a valid source patch");
        }
    }

    /// Runs `passes` sweeps of propagation and random search.
    ///
    /// Each pass walks the field in scanline order (skipping exact matches)
    /// and then in reverse scanline order.
    pub fn minimize(&mut self, passes: usize) {
        let (w, h) = (self.field.width(), self.field.height());
        for _ in 0..passes {
            for y in 0..h {
                for x in 0..w {
                    if self.field.get(x, y).distance > 0 {
                        self.minimize_link(x, y, 1);
                    }
                }
            }
            for y in (0..h).rev() {
                for x in (0..w).rev() {
                    self.minimize_link(x, y, -1);
                }
            }
        }
    }

    /// Tries to improve the match of `(x, y)`; never increases its distance.
    ///
    /// `dir` is `1` for the forward sweep and `-1` for the reverse one.
    pub fn minimize_link(&mut self, x: usize, y: usize, dir: isize) {
        let (w, h) = (self.field.width() as isize, self.field.height() as isize);
        let (xi, yi) = (x as isize, y as isize);

        let xn = xi - dir;
        if (0..w).contains(&xn) {
            let neighbour = self.field.get(xn as usize, y);
            self.try_candidate(x, y, neighbour.x as isize + dir, neighbour.y as isize);
        }

        let yn = yi - dir;
        if (0..h).contains(&yn) {
            let neighbour = self.field.get(x, yn as usize);
            self.try_candidate(x, y, neighbour.x as isize, neighbour.y as isize + dir);
        }

        let (ow, oh) = (self.output.width() as isize, self.output.height() as isize);
        let centre = self.field.get(x, y);
        let mut search = ow as i64;
        while search > 0 {
            let dx = self.rng.random_range(-search..=search) as isize;
            let dy = self.rng.random_range(-search..=search) as isize;
            let xp = (centre.x as isize + dx).clamp(0, ow - 1);
            let yp = (centre.y as isize + dy).clamp(0, oh - 1);
            self.try_candidate(x, y, xp, yp);
            search /= 2;
        }
    }

    /// Stores `(xp, yp)` for `(x, y)` if it lies in the source and strictly lowers the distance.
    fn try_candidate(&mut self, x: usize, y: usize, xp: isize, yp: isize) {
        if xp < 0 || yp < 0 || xp >= self.output.width() as isize || yp >= self.output.height() as isize {
            return;
        }
        let (xp, yp) = (xp as usize, yp as usize);
        let distance = self.patch_distance(x, y, xp, yp);
        if distance < self.field.get(x, y).distance {
            self.field.set(x, y, Correspondence { x: xp, y: yp, distance });
        }
    }

    /// Normalized distance between the input patch at `(x, y)` and the output patch at `(xp, yp)`.
    ///
    /// Window cells that fall outside either image, or on a hole in either
    /// image, count as the largest possible difference. The sum is rescaled
    /// into `0..=MAX_DIST`.
    pub fn patch_distance(&self, x: usize, y: usize, xp: usize, yp: usize) -> u32 {
        let r = self.radius as isize;
        let cell_max = CHANNEL_SSD_MAX * self.input.channel_count() as u64;
        let (iw, ih) = (self.input.width() as isize, self.input.height() as isize);
        let (ow, oh) = (self.output.width() as isize, self.output.height() as isize);

        let mut distance = 0u64;
        let mut weight_sum = 0u64;

        for dy in -r..=r {
            for dx in -r..=r {
                weight_sum += cell_max;

                let (xs, ys) = (x as isize + dx, y as isize + dy);
                if xs < 0 || ys < 0 || xs >= iw || ys >= ih {
                    distance += cell_max;
                    continue;
                }
                let (xs, ys) = (xs as usize, ys as usize);
                if self.input.is_masked(xs, ys) {
                    distance += cell_max;
                    continue;
                }

                let (xt, yt) = (xp as isize + dx, yp as isize + dy);
                if xt < 0 || yt < 0 || xt >= ow || yt >= oh {
                    distance += cell_max;
                    continue;
                }
                let (xt, yt) = (xt as usize, yt as usize);
                if self.output.is_masked(xt, yt) {
                    distance += cell_max;
                    continue;
                }

                distance += self.input.distance(xs, ys, &self.output, xt, yt) as u64;
            }
        }

        ((MAX_DIST as u64 * distance) / weight_sum).min(MAX_DIST as u64) as u32
    }

    /// Swaps in a same-sized target and recomputes every stored distance.
    pub fn replace_input(&mut self, input: MaskedImage) {
        debug_assert_eq!(
            (input.width(), input.height()),
            (self.field.width(), self.field.height())
        );
        self.input = input;
        for y in 0..self.field.height() {
            for x in 0..self.field.width() {
                let mut entry = self.field.get(x, y);
                entry.distance = self.patch_distance(x, y, entry.x, entry.y);
                self.field.set(x, y, entry);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn set_correspondence(&mut self, x: usize, y: usize, xp: usize, yp: usize) {
        let distance = self.patch_distance(x, y, xp, yp);
        self.field.set(x, y, Correspondence { x: xp, y: yp, distance });
    }

    #[inline]
    pub fn correspondence(&self, x: usize, y: usize) -> Correspondence {
        self.field.get(x, y)
    }

    pub fn correspondences(&self) -> &[Correspondence] {
        self.field.entries()
    }

    /// Voting weight for a patch distance.
    #[inline]
    pub fn similarity(&self, distance: u32) -> f32 {
        self.similarity.weight(distance)
    }

    pub fn width(&self) -> usize {
        self.field.width()
    }

    pub fn height(&self) -> usize {
        self.field.height()
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn input(&self) -> &MaskedImage {
        &self.input
    }

    pub fn output(&self) -> &MaskedImage {
        &self.output
    }
}
