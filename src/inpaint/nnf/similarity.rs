//! Patch distance to vote weight mapping

use crate::inpaint::nnf::field::MAX_DIST;

/// Weight given to a perfect (zero distance) match.
const SIMILARITY_AT_ZERO: f64 = 0.999;
/// Normalized distance at which the weight drops to one half.
const HALF_WEIGHT_DISTANCE: f64 = 0.10;

/// Lookup table from patch distance `0..=MAX_DIST` to a voting weight in `[0, 1]`.
///
/// `weight(d) = 0.5 - 0.5 * tanh(k * (d / MAX_DIST - HALF_WEIGHT_DISTANCE))`, with `k`
/// chosen so that `weight(0) == SIMILARITY_AT_ZERO`.
#[derive(Debug, Clone)]
pub struct SimilarityTable {
    weights: Vec<f32>,
}

impl SimilarityTable {
    pub fn new() -> Self {
        let x = (SIMILARITY_AT_ZERO - 0.5) * 2.0;
        let inv_tanh = 0.5 * ((1.0 + x) / (1.0 - x)).ln();
        let coef = inv_tanh / HALF_WEIGHT_DISTANCE;

        let weights = (0..=MAX_DIST)
            .map(|d| {
                let t = d as f64 / MAX_DIST as f64;
                (0.5 - 0.5 * (coef * (t - HALF_WEIGHT_DISTANCE)).tanh()) as f32
            })
            .collect();
        Self { weights }
    }

    #[inline]
    pub fn weight(&self, distance: u32) -> f32 {
        self.weights[distance.min(MAX_DIST) as usize]
    }
}

impl Default for SimilarityTable {
    fn default() -> Self {
        Self::new()
    }
}
