//! Weighted colour mixing

/// Sum that mixing weights are expected to add up to (unit weight in 8-bit fixed point).
pub const MIX_WEIGHT_TOTAL: u32 = 256;

/// Mixes several pixels channel by channel with fixed-point weights.
///
/// `weights` are relative to `MIX_WEIGHT_TOTAL`; the result is rounded to nearest.
/// All slices in `samples` must be at least `out.len()` long.
pub fn mix_weighted(samples: &[&[u8]], weights: &[u32], out: &mut [u8]) {
    debug_assert_eq!(samples.len(), weights.len());
    let total: u32 = weights.iter().sum::<u32>().max(1);
    for (c, dst) in out.iter_mut().enumerate() {
        let acc: u32 = samples
            .iter()
            .zip(weights)
            .map(|(px, &w)| px[c] as u32 * w)
            .sum();
        *dst = ((acc + total / 2) / total).min(u8::MAX as u32) as u8;
    }
}
