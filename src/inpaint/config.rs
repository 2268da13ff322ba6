//! Inpainting configuration types

/// Configuration for a PatchMatch inpainting run
#[derive(Debug, Clone)]
pub struct InpaintConfig {
    /// Half-size of the square comparison window (window side is `2 * radius + 1`)
    pub patch_radius: usize,
    /// Seed for the random search; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Copy the original pixels back over everything outside the hole
    pub preserve_unmasked: bool,
    /// Whether to enforce `max_dimension` before running
    pub validate_dimensions: bool,
    /// Largest accepted width or height
    pub max_dimension: Option<usize>,
    /// Mask samples above this value mark the region to fill
    pub mask_threshold: u8,
    /// Upper bound on EM iterations per pyramid level
    pub max_em_iterations: usize,
    /// Upper bound on NNF minimization passes per EM iteration
    pub max_nnf_passes: usize,
}

impl Default for InpaintConfig {
    fn default() -> Self {
        Self {
            patch_radius: 2,
            seed: None,
            preserve_unmasked: true,
            validate_dimensions: true,
            max_dimension: Some(50000),
            mask_threshold: 127,
            max_em_iterations: 4,
            max_nnf_passes: 5,
        }
    }
}

impl InpaintConfig {
    pub fn builder() -> InpaintConfigBuilder {
        InpaintConfigBuilder::default()
    }
}

/// Builder for InpaintConfig
#[derive(Default)]
pub struct InpaintConfigBuilder {
    patch_radius: Option<usize>,
    seed: Option<Option<u64>>,
    preserve_unmasked: Option<bool>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
    mask_threshold: Option<u8>,
    max_em_iterations: Option<usize>,
    max_nnf_passes: Option<usize>,
}

impl InpaintConfigBuilder {
    pub fn patch_radius(mut self, radius: usize) -> Self {
        self.patch_radius = Some(radius);
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn preserve_unmasked(mut self, preserve: bool) -> Self {
        self.preserve_unmasked = Some(preserve);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn mask_threshold(mut self, threshold: u8) -> Self {
        self.mask_threshold = Some(threshold);
        self
    }

    pub fn max_em_iterations(mut self, iterations: usize) -> Self {
        self.max_em_iterations = Some(iterations);
        self
    }

    pub fn max_nnf_passes(mut self, passes: usize) -> Self {
        self.max_nnf_passes = Some(passes);
        self
    }

    pub fn build(self) -> InpaintConfig {
        let default = InpaintConfig::default();
        InpaintConfig {
            patch_radius: self.patch_radius.unwrap_or(default.patch_radius),
            seed: self.seed.unwrap_or(default.seed),
            preserve_unmasked: self.preserve_unmasked.unwrap_or(default.preserve_unmasked),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
            mask_threshold: self.mask_threshold.unwrap_or(default.mask_threshold),
            max_em_iterations: self.max_em_iterations.unwrap_or(default.max_em_iterations),
            max_nnf_passes: self.max_nnf_passes.unwrap_or(default.max_nnf_passes),
        }
    }
}
