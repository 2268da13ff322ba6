use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, info_span, instrument, warn};

use crate::inpaint::{
    common::error::{InpaintError, Result},
    config::InpaintConfig,
    em::em_step,
    masked_image::MaskedImage,
    nnf::NearestNeighborField,
    observer::{LevelObserver, NoopObserver},
    pyramid::Pyramid,
    raster::Raster,
    timing::{InpaintTimings, Timer},
};

/// Multi-resolution PatchMatch inpainting driver.
///
/// Builds a pyramid of the masked image, seeds a random nearest-neighbour
/// field at the coarsest level and walks towards full resolution, alternating
/// field minimization with patch-vote reconstruction at every level.
pub struct Inpaint<O: LevelObserver = NoopObserver> {
    config: InpaintConfig,
    observer: O,
}

impl Inpaint<NoopObserver> {
    pub fn new(config: InpaintConfig) -> Self {
        Self {
            config,
            observer: NoopObserver,
        }
    }
}

impl<O: LevelObserver> Inpaint<O> {
    pub fn with_observer(config: InpaintConfig, observer: O) -> Self {
        Self { config, observer }
    }

    fn validate(&self, image: &Raster, mask: &Raster) -> Result<()> {
        if mask.channel_count() != 1 {
            return Err(InpaintError::MaskChannels(mask.channel_count()));
        }

        let (width, height) = (image.width(), image.height());
        if mask.width() != width || mask.height() != height {
            return Err(InpaintError::DimensionMismatch {
                image_width: width,
                image_height: height,
                mask_width: mask.width(),
                mask_height: mask.height(),
            });
        }

        if width == 0 || height == 0 {
            return Err(InpaintError::InvalidDimensions(width, height));
        }

        if self.config.validate_dimensions {
            if let Some(max) = self.config.max_dimension {
                if width > max || height > max {
                    warn!("Image dimensions {}x{} exceed maximum {}", width, height, max);
                    return Err(InpaintError::InvalidDimensions(width, height));
                }
            }
        }

        let radius = self.config.patch_radius;
        if radius == 0 || radius >= width.min(height) {
            return Err(InpaintError::InvalidPatchRadius {
                radius,
                width,
                height,
            });
        }

        if self.config.max_em_iterations == 0 || self.config.max_nnf_passes == 0 {
            return Err(InpaintError::InvalidConfig(
                "EM iterations and NNF passes must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Fills the holes of `mask` in `image` and returns a same-sized raster.
    ///
    /// Mask samples above `mask_threshold` mark pixels to synthesize.
    ///
    /// # Errors
    ///
    /// * `InpaintError::DimensionMismatch` / `InpaintError::MaskChannels` - mask does not fit the image
    /// * `InpaintError::InvalidDimensions` - empty image or larger than `max_dimension`
    /// * `InpaintError::InvalidPatchRadius` - radius is zero or not smaller than both sides
    /// * `InpaintError::InvalidConfig` - zero EM iterations or NNF passes
    pub fn patch(&mut self, image: &Raster, mask: &Raster) -> Result<Raster> {
        self.patch_with_timings(image, mask).map(|(result, _)| result)
    }

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn patch_with_timings(&mut self, image: &Raster, mask: &Raster) -> Result<(Raster, InpaintTimings)> {
        self.validate(image, mask)?;

        let initial = MaskedImage::new(image.clone(), mask.threshold(self.config.mask_threshold))?;
        let mut timings = InpaintTimings::new();
        let result = self.run(&initial, &mut timings);

        info!(
            holes = initial.count_masked(),
            elapsed_ms = timings.total_duration().as_secs_f64() * 1000.0,
            "Inpainting complete"
        );
        Ok((result.into_image(), timings))
    }

    /// Same as [`patch`](Self::patch) for an already paired image and mask.
    ///
    /// The result carries the caller's hole mask, not the working mask.
    #[instrument(skip_all, fields(width = initial.width(), height = initial.height()))]
    pub fn patch_masked(&mut self, initial: &MaskedImage) -> Result<MaskedImage> {
        self.validate(initial.image(), initial.mask())?;
        let result = self.run(initial, &mut InpaintTimings::new());
        MaskedImage::new(result.into_image(), initial.mask().clone())
    }

    fn run(&mut self, initial: &MaskedImage, timings: &mut InpaintTimings) -> MaskedImage {
        let radius = self.config.patch_radius;

        let timer = Timer::start("build_pyramid");
        let pyramid = Pyramid::build(initial, radius);
        timings.record(timer);

        for (level, image) in pyramid.levels().iter().enumerate() {
            self.observer.on_pyramid_level(level, image);
        }

        if pyramid.coarsest() == 0 {
            info!("Mask is empty, nothing to fill");
            return initial.clone();
        }
        debug!(levels = pyramid.len(), "Pyramid built");

        // Level 0 gets no EM pass of its own: it is produced by the upscaling
        // reconstruction that ends level 1.
        let mut carried: Option<(NearestNeighborField, MaskedImage)> = None;
        for level in (1..=pyramid.coarsest()).rev() {
            let source = pyramid.level(level);
            let _span = info_span!("level", level, width = source.width(), height = source.height()).entered();
            let timer = Timer::start(format!("level_{level}"));

            let nnf = match carried.take() {
                Some((coarser, target)) => NearestNeighborField::from_coarser(coarser, target, source.clone()),
                None => {
                    let mut target = source.clone();
                    target.clear_mask();
                    let mut nnf = NearestNeighborField::new(target, source.clone(), radius, self.rng());
                    nnf.randomize();
                    nnf
                }
            };

            carried = Some(self.expectation_maximization(&pyramid, level, nnf));
            timings.record(timer);
        }

        let mut result = match carried {
            Some((_, target)) => target,
            None => initial.clone(),
        };
        if self.config.preserve_unmasked {
            result.restore_unmasked_from(initial);
        }
        result
    }

    /// Runs the EM iterations of one level.
    ///
    /// Returns the level's field and the reconstruction at the next finer
    /// level's resolution.
    fn expectation_maximization(
        &mut self,
        pyramid: &Pyramid,
        level: usize,
        mut nnf: NearestNeighborField,
    ) -> (NearestNeighborField, MaskedImage) {
        let em_iterations = (2 * level).min(self.config.max_em_iterations);
        let nnf_passes = level.min(self.config.max_nnf_passes);
        debug!(em_iterations, nnf_passes, "Expectation maximization");

        for iteration in 1..em_iterations {
            let _span = info_span!("em_iteration", iteration).entered();
            nnf.minimize(nnf_passes);
            let mut target = nnf.input().clone();
            em_step(&nnf, pyramid.level(level), &mut target, false);
            self.observer.on_em_iteration(level, iteration, &target);
            nnf.replace_input(target);
        }

        let _span = info_span!("em_iteration", iteration = em_iterations, upscaled = true).entered();
        nnf.minimize(nnf_passes);
        let finer = pyramid.level(level - 1);
        let mut target = nnf.input().upscaled(finer.width(), finer.height());
        em_step(&nnf, finer, &mut target, true);
        self.observer.on_em_iteration(level, em_iterations, &target);

        (nnf, target)
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    pub fn config(&self) -> &InpaintConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: InpaintConfig) {
        self.config = config;
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }
}
