#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::inpaint::common::error::InpaintError;
    use crate::inpaint::config::InpaintConfig;
    use crate::inpaint::masked_image::MaskedImage;
    use crate::inpaint::observer::LevelObserver;
    use crate::inpaint::pipeline::Inpaint;
    use crate::inpaint::raster::{ChannelKind, Raster};

    #[derive(Default)]
    struct RecordingObserver {
        levels: Arc<Mutex<Vec<(usize, usize, usize)>>>,
        iterations: Arc<Mutex<Vec<(usize, usize, usize, usize)>>>,
    }

    impl LevelObserver for RecordingObserver {
        fn on_pyramid_level(&mut self, level: usize, image: &MaskedImage) {
            self.levels
                .lock()
                .unwrap()
                .push((level, image.width(), image.height()));
        }

        fn on_em_iteration(&mut self, level: usize, iteration: usize, target: &MaskedImage) {
            self.iterations
                .lock()
                .unwrap()
                .push((level, iteration, target.width(), target.height()));
        }
    }

    fn gradient(width: usize, height: usize) -> Raster {
        let mut samples = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            for x in 0..width {
                samples.extend_from_slice(&[(x * 7 % 256) as u8, (y * 7 % 256) as u8, 100]);
            }
        }
        Raster::from_samples(width, height, ChannelKind::RGB, samples).unwrap()
    }

    fn centre_hole(width: usize, height: usize, size: usize) -> Raster {
        let (x0, y0) = ((width - size) / 2, (height - size) / 2);
        Raster::from_mask_fn(width, height, |x, y| {
            (x0..x0 + size).contains(&x) && (y0..y0 + size).contains(&y)
        })
    }

    fn seeded() -> InpaintConfig {
        InpaintConfig::builder().seed(Some(1234)).build()
    }

    #[test]
    fn test_config_builder() {
        let config = InpaintConfig::builder()
            .patch_radius(3)
            .seed(Some(9))
            .preserve_unmasked(false)
            .validate_dimensions(false)
            .max_dimension(Some(10000))
            .mask_threshold(10)
            .max_em_iterations(2)
            .max_nnf_passes(3)
            .build();

        assert_eq!(config.patch_radius, 3);
        assert_eq!(config.seed, Some(9));
        assert!(!config.preserve_unmasked);
        assert!(!config.validate_dimensions);
        assert_eq!(config.max_dimension, Some(10000));
        assert_eq!(config.mask_threshold, 10);
        assert_eq!(config.max_em_iterations, 2);
        assert_eq!(config.max_nnf_passes, 3);
    }

    #[test]
    fn test_config_builder_defaults() {
        let config = InpaintConfig::builder().build();
        assert_eq!(config.patch_radius, 2);
        assert_eq!(config.seed, None);
        assert!(config.preserve_unmasked);
        assert_eq!(config.max_em_iterations, 4);
        assert_eq!(config.max_nnf_passes, 5);
    }

    #[test]
    fn test_mask_dimension_mismatch() {
        let mut inpaint = Inpaint::new(seeded());
        let result = inpaint.patch(&gradient(16, 16), &centre_hole(16, 15, 4));
        assert!(matches!(
            result.unwrap_err(),
            InpaintError::DimensionMismatch { mask_height: 15, .. }
        ));
    }

    #[test]
    fn test_multichannel_mask_rejected() {
        let mut inpaint = Inpaint::new(seeded());
        let result = inpaint.patch(&gradient(16, 16), &gradient(16, 16));
        assert!(matches!(result.unwrap_err(), InpaintError::MaskChannels(3)));
    }

    #[test]
    fn test_patch_radius_validation() {
        for radius in [0, 8, 20] {
            let config = InpaintConfig::builder().patch_radius(radius).seed(Some(1)).build();
            let mut inpaint = Inpaint::new(config);
            let result = inpaint.patch(&gradient(12, 8), &centre_hole(12, 8, 2));
            assert!(matches!(
                result.unwrap_err(),
                InpaintError::InvalidPatchRadius { width: 12, height: 8, .. }
            ));
        }
    }

    #[test]
    fn test_dimension_validation_failure() {
        let config = InpaintConfig::builder()
            .validate_dimensions(true)
            .max_dimension(Some(10))
            .seed(Some(1))
            .build();
        let mut inpaint = Inpaint::new(config);
        let result = inpaint.patch(&gradient(16, 16), &centre_hole(16, 16, 4));
        assert!(matches!(result.unwrap_err(), InpaintError::InvalidDimensions(16, 16)));
    }

    #[test]
    fn test_dimension_validation_disabled() {
        let config = InpaintConfig::builder()
            .validate_dimensions(false)
            .max_dimension(Some(10))
            .seed(Some(1))
            .build();
        let mut inpaint = Inpaint::new(config);
        let result = inpaint.patch(&gradient(16, 16), &centre_hole(16, 16, 4));
        assert!(result.is_ok());
    }

    #[test]
    fn test_zero_sized_image_rejected() {
        let mut inpaint = Inpaint::new(seeded());
        let result = inpaint.patch(
            &Raster::new(0, 5, ChannelKind::RGB),
            &Raster::new(0, 5, ChannelKind::GRAY),
        );
        assert!(matches!(result.unwrap_err(), InpaintError::InvalidDimensions(0, 5)));
    }

    #[test]
    fn test_zero_em_iterations_rejected() {
        let config = InpaintConfig::builder().max_em_iterations(0).seed(Some(1)).build();
        let mut inpaint = Inpaint::new(config);
        let result = inpaint.patch(&gradient(16, 16), &centre_hole(16, 16, 4));
        assert!(matches!(result.unwrap_err(), InpaintError::InvalidConfig(_)));
    }

    #[test]
    fn test_observer_sees_coarse_to_fine_schedule() {
        let observer = RecordingObserver::default();
        let levels = observer.levels.clone();
        let iterations = observer.iterations.clone();

        let mut inpaint = Inpaint::with_observer(seeded(), observer);
        inpaint
            .patch(&gradient(32, 32), &centre_hole(32, 32, 8))
            .unwrap();

        let levels = levels.lock().unwrap();
        let sizes: Vec<usize> = levels.iter().map(|&(_, w, _)| w).collect();
        assert_eq!(sizes, vec![32, 16, 8, 4, 2]);

        let iterations = iterations.lock().unwrap();
        let per_level: Vec<(usize, usize)> = (1..=4)
            .rev()
            .map(|level| (level, iterations.iter().filter(|i| i.0 == level).count()))
            .collect();
        // min(2 * level, 4) iterations per level
        assert_eq!(per_level, vec![(4, 4), (3, 4), (2, 4), (1, 2)]);

        // Last iteration of each level reconstructs at the next finer size.
        let (level, iteration, w, h) = *iterations.last().unwrap();
        assert_eq!((level, iteration, w, h), (1, 2, 32, 32));
        let first_level_end = iterations.iter().find(|i| i.0 == 4 && i.1 == 4).unwrap();
        assert_eq!((first_level_end.2, first_level_end.3), (4, 4));
        let first_level_start = iterations.iter().find(|i| i.0 == 4 && i.1 == 1).unwrap();
        assert_eq!((first_level_start.2, first_level_start.3), (2, 2));
    }

    #[test]
    fn test_hole_fading_out_of_pyramid_still_fills() {
        let observer = RecordingObserver::default();
        let levels = observer.levels.clone();
        let image = gradient(128, 128);
        let mask = Raster::from_mask_fn(128, 128, |x, y| (x, y) == (50, 30));

        let mut inpaint = Inpaint::with_observer(seeded(), observer);
        let result = inpaint.patch(&image, &mask).unwrap();

        // The hole is gone at 4x4 and the pyramid stops there.
        let sizes: Vec<usize> = levels.lock().unwrap().iter().map(|&(_, w, _)| w).collect();
        assert_eq!(sizes, vec![128, 64, 32, 16, 8, 4]);
        assert_eq!((result.width(), result.height()), (128, 128));
        assert_eq!(result.pixel_bytes(0, 0), image.pixel_bytes(0, 0));
        assert_eq!(result.pixel_bytes(127, 127), image.pixel_bytes(127, 127));
    }

    #[test]
    fn test_empty_mask_returns_input() {
        let observer = RecordingObserver::default();
        let iterations = observer.iterations.clone();
        let image = gradient(20, 17);

        let mut inpaint = Inpaint::with_observer(seeded(), observer);
        let result = inpaint
            .patch(&image, &Raster::new(20, 17, ChannelKind::GRAY))
            .unwrap();

        assert_eq!(result, image);
        assert!(iterations.lock().unwrap().is_empty());
    }

    #[test]
    fn test_odd_dimensions_round_trip() {
        let mut inpaint = Inpaint::new(seeded());
        let result = inpaint
            .patch(&gradient(37, 29), &centre_hole(37, 29, 5))
            .unwrap();
        assert_eq!((result.width(), result.height()), (37, 29));
        assert_eq!(result.channel_kinds(), ChannelKind::RGB);
    }

    #[test]
    fn test_mask_threshold_applied() {
        let image = gradient(24, 24);
        // Faint marks below the threshold are not holes.
        let faint = Raster::from_samples(24, 24, ChannelKind::GRAY, vec![60; 24 * 24]).unwrap();

        let mut inpaint = Inpaint::new(seeded());
        let result = inpaint.patch(&image, &faint).unwrap();
        assert_eq!(result, image);
    }

    #[test]
    fn test_preserve_unmasked_restores_known_pixels() {
        let image = gradient(24, 24);
        let mask = centre_hole(24, 24, 6);

        let mut inpaint = Inpaint::new(seeded());
        let result = inpaint.patch(&image, &mask).unwrap();
        for y in 0..24 {
            for x in 0..24 {
                if mask.pixel_bytes(x, y)[0] == 0 {
                    assert_eq!(result.pixel_bytes(x, y), image.pixel_bytes(x, y));
                }
            }
        }
    }

    #[test]
    fn test_patch_masked_matches_patch() {
        let image = gradient(24, 24);
        let mask = centre_hole(24, 24, 6);

        let from_rasters = Inpaint::new(seeded()).patch(&image, &mask).unwrap();
        let masked = MaskedImage::new(image, mask).unwrap();
        let from_masked = Inpaint::new(seeded()).patch_masked(&masked).unwrap();
        assert_eq!(from_masked.image(), &from_rasters);
        assert_eq!(from_masked.mask(), masked.mask());
        assert_eq!(from_masked.count_masked(), 36);
    }
}
