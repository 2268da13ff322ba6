//! Hooks for inspecting intermediate inpainting state

use crate::inpaint::masked_image::MaskedImage;

/// Receives intermediate images while an inpainting run progresses.
///
/// All methods default to doing nothing.
pub trait LevelObserver {
    /// Called once per pyramid level after the pyramid is built, finest first.
    fn on_pyramid_level(&mut self, _level: usize, _image: &MaskedImage) {}

    /// Called after every EM reconstruction. On the last iteration of a
    /// level `target` already has the next finer level's resolution.
    fn on_em_iteration(&mut self, _level: usize, _iteration: usize, _target: &MaskedImage) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl LevelObserver for NoopObserver {}

impl<T: LevelObserver + ?Sized> LevelObserver for &mut T {
    fn on_pyramid_level(&mut self, level: usize, image: &MaskedImage) {
        (**self).on_pyramid_level(level, image);
    }

    fn on_em_iteration(&mut self, level: usize, iteration: usize, target: &MaskedImage) {
        (**self).on_em_iteration(level, iteration, target);
    }
}
