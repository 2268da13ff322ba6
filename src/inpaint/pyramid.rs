//! Coarse-to-fine image pyramid

use tracing::debug;

use crate::inpaint::masked_image::MaskedImage;

/// Successive 2x box-filtered copies of an image; level 0 is full resolution.
#[derive(Debug, Clone)]
pub struct Pyramid {
    levels: Vec<MaskedImage>,
}

impl Pyramid {
    /// Downsamples `initial` until a side is no larger than `radius` or no hole is left.
    ///
    /// A hole-free `initial` yields a single-level pyramid.
    pub fn build(initial: &MaskedImage, radius: usize) -> Self {
        let mut levels = vec![initial.clone()];
        let mut current = initial.clone();

        while current.width() > radius && current.height() > radius && current.count_masked() > 0 {
            let before = (current.width(), current.height());
            current.downsample_half();
            if (current.width(), current.height()) == before {
                break;
            }
            debug!(
                level = levels.len(),
                width = current.width(),
                height = current.height(),
                holes = current.count_masked(),
                "Pyramid level"
            );
            levels.push(current.clone());
        }

        Self { levels }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Index of the coarsest level.
    pub fn coarsest(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn level(&self, index: usize) -> &MaskedImage {
        &self.levels[index]
    }

    pub fn levels(&self) -> &[MaskedImage] {
        &self.levels
    }
}
