//! Dense correspondence storage

/// Upper bound of the normalized patch distance, also used as the "no valid match" sentinel.
pub const MAX_DIST: u32 = 65535;

/// Best known match of one target pixel inside the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correspondence {
    pub x: usize,
    pub y: usize,
    pub distance: u32,
}

impl Correspondence {
    pub const UNSET: Self = Self {
        x: 0,
        y: 0,
        distance: MAX_DIST,
    };
}

/// Row-major grid of correspondences, one per target pixel.
#[derive(Debug, Clone)]
pub(crate) struct Field {
    width: usize,
    height: usize,
    entries: Vec<Correspondence>,
}

impl Field {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            entries: vec![Correspondence::UNSET; width * height],
        }
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    pub(crate) fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub(crate) fn get(&self, x: usize, y: usize) -> Correspondence {
        self.entries[y * self.width + x]
    }

    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, entry: Correspondence) {
        self.entries[y * self.width + x] = entry;
    }

    pub(crate) fn entries(&self) -> &[Correspondence] {
        &self.entries
    }
}
