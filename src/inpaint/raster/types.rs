//! Raster channel types

/// Role of a single channel inside a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Colour or intensity data, reconstructed by voting
    Color,
    /// Opacity, carried through reconstruction untouched
    Alpha,
}

impl ChannelKind {
    /// Channel layout of an 8-bit grayscale image.
    pub const GRAY: &'static [ChannelKind] = &[ChannelKind::Color];
    /// Channel layout of an 8-bit RGB image.
    pub const RGB: &'static [ChannelKind] = &[ChannelKind::Color; 3];
    /// Channel layout of an 8-bit RGBA image.
    pub const RGBA: &'static [ChannelKind] = &[
        ChannelKind::Color,
        ChannelKind::Color,
        ChannelKind::Color,
        ChannelKind::Alpha,
    ];

    pub fn is_color(self) -> bool {
        matches!(self, ChannelKind::Color)
    }
}
