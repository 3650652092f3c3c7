pub mod face;
pub mod library;
pub mod metrics;

pub use face::FontFace;
pub use library::{FontKey, FontLibrary};
pub use metrics::{FontMetrics, LineMetrics};

use core::fmt;
use std::sync::Arc;

/// Errors that can occur while working with fonts.
#[derive(Debug)]
pub enum FontError {
    Io(std::io::Error),
    InvalidFont,
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontError::Io(err) => write!(f, "font I/O error: {err}"),
            FontError::InvalidFont => write!(f, "invalid font data"),
        }
    }
}

impl std::error::Error for FontError {}

impl From<std::io::Error> for FontError {
    fn from(err: std::io::Error) -> Self {
        FontError::Io(err)
    }
}

/// Convenient result alias for font-related operations.
pub type Result<T> = std::result::Result<T, FontError>;

/// Style parameters used when matching fallback typefaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontStyle {
    /// CSS-style weight, 100..=900.
    pub weight: u16,
    pub italic: bool,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            weight: 400,
            italic: false,
        }
    }
}

/// A variation-axis coordinate applied when the shaping engine loads a face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variation {
    pub tag: [u8; 4],
    pub value: f32,
}

/// A loaded face as the shaper sees it: raw data for the shaping engine plus
/// coverage, style and metric queries.
pub trait Typeface {
    /// Raw font file bytes.
    fn data(&self) -> Arc<[u8]>;

    /// Index of the face within a collection.
    fn index(&self) -> u32 {
        0
    }

    fn units_per_em(&self) -> u16;

    /// Variation coordinates to apply, if any.
    fn variations(&self) -> Vec<Variation> {
        Vec::new()
    }

    /// Style used when requesting fallback typefaces.
    fn style(&self) -> FontStyle {
        FontStyle::default()
    }

    /// Whether the face maps this code point to at least one glyph.
    fn covers(&self, c: char) -> bool;

    /// Metrics in font units.
    fn metrics(&self) -> FontMetrics;
}

/// Source of typefaces: the default face and style-aware per-character
/// fallback lookup.
pub trait FontProvider {
    /// Typeface used when the shaper is constructed without one.
    fn default_typeface(&self) -> Option<Arc<dyn Typeface>>;

    /// Find a typeface matching `style` whose character map covers `c`.
    /// `family` is a hint and may be ignored.
    fn match_family_style_character(
        &self,
        family: Option<&str>,
        style: FontStyle,
        c: char,
    ) -> Option<Arc<dyn Typeface>>;
}

/// Size parameters applied to whichever typeface a run resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    /// Font size in device units per em.
    pub size: f32,
    /// Additional horizontal scale (condensed/expanded rendering).
    pub scale_x: f32,
}

impl FontSpec {
    pub fn new(size: f32) -> Self {
        Self { size, scale_x: 1.0 }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(16.0)
    }
}

/// The font a shaped run resolved to: the base size parameters with the
/// typeface the font segmenter selected.
#[derive(Clone)]
pub struct RunFont {
    pub typeface: Arc<dyn Typeface>,
    pub size: f32,
    pub scale_x: f32,
}

impl RunFont {
    /// Line metrics at this font's size, in the device convention
    /// (negative ascent).
    pub fn line_metrics(&self) -> LineMetrics {
        self.typeface.metrics().scale_to_size(self.size)
    }
}

impl fmt::Debug for RunFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunFont")
            .field("size", &self.size)
            .field("scale_x", &self.scale_x)
            .finish_non_exhaustive()
    }
}
