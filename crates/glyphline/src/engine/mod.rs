pub mod buzz;

pub use buzz::{BuzzEngine, BuzzFont};

use unicode_script::Script;

use crate::font::Typeface;

/// Shaping direction of a segment, derived from its bidi level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

/// One segment prepared for shaping.
///
/// Clusters are byte offsets relative to the segment start; the context
/// slices carry the code points around the segment for contextual forms
/// (engines may consult as few of them as they like, or none).
#[derive(Debug, Clone, Copy)]
pub struct ShapeRequest<'a> {
    /// Cluster-tagged code points of the segment, in logical order.
    pub codepoints: &'a [(char, u32)],
    /// Code points preceding the segment.
    pub pre_context: &'a [char],
    /// Code points following the segment.
    pub post_context: &'a [char],
    pub script: Script,
    pub direction: Direction,
}

/// A glyph record as reported by a shaping engine: positions and advances in
/// font units, glyphs in the engine's native order (visual order for RTL),
/// clusters monotonic in that order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawGlyph {
    pub glyph_id: u32,
    pub cluster: u32,
    pub x_advance: i32,
    pub y_advance: i32,
    pub x_offset: i32,
    pub y_offset: i32,
}

/// A complex-script shaping engine (HarfBuzz or equivalent).
pub trait ShapingEngine {
    /// Font handle prepared for repeated shaping calls.
    type Font;

    /// Load a typeface's data into an engine font; `None` if the data is
    /// unusable.
    fn create_font(&self, typeface: &dyn Typeface) -> Option<Self::Font>;

    /// Per-axis font-unit scale of an engine font.
    fn font_scale(&self, font: &Self::Font) -> (i32, i32);

    /// Shape one segment.
    fn shape(&self, font: &Self::Font, request: &ShapeRequest<'_>) -> Vec<RawGlyph>;
}
