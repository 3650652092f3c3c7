//! glyphline: complex-text shaping with bidi-aware line breaking.
//!
//! Pipeline:
//! - segment the input by bidi embedding level, script and font coverage
//! - shape each aggregate segment with a HarfBuzz-style engine
//! - assign line breaks over the shaped glyphs (UAX #14 opportunities)
//! - reorder each line's runs into visual order and emit them to a sink
//!
//! The collaborators are traits: [`ShapingEngine`] (a rustybuzz-backed
//! [`BuzzEngine`] is provided), [`UnicodeServices`] ([`BuiltinUnicode`] over
//! the UAX algorithm crates), [`FontProvider`] ([`FontLibrary`]) and
//! [`RunSink`] ([`RunCollector`]).

pub mod engine;
pub mod font;
mod geom;
mod layout;
mod segment;
pub mod shaping;
mod sink;
pub mod unicode;

pub use engine::{BuzzEngine, BuzzFont, Direction, RawGlyph, ShapeRequest, ShapingEngine};
pub use font::{
    FontError, FontFace, FontKey, FontLibrary, FontMetrics, FontProvider, FontSpec, FontStyle,
    LineMetrics, RunFont, Typeface, Variation,
};
pub use geom::Point;
pub use shaping::{Shaper, ShaperError};
pub use sink::{CollectedRun, RunBuffer, RunCollector, RunInfo, RunSink};
pub use unicode::{BidiLevels, BreakCursor, BuiltinUnicode, UnicodeError, UnicodeServices};
pub use unicode_script::Script;
