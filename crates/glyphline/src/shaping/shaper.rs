use std::sync::Arc;

use unicode_script::Script;

use super::run::{ShapedGlyph, ShapedRun};
use super::{Result, ShaperError};
use crate::engine::{Direction, ShapeRequest, ShapingEngine};
use crate::font::{FontProvider, FontSpec, RunFont, Typeface};
use crate::geom::Point;
use crate::layout::{emit, wrap};
use crate::segment::{
    BidiRunIterator, FontRunIterator, RunIterator, RunSegmenterQueue, ScriptRunIterator,
};
use crate::sink::RunSink;
use crate::unicode::utf8::{decode_code_point, head_code_points, tail_code_points};
use crate::unicode::{BreakCursor, UnicodeServices};

const BIDI: usize = 0;
const SCRIPT: usize = 1;
const FONT: usize = 2;

/// HarfBuzz consults only a handful of context characters.
const CONTEXT_CODE_POINTS: usize = 8;

/// Complex-text shaper: segments by bidi level, script and font coverage,
/// shapes each segment, wraps to a width and emits visually reordered runs
/// line by line.
///
/// One shaper instance owns its engine, primary engine font and break
/// cursor; reuse it across calls from one thread.
pub struct Shaper<E: ShapingEngine> {
    engine: E,
    unicode: Arc<dyn UnicodeServices>,
    provider: Arc<dyn FontProvider>,
    typeface: Arc<dyn Typeface>,
    primary_font: Option<Arc<E::Font>>,
    breaks: Box<dyn BreakCursor>,
}

impl<E: ShapingEngine> Shaper<E> {
    /// Build a shaper around the given collaborators. A `None` typeface
    /// resolves through the provider's default.
    pub fn new(
        engine: E,
        unicode: Arc<dyn UnicodeServices>,
        provider: Arc<dyn FontProvider>,
        typeface: Option<Arc<dyn Typeface>>,
    ) -> Result<Self> {
        let typeface = match typeface {
            Some(typeface) => typeface,
            None => provider
                .default_typeface()
                .ok_or(ShaperError::NoDefaultTypeface)?,
        };
        let primary_font = engine.create_font(&*typeface).map(Arc::new);
        if primary_font.is_none() {
            log::warn!("primary typeface has no usable font data");
        }
        let breaks = unicode.line_break_cursor()?;
        Ok(Self {
            engine,
            unicode,
            provider,
            typeface,
            primary_font,
            breaks,
        })
    }

    /// Whether the primary typeface loaded into the shaping engine.
    pub fn good(&self) -> bool {
        self.primary_font.is_some()
    }

    /// The primary typeface.
    pub fn typeface(&self) -> &Arc<dyn Typeface> {
        &self.typeface
    }

    /// Shape `text`, wrap it to `width`, and emit positioned runs to `sink`
    /// starting at `origin`. Returns the pen position below the last line;
    /// on failure the origin comes back unchanged and nothing is emitted.
    pub fn shape(
        &mut self,
        sink: &mut dyn RunSink,
        base: FontSpec,
        text: &[u8],
        left_to_right: bool,
        origin: Point,
        width: f32,
    ) -> Point {
        match self.shape_impl(sink, base, text, left_to_right, origin, width) {
            Ok(point) => point,
            Err(err) => {
                log::warn!("shaping failed, returning origin: {err}");
                origin
            }
        }
    }

    fn shape_impl(
        &mut self,
        sink: &mut dyn RunSink,
        base: FontSpec,
        text: &[u8],
        left_to_right: bool,
        origin: Point,
        width: f32,
    ) -> Result<Point> {
        if text.len() > i32::MAX as usize {
            return Err(ShaperError::TextTooLong { bytes: text.len() });
        }

        let mut bidi = BidiRunIterator::new(text, !left_to_right, &*self.unicode)?;
        let mut script = ScriptRunIterator::new(text, &*self.unicode);
        let mut font = FontRunIterator::new(
            text,
            self.typeface.clone(),
            self.primary_font.clone(),
            &self.engine,
            &*self.provider,
        );

        let mut queue = RunSegmenterQueue::new();
        queue.insert(BIDI, &bidi);
        queue.insert(SCRIPT, &script);
        queue.insert(FONT, &font);

        self.breaks.set_text(text)?;

        let mut runs: Vec<ShapedRun> = Vec::new();
        let mut utf8_end = 0;
        loop {
            let advanced = {
                let mut iterators: [&mut dyn RunIterator; 3] =
                    [&mut bidi, &mut script, &mut font];
                queue.advance_runs(&mut iterators)
            };
            if !advanced {
                break;
            }
            let utf8_start = utf8_end;
            utf8_end = queue.end_of_current_run();
            shape_segment(
                &self.engine,
                &mut *self.breaks,
                &mut runs,
                base,
                text,
                utf8_start,
                utf8_end,
                bidi.current_level(),
                script.current_script(),
                font.current_typeface(),
                font.current_font(),
            );
        }

        wrap::mark_line_breaks(&mut runs, width);
        Ok(emit::emit_lines(
            &runs,
            text,
            &*self.unicode,
            sink,
            origin,
        ))
    }
}

/// Shape one aggregate segment and append the resulting run. Segments with
/// no usable font or no engine output contribute nothing.
#[allow(clippy::too_many_arguments)]
fn shape_segment<E: ShapingEngine>(
    engine: &E,
    breaks: &mut dyn BreakCursor,
    runs: &mut Vec<ShapedRun>,
    base: FontSpec,
    text: &[u8],
    utf8_start: usize,
    utf8_end: usize,
    level: u8,
    script: Script,
    typeface: Option<&Arc<dyn Typeface>>,
    font: Option<&Arc<E::Font>>,
) {
    let (Some(typeface), Some(font)) = (typeface, font) else {
        return;
    };

    let mut codepoints = Vec::new();
    let mut pos = utf8_start;
    while pos < utf8_end {
        match decode_code_point(text, pos) {
            Some((ch, width)) => {
                codepoints.push((ch, (pos - utf8_start) as u32));
                pos += width;
            }
            None => break,
        }
    }
    if codepoints.is_empty() {
        return;
    }

    let pre_context = tail_code_points(text, utf8_start, CONTEXT_CODE_POINTS);
    let post_context = head_code_points(text, utf8_end, CONTEXT_CODE_POINTS);
    let direction = if level & 1 == 0 {
        Direction::LeftToRight
    } else {
        Direction::RightToLeft
    };
    let request = ShapeRequest {
        codepoints: &codepoints,
        pre_context: &pre_context,
        post_context: &post_context,
        script,
        direction,
    };

    let mut raw = engine.shape(font, &request);
    if raw.is_empty() {
        return;
    }
    // Engines report RTL output in visual order; storage is logical.
    // Advances keep their LTR sense either way.
    if direction == Direction::RightToLeft {
        raw.reverse();
    }

    let (scale_x, scale_y) = engine.font_scale(font);
    let sx = if scale_x != 0 {
        base.size / scale_x as f32 * base.scale_x
    } else {
        0.0
    };
    let sy = if scale_y != 0 {
        base.size / scale_y as f32
    } else {
        0.0
    };

    let mut glyphs = Vec::with_capacity(raw.len());
    let mut advance = Point::ZERO;
    for glyph in &raw {
        let shaped = ShapedGlyph {
            id: glyph.glyph_id as u16,
            cluster: utf8_start as u32 + glyph.cluster,
            offset: Point::new(glyph.x_offset as f32 * sx, glyph.y_offset as f32 * sy),
            advance: Point::new(glyph.x_advance as f32 * sx, glyph.y_advance as f32 * sy),
            may_break_before: false,
            must_break_before: false,
            has_visual: true,
        };
        advance += shaped.advance;
        glyphs.push(shaped);
    }

    // Walk the break cursor forward once per run; clusters are monotonic
    // across the whole text, so it never needs to rewind.
    let mut previous_cluster = u32::MAX;
    for glyph in &mut glyphs {
        let cluster = glyph.cluster as usize;
        while breaks.current().map_or(false, |boundary| boundary < cluster) {
            breaks.advance();
        }
        glyph.may_break_before =
            glyph.cluster != previous_cluster && breaks.current() == Some(cluster);
        previous_cluster = glyph.cluster;
    }

    runs.push(ShapedRun {
        utf8_start,
        utf8_end,
        font: RunFont {
            typeface: typeface.clone(),
            size: base.size,
            scale_x: base.scale_x,
        },
        level,
        glyphs,
        advance,
    });
}
