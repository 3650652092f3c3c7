use smallvec::SmallVec;

use crate::font::LineMetrics;
use crate::geom::Point;
use crate::shaping::run::{RunCursor, ShapedRun};
use crate::sink::{RunInfo, RunSink};
use crate::unicode::UnicodeServices;

/// Walk the shaped glyphs in logical order, and at every line end reorder
/// the line's runs into visual order and hand them to the sink. Returns the
/// pen position after the last line.
pub(crate) fn emit_lines(
    runs: &[ShapedRun],
    text: &[u8],
    unicode: &dyn UnicodeServices,
    sink: &mut dyn RunSink,
    origin: Point,
) -> Point {
    let mut current_point = origin;
    let mut previous_break = RunCursor::start();
    let mut cursor = RunCursor::start();
    let mut max_ascent = 0.0f32;
    let mut max_descent = 0.0f32;
    let mut max_leading = 0.0f32;
    let mut previous_run_index: Option<usize> = None;
    let mut line_index = 0;

    while cursor.current(runs).is_some() {
        let run_index = cursor.run;
        let glyph_index = cursor.glyph;
        let line_ends = match cursor.advance(runs) {
            None => true,
            Some(next) => next.must_break_before,
        };

        if previous_run_index != Some(run_index) {
            let LineMetrics {
                ascent,
                descent,
                leading,
            } = runs[run_index].font.line_metrics();
            max_ascent = max_ascent.min(ascent);
            max_descent = max_descent.max(descent);
            max_leading = max_leading.max(leading);
            previous_run_index = Some(run_index);
        }

        // Nothing can be written until the line's baseline is known.
        if !line_ends {
            continue;
        }

        // Ascent is negative, so this drops the baseline below the pen.
        current_point.y -= max_ascent;

        let first_run = previous_break.run;
        let run_count = run_index - first_run + 1;
        let levels: SmallVec<[u8; 4]> = runs[first_run..=run_index]
            .iter()
            .map(|run| run.level)
            .collect();
        let logical_from_visual = unicode.reorder_visual(&levels);
        debug_assert_eq!(logical_from_visual.len(), run_count);

        for &logical_offset in &logical_from_visual {
            let logical = first_run + logical_offset;
            let run = &runs[logical];
            let start = if logical == first_run {
                previous_break.glyph
            } else {
                0
            };
            let end = if logical == run_index {
                glyph_index + 1
            } else {
                run.glyphs.len()
            };
            let info = RunInfo {
                line_index,
                run_advance: run.advance,
                ascent: max_ascent,
                descent: max_descent,
                leading: max_leading,
            };
            append(sink, &info, run, text, start, end, &mut current_point);
        }

        current_point.y += max_descent + max_leading;
        current_point.x = origin.x;
        max_ascent = 0.0;
        max_descent = 0.0;
        max_leading = 0.0;
        previous_run_index = None;
        line_index += 1;
        previous_break = cursor;
    }

    current_point
}

/// Copy one run slice into a sink buffer, advancing the pen. Storage is
/// logical; output is always in left-to-right pen order.
fn append(
    sink: &mut dyn RunSink,
    info: &RunInfo,
    run: &ShapedRun,
    text: &[u8],
    start: usize,
    end: usize,
    point: &mut Point,
) {
    let len = end - start;
    let utf8_len = run.utf8_end - run.utf8_start;
    let buffer = sink.new_run_buffer(info, &run.font, len, utf8_len);
    debug_assert_eq!(buffer.glyphs.len(), len);
    debug_assert_eq!(buffer.positions.len(), len);

    if let Some(utf8_text) = buffer.utf8_text {
        utf8_text.copy_from_slice(&text[run.utf8_start..run.utf8_end]);
    }

    let mut clusters = buffer.clusters;
    let ltr = run.is_ltr();
    for i in 0..len {
        let glyph = &run.glyphs[if ltr { start + i } else { end - 1 - i }];
        buffer.glyphs[i] = glyph.id;
        // Offsets are y-up; the pen is y-down.
        buffer.positions[i] = Point::new(point.x + glyph.offset.x, point.y - glyph.offset.y);
        if let Some(clusters) = clusters.as_deref_mut() {
            clusters[i] = glyph.cluster;
        }
        *point += glyph.advance;
    }
}
