use crate::shaping::run::{RunCursor, ShapedRun};

/// Greedy wrap over the shaped glyphs in logical order: marks the first
/// glyph of every line after the first with `must_break_before`.
///
/// A break is never taken before the first glyph of a line
/// (`can_add_break_now` starts false). When a glyph overflows with nothing
/// accepted yet, the glyph gets a line of its own; when it overflows with no
/// opportunity recorded, the line breaks right before it.
pub(crate) fn mark_line_breaks(runs: &mut [ShapedRun], width: f32) {
    let mut width_so_far = 0.0f32;
    let mut previous_break_valid = false;
    let mut can_add_break_now = false;
    let mut previous_break = RunCursor::start();
    let mut cursor = RunCursor::start();

    loop {
        let (may_break_before, advance_x) = match cursor.current(runs) {
            Some(glyph) => (glyph.may_break_before, glyph.advance.x),
            None => break,
        };

        if can_add_break_now && may_break_before {
            previous_break_valid = true;
            previous_break = cursor;
        }

        if width_so_far + advance_x < width {
            width_so_far += advance_x;
            cursor.advance(runs);
            can_add_break_now = true;
            continue;
        }

        if width_so_far == 0.0 {
            // Even alone the glyph is too wide: give it the line anyway.
            cursor.advance(runs);
            previous_break = cursor;
        } else if !previous_break_valid {
            // No opportunity seen: break right before this glyph.
            previous_break = cursor;
        }

        cursor = previous_break;
        if let Some(glyph) = cursor.current_mut(runs) {
            glyph.must_break_before = true;
        }
        width_so_far = 0.0;
        previous_break_valid = false;
        can_add_break_now = false;
    }
}
