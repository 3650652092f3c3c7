//! Unicode services backed by the UAX algorithm crates: `unicode-bidi` for
//! paragraph levels and visual reordering, `unicode-script` for the script
//! property, `unicode-linebreak` for UAX #14 break opportunities.
//!
//! All analysis runs over the replacement-decoded view of the input so that
//! byte offsets stay aligned with the shaper's own decoding of ill-formed
//! text.

use unicode_bidi::{bidi_class, BidiClass, BidiInfo, Level, LTR_LEVEL, RTL_LEVEL};
use unicode_linebreak::linebreaks;
use unicode_script::{Script, UnicodeScript};

use super::utf8;
use super::{BidiLevels, BreakCursor, UnicodeError, UnicodeServices};

/// Default [`UnicodeServices`] implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinUnicode;

impl BuiltinUnicode {
    pub fn new() -> Self {
        Self
    }
}

fn first_strong_is_rtl(chars: &[char]) -> Option<bool> {
    for &ch in chars {
        match bidi_class(ch) {
            BidiClass::L => return Some(false),
            BidiClass::R | BidiClass::AL => return Some(true),
            _ => {}
        }
    }
    None
}

impl UnicodeServices for BuiltinUnicode {
    fn bidi_levels(&self, text: &[u8], default_rtl: bool) -> Result<BidiLevels, UnicodeError> {
        if text.len() > i32::MAX as usize {
            return Err(UnicodeError::TextTooLong);
        }
        let mut chars = Vec::new();
        let mut pos = 0;
        while let Some((ch, width)) = utf8::decode_code_point(text, pos) {
            chars.push(ch);
            pos += width;
        }
        let cleaned: String = chars.iter().collect();

        // Auto-detect the paragraph level from the first strong code point;
        // the hint only decides when there is none (unicode-bidi's own
        // detection always falls back to LTR).
        let paragraph_level = if default_rtl && first_strong_is_rtl(&chars).is_none() {
            Some(RTL_LEVEL)
        } else {
            None
        };
        let info = BidiInfo::new(&cleaned, paragraph_level);

        let mut levels = Vec::with_capacity(chars.len());
        let mut byte = 0;
        for &ch in &chars {
            let level = info.levels[byte].number();
            for _ in 0..ch.len_utf16() {
                levels.push(level);
            }
            byte += ch.len_utf8();
        }
        Ok(BidiLevels::new(levels))
    }

    fn reorder_visual(&self, levels: &[u8]) -> Vec<usize> {
        let levels: Vec<Level> = levels
            .iter()
            .map(|&level| Level::new(level).unwrap_or(LTR_LEVEL))
            .collect();
        BidiInfo::reorder_visual(&levels)
    }

    fn script(&self, c: char) -> Script {
        c.script()
    }

    fn line_break_cursor(&self) -> Result<Box<dyn BreakCursor>, UnicodeError> {
        Ok(Box::new(LineBreakCursor::new()))
    }
}

/// UAX #14 break cursor over precomputed boundaries.
struct LineBreakCursor {
    boundaries: Vec<usize>,
    position: usize,
}

impl LineBreakCursor {
    fn new() -> Self {
        Self {
            boundaries: vec![0],
            position: 0,
        }
    }
}

impl BreakCursor for LineBreakCursor {
    fn set_text(&mut self, text: &[u8]) -> Result<(), UnicodeError> {
        // unicode-linebreak wants a str, so run it over the replacement-
        // decoded text and map each boundary back to an original offset.
        let mut chars = Vec::new();
        let mut pos = 0;
        while let Some((ch, width)) = utf8::decode_code_point(text, pos) {
            chars.push((pos, ch));
            pos += width;
        }
        let cleaned: String = chars.iter().map(|&(_, ch)| ch).collect();

        let mut offset_map = Vec::with_capacity(chars.len() + 1);
        let mut cleaned_pos = 0;
        for &(original, ch) in &chars {
            offset_map.push((cleaned_pos, original));
            cleaned_pos += ch.len_utf8();
        }
        offset_map.push((cleaned.len(), text.len()));

        self.boundaries.clear();
        self.boundaries.push(0);
        for (offset, _) in linebreaks(&cleaned) {
            if let Ok(i) = offset_map.binary_search_by_key(&offset, |&(cleaned, _)| cleaned) {
                self.boundaries.push(offset_map[i].1);
            }
        }
        self.position = 0;
        Ok(())
    }

    fn current(&self) -> Option<usize> {
        self.boundaries.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<usize> {
        if self.position < self.boundaries.len() {
            self.position += 1;
        }
        self.current()
    }
}
