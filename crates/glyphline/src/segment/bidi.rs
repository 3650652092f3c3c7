use super::RunIterator;
use crate::unicode::utf8::decode_code_point;
use crate::unicode::{BidiLevels, UnicodeError, UnicodeServices};

/// Segments the input into runs of constant bidi embedding level.
///
/// Levels are indexed by UTF-16 code unit, so the walk tracks the logical
/// UTF-16 position alongside the UTF-8 one.
pub(crate) struct BidiRunIterator<'a> {
    text: &'a [u8],
    end_of_current_run: usize,
    levels: BidiLevels,
    utf16_position: usize,
    level: u8,
}

impl<'a> BidiRunIterator<'a> {
    pub fn new(
        text: &'a [u8],
        default_rtl: bool,
        unicode: &dyn UnicodeServices,
    ) -> Result<Self, UnicodeError> {
        let levels = unicode.bidi_levels(text, default_rtl)?;
        Ok(Self {
            text,
            end_of_current_run: 0,
            levels,
            utf16_position: 0,
            level: default_rtl as u8,
        })
    }

    /// Embedding level of the current run.
    pub fn current_level(&self) -> u8 {
        self.level
    }

    fn step(&mut self) {
        if let Some((ch, width)) = decode_code_point(self.text, self.end_of_current_run) {
            self.end_of_current_run += width;
            self.utf16_position += ch.len_utf16();
        }
    }
}

impl RunIterator for BidiRunIterator<'_> {
    fn consume(&mut self) {
        debug_assert!(!self.at_end());
        self.level = self.levels.level_at(self.utf16_position);
        self.step();
        while self.utf16_position < self.levels.len()
            && self.levels.level_at(self.utf16_position) == self.level
        {
            self.step();
        }
    }

    fn end_of_current_run(&self) -> usize {
        self.end_of_current_run
    }

    fn at_end(&self) -> bool {
        self.utf16_position == self.levels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unicode::BuiltinUnicode;

    fn runs(text: &str, default_rtl: bool) -> Vec<(usize, u8)> {
        let unicode = BuiltinUnicode::new();
        let mut iterator = BidiRunIterator::new(text.as_bytes(), default_rtl, &unicode).unwrap();
        let mut out = Vec::new();
        while !iterator.at_end() {
            iterator.consume();
            out.push((iterator.end_of_current_run(), iterator.current_level()));
        }
        out
    }

    #[test]
    fn ltr_text_is_one_run() {
        assert_eq!(runs("hello", false), vec![(5, 0)]);
    }

    #[test]
    fn hebrew_inside_latin_splits_in_three() {
        // A + two Hebrew letters + B.
        let segmented = runs("A\u{05D0}\u{05D1}B", false);
        assert_eq!(segmented.len(), 3);
        assert_eq!(segmented[0], (1, 0));
        assert_eq!(segmented[1].0, 5);
        assert_eq!(segmented[1].1 % 2, 1);
        assert_eq!(segmented[2], (6, 0));
    }

    #[test]
    fn empty_text_is_at_end_immediately() {
        let unicode = BuiltinUnicode::new();
        let iterator = BidiRunIterator::new(b"", false, &unicode).unwrap();
        assert!(iterator.at_end());
        assert_eq!(iterator.end_of_current_run(), 0);
    }

    #[test]
    fn surrogate_pair_advances_two_utf16_units() {
        // 'a' + U+1D11E (level 0) + Hebrew letter (level 1) + 'b' (level 0):
        // the boundary after the astral code point must land at byte 5, which
        // only happens if the walk advances two UTF-16 units for it.
        let segmented = runs("a\u{1D11E}\u{05D0}b", false);
        assert_eq!(segmented.len(), 3);
        assert_eq!(segmented[0], (5, 0));
        assert_eq!(segmented[1].0, 7);
        assert_eq!(segmented[1].1 % 2, 1);
        assert_eq!(segmented[2], (8, 0));
    }
}
