use unicode_script::Script;

use super::RunIterator;
use crate::unicode::utf8::decode_code_point;
use crate::unicode::UnicodeServices;

/// Segments the input into runs of one script.
///
/// COMMON and INHERITED code points attach to the surrounding script: they
/// extend the current run, and a run that starts with them adopts the first
/// real script that follows. A run that never sees one reports COMMON.
pub(crate) struct ScriptRunIterator<'a> {
    text: &'a [u8],
    unicode: &'a dyn UnicodeServices,
    end_of_current_run: usize,
    script: Script,
}

impl<'a> ScriptRunIterator<'a> {
    pub fn new(text: &'a [u8], unicode: &'a dyn UnicodeServices) -> Self {
        Self {
            text,
            unicode,
            end_of_current_run: 0,
            script: Script::Unknown,
        }
    }

    /// Script of the current run.
    pub fn current_script(&self) -> Script {
        self.script
    }
}

impl RunIterator for ScriptRunIterator<'_> {
    fn consume(&mut self) {
        debug_assert!(!self.at_end());
        if let Some((ch, width)) = decode_code_point(self.text, self.end_of_current_run) {
            self.end_of_current_run += width;
            self.script = self.unicode.script(ch);
        }
        while let Some((ch, width)) = decode_code_point(self.text, self.end_of_current_run) {
            let script = self.unicode.script(ch);
            if script != self.script {
                if self.script == Script::Inherited || self.script == Script::Common {
                    self.script = script;
                } else if script != Script::Inherited && script != Script::Common {
                    break;
                }
            }
            self.end_of_current_run += width;
        }
        if self.script == Script::Inherited {
            self.script = Script::Common;
        }
    }

    fn end_of_current_run(&self) -> usize {
        self.end_of_current_run
    }

    fn at_end(&self) -> bool {
        self.end_of_current_run == self.text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unicode::BuiltinUnicode;

    fn runs(text: &str) -> Vec<(usize, Script)> {
        let unicode = BuiltinUnicode::new();
        let mut iterator = ScriptRunIterator::new(text.as_bytes(), &unicode);
        let mut out = Vec::new();
        while !iterator.at_end() {
            iterator.consume();
            out.push((iterator.end_of_current_run(), iterator.current_script()));
        }
        out
    }

    #[test]
    fn single_script_is_one_run() {
        assert_eq!(runs("hello"), vec![(5, Script::Latin)]);
    }

    #[test]
    fn trailing_common_extends_the_current_run() {
        // The space joins the Han run; the Latin run starts at 'x'.
        let segmented = runs("abc \u{4E2D}\u{6587} xyz");
        assert_eq!(
            segmented,
            vec![
                (4, Script::Latin),
                (11, Script::Han),
                (14, Script::Latin)
            ]
        );
    }

    #[test]
    fn leading_common_adopts_the_following_script() {
        let segmented = runs("(\u{4E2D})");
        assert_eq!(segmented, vec![(5, Script::Han)]);
    }

    #[test]
    fn common_only_text_reports_common() {
        assert_eq!(runs("123 456"), vec![(7, Script::Common)]);
    }

    #[test]
    fn inherited_marks_follow_their_base() {
        // Combining acute (inherited) after a Greek letter.
        let segmented = runs("\u{03B1}\u{0301}z");
        assert_eq!(segmented.len(), 2);
        assert_eq!(segmented[0].1, Script::Greek);
        assert_eq!(segmented[1].1, Script::Latin);
    }
}
