use std::sync::Arc;

use super::RunIterator;
use crate::engine::ShapingEngine;
use crate::font::{FontProvider, Typeface};
use crate::unicode::utf8::decode_code_point;

/// Cached fallback: the typeface the provider returned and its engine font.
struct FallbackFont<E: ShapingEngine> {
    typeface: Arc<dyn Typeface>,
    font: Option<Arc<E::Font>>,
}

/// Segments the input into runs coverable by one typeface.
///
/// The primary typeface always wins when it covers a code point; otherwise a
/// single cached fallback is consulted before asking the provider for a new
/// one. A provider miss leaves the fallback slot empty and the affected run
/// reports no font, which the driver skips.
pub(crate) struct FontRunIterator<'a, E: ShapingEngine> {
    text: &'a [u8],
    end_of_current_run: usize,
    engine: &'a E,
    provider: &'a dyn FontProvider,
    primary: Arc<dyn Typeface>,
    primary_font: Option<Arc<E::Font>>,
    fallback: Option<FallbackFont<E>>,
    using_fallback: bool,
}

impl<'a, E: ShapingEngine> FontRunIterator<'a, E> {
    pub fn new(
        text: &'a [u8],
        primary: Arc<dyn Typeface>,
        primary_font: Option<Arc<E::Font>>,
        engine: &'a E,
        provider: &'a dyn FontProvider,
    ) -> Self {
        Self {
            text,
            end_of_current_run: 0,
            engine,
            provider,
            primary,
            primary_font,
            fallback: None,
            using_fallback: false,
        }
    }

    /// Typeface of the current run, if any.
    pub fn current_typeface(&self) -> Option<&Arc<dyn Typeface>> {
        if self.using_fallback {
            self.fallback.as_ref().map(|fallback| &fallback.typeface)
        } else {
            Some(&self.primary)
        }
    }

    /// Engine font of the current run, if any.
    pub fn current_font(&self) -> Option<&Arc<E::Font>> {
        if self.using_fallback {
            self.fallback
                .as_ref()
                .and_then(|fallback| fallback.font.as_ref())
        } else {
            self.primary_font.as_ref()
        }
    }

    fn current_covers(&self, c: char) -> bool {
        match self.current_typeface() {
            Some(typeface) => typeface.covers(c),
            None => false,
        }
    }
}

impl<E: ShapingEngine> RunIterator for FontRunIterator<'_, E> {
    fn consume(&mut self) {
        debug_assert!(!self.at_end());
        let first = match decode_code_point(self.text, self.end_of_current_run) {
            Some((ch, width)) => {
                self.end_of_current_run += width;
                ch
            }
            None => return,
        };

        if self.primary.covers(first) {
            self.using_fallback = false;
        } else if self
            .fallback
            .as_ref()
            .map_or(false, |fallback| fallback.typeface.covers(first))
        {
            self.using_fallback = true;
        } else {
            // Replacing the slot releases the previous fallback's engine font.
            self.fallback = self
                .provider
                .match_family_style_character(None, self.primary.style(), first)
                .map(|typeface| {
                    let font = self.engine.create_font(&*typeface).map(Arc::new);
                    FallbackFont { typeface, font }
                });
            self.using_fallback = true;
        }

        while let Some((ch, width)) = decode_code_point(self.text, self.end_of_current_run) {
            // Leave fallback as soon as the primary can take over again.
            if self.using_fallback && self.primary.covers(ch) {
                return;
            }
            if !self.current_covers(ch) {
                return;
            }
            self.end_of_current_run += width;
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
    use std::cell::Cell;
    use std::sync::Arc;

    use super::*;
    use crate::engine::{RawGlyph, ShapeRequest};
    use crate::font::{FontMetrics, FontStyle};

    struct FakeFace {
        covered: fn(char) -> bool,
    }

    impl Typeface for FakeFace {
        fn data(&self) -> Arc<[u8]> {
            Arc::from(Vec::new())
        }

        fn units_per_em(&self) -> u16 {
            1000
        }

        fn covers(&self, c: char) -> bool {
            (self.covered)(c)
        }

        fn metrics(&self) -> FontMetrics {
            FontMetrics {
                ascent: 800.0,
                descent: 200.0,
                leading: 0.0,
                units_per_em: 1000,
            }
        }
    }

    struct FakeEngine;

    impl ShapingEngine for FakeEngine {
        type Font = ();

        fn create_font(&self, _typeface: &dyn Typeface) -> Option<()> {
            Some(())
        }

        fn font_scale(&self, _font: &()) -> (i32, i32) {
            (1000, 1000)
        }

        fn shape(&self, _font: &(), _request: &ShapeRequest<'_>) -> Vec<RawGlyph> {
            Vec::new()
        }
    }

    struct CountingProvider {
        fallback: Option<Arc<dyn Typeface>>,
        queries: Cell<usize>,
    }

    impl FontProvider for CountingProvider {
        fn default_typeface(&self) -> Option<Arc<dyn Typeface>> {
            self.fallback.clone()
        }

        fn match_family_style_character(
            &self,
            _family: Option<&str>,
            _style: FontStyle,
            c: char,
        ) -> Option<Arc<dyn Typeface>> {
            self.queries.set(self.queries.get() + 1);
            self.fallback
                .clone()
                .filter(|typeface| typeface.covers(c))
        }
    }

    fn is_ascii(c: char) -> bool {
        c.is_ascii()
    }

    fn is_cjk(c: char) -> bool {
        ('\u{4E00}'..='\u{9FFF}').contains(&c)
    }

    fn segment(text: &str, provider: &CountingProvider) -> Vec<(usize, bool)> {
        let engine = FakeEngine;
        let primary: Arc<dyn Typeface> = Arc::new(FakeFace { covered: is_ascii });
        let primary_font = engine.create_font(&*primary).map(Arc::new);
        let mut iterator =
            FontRunIterator::new(text.as_bytes(), primary, primary_font, &engine, provider);
        let mut out = Vec::new();
        while !iterator.at_end() {
            iterator.consume();
            out.push((
                iterator.end_of_current_run(),
                iterator.current_font().is_some(),
            ));
        }
        out
    }

    fn cjk_provider() -> CountingProvider {
        CountingProvider {
            fallback: Some(Arc::new(FakeFace { covered: is_cjk })),
            queries: Cell::new(0),
        }
    }

    #[test]
    fn covered_text_is_one_run() {
        let provider = cjk_provider();
        assert_eq!(segment("abc", &provider), vec![(3, true)]);
        assert_eq!(provider.queries.get(), 0);
    }

    #[test]
    fn fallback_run_ends_where_primary_resumes() {
        let provider = cjk_provider();
        let runs = segment("ab\u{4E2D}\u{6587}cd", &provider);
        assert_eq!(runs, vec![(2, true), (8, true), (10, true)]);
        assert_eq!(provider.queries.get(), 1);
    }

    #[test]
    fn cached_fallback_is_reused_across_runs() {
        let provider = cjk_provider();
        let runs = segment("a\u{4E2D}b\u{6587}c", &provider);
        assert_eq!(runs.len(), 5);
        // Second CJK run hits the cached fallback, not the provider.
        assert_eq!(provider.queries.get(), 1);
    }

    #[test]
    fn provider_miss_yields_fontless_run() {
        let provider = CountingProvider {
            fallback: None,
            queries: Cell::new(0),
        };
        let runs = segment("a\u{4E2D}b", &provider);
        assert_eq!(runs, vec![(1, true), (4, false), (5, true)]);
    }
}
