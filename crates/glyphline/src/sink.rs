use crate::font::RunFont;
use crate::geom::Point;

/// Per-run metadata handed to the sink alongside its buffer.
#[derive(Debug, Clone, Copy)]
pub struct RunInfo {
    /// Zero-based line number, top to bottom.
    pub line_index: usize,
    /// Total advance of the source run (not just the emitted slice).
    pub run_advance: Point,
    /// Line ascent in device units (negative).
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
}

/// Output slots for one emitted run. `glyphs` and `positions` are required
/// and sized to the glyph count; sinks that want cluster indices or a copy
/// of the run's source bytes provide the optional slices.
pub struct RunBuffer<'a> {
    pub glyphs: &'a mut [u16],
    pub positions: &'a mut [Point],
    pub clusters: Option<&'a mut [u32]>,
    pub utf8_text: Option<&'a mut [u8]>,
}

/// Consumer of laid-out runs. Buffers are requested per run, in visual
/// order within each line, lines top to bottom.
pub trait RunSink {
    fn new_run_buffer(
        &mut self,
        info: &RunInfo,
        font: &RunFont,
        glyph_count: usize,
        utf8_len: usize,
    ) -> RunBuffer<'_>;
}

/// One run as captured by [`RunCollector`].
#[derive(Clone)]
pub struct CollectedRun {
    pub line_index: usize,
    pub font: RunFont,
    pub advance: Point,
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
    pub glyphs: Vec<u16>,
    pub positions: Vec<Point>,
    pub clusters: Vec<u32>,
    pub utf8: Vec<u8>,
}

/// A [`RunSink`] that owns its buffers, for inspection and tests.
#[derive(Default)]
pub struct RunCollector {
    runs: Vec<CollectedRun>,
}

impl RunCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured runs in emission order.
    pub fn runs(&self) -> &[CollectedRun] {
        &self.runs
    }

    /// Number of lines emitted so far.
    pub fn line_count(&self) -> usize {
        self.runs
            .iter()
            .map(|run| run.line_index + 1)
            .max()
            .unwrap_or(0)
    }

    /// Runs belonging to one line, in visual order.
    pub fn line(&self, line_index: usize) -> impl Iterator<Item = &CollectedRun> {
        self.runs
            .iter()
            .filter(move |run| run.line_index == line_index)
    }

    pub fn clear(&mut self) {
        self.runs.clear();
    }
}

impl RunSink for RunCollector {
    fn new_run_buffer(
        &mut self,
        info: &RunInfo,
        font: &RunFont,
        glyph_count: usize,
        utf8_len: usize,
    ) -> RunBuffer<'_> {
        let index = self.runs.len();
        self.runs.push(CollectedRun {
            line_index: info.line_index,
            font: font.clone(),
            advance: info.run_advance,
            ascent: info.ascent,
            descent: info.descent,
            leading: info.leading,
            glyphs: vec![0; glyph_count],
            positions: vec![Point::ZERO; glyph_count],
            clusters: vec![0; glyph_count],
            utf8: vec![0; utf8_len],
        });
        let run = &mut self.runs[index];
        RunBuffer {
            glyphs: &mut run.glyphs,
            positions: &mut run.positions,
            clusters: Some(&mut run.clusters),
            utf8_text: Some(&mut run.utf8),
        }
    }
}
