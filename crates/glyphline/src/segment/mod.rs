//! Run segmentation: three independent walks over the input (bidi level,
//! script, font coverage) merged by a priority queue into aggregate segments
//! over which all three properties are constant.

mod bidi;
mod font;
mod queue;
mod script;

pub(crate) use bidi::BidiRunIterator;
pub(crate) use font::FontRunIterator;
pub(crate) use queue::RunSegmenterQueue;
pub(crate) use script::ScriptRunIterator;

/// A segmenter that walks the input and reports where its current
/// homogeneous run ends.
///
/// Freshly constructed iterators report an end of 0, so the queue's first
/// advance consumes every iterator exactly once.
pub(crate) trait RunIterator {
    /// Advance past the current run. Callers check `at_end` first.
    fn consume(&mut self);

    /// Exclusive end (byte offset) of the current run.
    fn end_of_current_run(&self) -> usize;

    fn at_end(&self) -> bool;
}
