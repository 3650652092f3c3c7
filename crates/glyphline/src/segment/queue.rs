use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::RunIterator;

/// Min-priority queue over run iterators, keyed by the end of each
/// iterator's current run.
///
/// Iterators are registered under small ids that index the slice passed to
/// [`advance_runs`](Self::advance_runs); callers pass the iterators in the
/// same order every time.
pub(crate) struct RunSegmenterQueue {
    heap: BinaryHeap<Reverse<(usize, usize)>>,
}

impl RunSegmenterQueue {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    pub fn insert(&mut self, id: usize, iterator: &dyn RunIterator) {
        self.heap.push(Reverse((iterator.end_of_current_run(), id)));
    }

    /// Advance every iterator whose run ends at or before the least end,
    /// aligning all of them past the next aggregate boundary. Returns false
    /// once the input is exhausted.
    pub fn advance_runs(&mut self, iterators: &mut [&mut dyn RunIterator]) -> bool {
        let &Reverse((least_end, least_id)) = match self.heap.peek() {
            Some(entry) => entry,
            None => return false,
        };
        if iterators[least_id].at_end() {
            debug_assert!(iterators.iter().all(|iterator| iterator.at_end()));
            return false;
        }
        while let Some(&Reverse((end, id))) = self.heap.peek() {
            if end > least_end {
                break;
            }
            self.heap.pop();
            iterators[id].consume();
            let new_end = iterators[id].end_of_current_run();
            debug_assert!(new_end > end);
            self.heap.push(Reverse((new_end, id)));
        }
        true
    }

    /// End of the aggregate segment the iterators are currently aligned on.
    pub fn end_of_current_run(&self) -> usize {
        self.heap
            .peek()
            .map(|&Reverse((end, _))| end)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Iterator with scripted run boundaries.
    struct FakeIterator {
        ends: Vec<usize>,
        position: usize,
        current_end: usize,
    }

    impl FakeIterator {
        fn new(ends: Vec<usize>) -> Self {
            Self {
                ends,
                position: 0,
                current_end: 0,
            }
        }
    }

    impl RunIterator for FakeIterator {
        fn consume(&mut self) {
            self.current_end = self.ends[self.position];
            self.position += 1;
        }

        fn end_of_current_run(&self) -> usize {
            self.current_end
        }

        fn at_end(&self) -> bool {
            self.position == self.ends.len()
        }
    }

    fn boundaries(mut iterators: Vec<FakeIterator>) -> Vec<usize> {
        let mut queue = RunSegmenterQueue::new();
        for (id, iterator) in iterators.iter().enumerate() {
            queue.insert(id, iterator);
        }
        let mut out = Vec::new();
        loop {
            let advanced = {
                let mut refs: Vec<&mut dyn RunIterator> = iterators
                    .iter_mut()
                    .map(|iterator| iterator as &mut dyn RunIterator)
                    .collect();
                queue.advance_runs(&mut refs)
            };
            if !advanced {
                break;
            }
            out.push(queue.end_of_current_run());
        }
        out
    }

    #[test]
    fn single_iterator_boundaries_pass_through() {
        let out = boundaries(vec![FakeIterator::new(vec![3, 7, 10])]);
        assert_eq!(out, vec![3, 7, 10]);
    }

    #[test]
    fn aggregate_boundaries_are_the_union() {
        let out = boundaries(vec![
            FakeIterator::new(vec![4, 10]),
            FakeIterator::new(vec![2, 4, 10]),
            FakeIterator::new(vec![10]),
        ]);
        assert_eq!(out, vec![2, 4, 10]);
    }

    #[test]
    fn empty_input_never_advances() {
        let out = boundaries(vec![
            FakeIterator::new(Vec::new()),
            FakeIterator::new(Vec::new()),
        ]);
        assert!(out.is_empty());
    }
}
