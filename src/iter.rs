//! Iterator adapters for automatic counting.
//!
//! [`ProgressIteratorExt`] attaches a [`Progress`] to any [`Iterator`]: every yielded
//! item is an [`inc`](Progress::inc), and exhausting the iterator calls
//! [`done`](Progress::done) once.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use counter_meter::{ProgressIteratorExt as _, ProgressMeter};
//!
//! let meter = ProgressMeter::new(std::io::stderr(), Duration::from_millis(200));
//! for path in ["a.txt", "b.txt"].into_iter().progress_started(&meter, "Scanned %d files") {
//!     // ...
//! #   let _ = path;
//! }
//! ```

use crate::Progress;

/// An iterator adapter that counts yielded items into a [`Progress`].
pub struct ProgressIter<I, P: Progress> {
    iter: I,
    progress: P,
    finished: bool,
}

impl<I, P: Progress> ProgressIter<I, P> {
    /// Creates a new `ProgressIter`.
    ///
    /// Note: This is usually constructed via [`ProgressIteratorExt`] methods.
    pub const fn new(iter: I, progress: P) -> Self {
        Self {
            iter,
            progress,
            finished: false,
        }
    }

    /// Returns the meter this iterator counts into.
    pub const fn progress(&self) -> &P {
        &self.progress
    }
}

impl<I: Iterator, P: Progress> Iterator for ProgressIter<I, P> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.iter.next();

        if item.is_some() {
            self.progress.inc();
        } else if !self.finished {
            self.finished = true;
            self.progress.done();
        }

        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Extension trait to attach a [`Progress`] to any Iterator.
pub trait ProgressIteratorExt: Sized {
    /// Counts items into an already started `progress`.
    fn progress_with<P: Progress>(self, progress: P) -> ProgressIter<Self, P>;

    /// Starts `progress` with `format` and counts items into it.
    fn progress_started<P: Progress>(self, progress: P, format: &str) -> ProgressIter<Self, P>;
}

impl<I: Iterator> ProgressIteratorExt for I {
    fn progress_with<P: Progress>(self, progress: P) -> ProgressIter<Self, P> {
        ProgressIter::new(self, progress)
    }

    fn progress_started<P: Progress>(self, progress: P, format: &str) -> ProgressIter<Self, P> {
        progress.start(format);
        ProgressIter::new(self, progress)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::ProgressIteratorExt as _;
    use crate::{NoProgressMeter, ProgressMeter, testing::{Capture, final_line}};

    /// Iterator Integration
    /// Items are counted and exhaustion finishes the display exactly once.
    #[test]
    fn test_iterator_adapter() {
        let sink = Capture::default();
        let meter = ProgressMeter::new(sink.clone(), Duration::from_secs(30));
        let data = [1, 2, 3, 4, 5];

        let mut iter = data.iter().progress_started(&meter, "items=%d");
        let mut count = 0;
        for _ in iter.by_ref() {
            count += 1;
        }
        // Polling past the end must not finish twice.
        assert!(iter.next().is_none());

        assert_eq!(count, 5);
        assert_eq!(sink.contents(), final_line("items=", 5));
        assert!(!meter.snapshot().is_running());
    }

    /// Disabled Display
    #[test]
    fn test_iterator_with_null_meter() {
        let sum: i32 = (1..=4).progress_with(NoProgressMeter).sum();
        assert_eq!(sum, 10);
    }
}
