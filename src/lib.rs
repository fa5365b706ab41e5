//! # `counter_meter`
//!
//! A live, self-overwriting progress counter for command-line tools.
//!
//! A caller bumps a counter as work proceeds; a background thread renders it every
//! period to an output stream (usually stderr), overwriting the previous line with a
//! carriage return and showing a spinner until the first unit of work is counted.
//!
//! * **Non-blocking**: [`Progress::inc`] and [`Progress::add`] are a single atomic add and
//!   never contend with rendering.
//! * **Restartable**: every [`Progress::start`] opens a new generation; stale renderers
//!   notice and exit without writing.
//! * **Optional**: [`NoProgressMeter`] implements the same contract with zero overhead for
//!   when output is not a terminal.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use counter_meter::Progress as _;
//!
//! let meter = counter_meter::for_stderr(Duration::from_millis(500));
//! meter.start("Processing objects: %d");
//! for _ in 0..1_000 {
//!     meter.inc();
//! }
//! meter.done();
//! ```
//!
//! ## Modules
//!
//! * [`progress`]: The [`Progress`] contract and the null meter.
//! * [`meter`]: The rendering [`ProgressMeter`] and its snapshots.
//! * [`builder`]: Configuration of period, spinner glyphs and error hooks.
//! * [`template`]: Line layout and spinner glyphs.
//! * [`error`]: Render failures absorbed by the meter.
//! * [`io`]: [`std::io::Read`]/[`std::io::Write`] wrappers that count bytes.
//! * [`iter`]: Extension traits for counting iterator items.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod builder;
pub mod error;
pub mod io;
pub mod iter;
pub mod meter;
pub mod progress;
pub mod template;

#[cfg(test)]
mod testing;

pub use builder::MeterBuilder;
pub use error::RenderError;
pub use iter::{ProgressIter, ProgressIteratorExt};
pub use meter::{MIN_PERIOD, MeterSnapshot, ProgressMeter};
pub use progress::{NoProgressMeter, Progress, for_stderr, select};
