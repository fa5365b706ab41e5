//! Fluent interface for constructing [`ProgressMeter`] instances.
//!
//! [`ProgressMeter::new`] covers the common case of a sink and a period. The
//! [`MeterBuilder`] is the configuration surface for everything else:
//!
//! * **Spinner:** Replace the idle animation with any sequence of glyphs, e.g. a
//!   deterministic one in tests or braille dots on capable terminals.
//! * **Error Observation:** Render failures are absorbed by default. Install a hook to
//!   find out about a sink that keeps failing.
//! * **Shared State:** Inject an existing `Arc<AtomicI64>` so a foreign system can count
//!   into the meter directly.

use std::{
    io::Write,
    sync::{Arc, atomic::AtomicI64},
    time::Duration,
};

use compact_str::CompactString;

use crate::{
    error::{ErrorHook, RenderError},
    meter::ProgressMeter,
    template::Glyphs,
};

/// Render period used when none is configured.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(500);

const DEFAULT_THREAD_NAME: &str = "progress-meter";

/// A builder pattern for configuring [`ProgressMeter`] instances.
#[must_use]
pub struct MeterBuilder {
    period: Duration,
    glyphs: Glyphs,
    thread_name: CompactString,
    on_error: Option<ErrorHook>,
    counter: Option<Arc<AtomicI64>>,
}

impl Default for MeterBuilder {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            glyphs: Glyphs::default(),
            thread_name: CompactString::const_new(DEFAULT_THREAD_NAME),
            on_error: None,
            counter: None,
        }
    }
}

impl MeterBuilder {
    /// Starts a builder with the default period and spinner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time between periodic renders.
    ///
    /// Periods shorter than [`MIN_PERIOD`](crate::MIN_PERIOD) (including zero) are raised to it. A period
    /// too long for the clock to represent disables periodic renders; only the final
    /// line from `done` is written.
    pub const fn period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Sets the spinner glyphs cycled through while the count is zero.
    ///
    /// An empty sequence leaves the status cell blank.
    pub fn glyphs<I, S>(mut self, glyphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        self.glyphs = Glyphs::new(glyphs);
        self
    }

    /// Names the background renderer threads.
    pub fn thread_name(mut self, name: impl Into<CompactString>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Installs a callback for render failures.
    ///
    /// The hook runs on the renderer thread (or the thread calling `done`) after the
    /// display lock has been released, so it may safely call back into the meter.
    pub fn on_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&RenderError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Uses a pre-existing atomic as the meter's counter.
    ///
    /// The meter still resets it to zero on every `start`.
    pub fn with_counter(mut self, counter: Arc<AtomicI64>) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Consumes the builder and returns an inert meter writing to `sink`.
    #[must_use]
    pub fn build<W: Write + Send + 'static>(self, sink: W) -> ProgressMeter<W> {
        ProgressMeter::from_parts(
            sink,
            self.counter
                .unwrap_or_else(|| Arc::new(AtomicI64::new(0))),
            self.period,
            self.glyphs,
            self.thread_name,
            self.on_error,
        )
    }
}
