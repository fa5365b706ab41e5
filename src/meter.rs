//! The live progress meter and its background renderer.
//!
//! [`ProgressMeter`] follows the same "Hot/Cold" split as the rest of the crate:
//!
//! * **Hot Data:** The count lives in an [`AtomicI64`]. [`inc`](Progress::inc) and
//!   [`add`](Progress::add) only ever touch it, so counting never blocks on rendering.
//! * **Cold Data:** The template, spinner position, last shown count, generation and
//!   the sink itself sit behind a [`Mutex`](parking_lot::Mutex). Only `start`, `done`
//!   and the live renderer take it.
//!
//! # Generations
//!
//! Every `start` issues a fresh generation number and spawns a renderer thread that
//! remembers it. On each wake the renderer compares its number with the live one under
//! the lock and exits on mismatch, so a superseded renderer can never write. `done`
//! clears the live generation and writes the final line itself. Both transitions also
//! signal a condition variable, so a superseded renderer exits without waiting out its
//! period.

use std::{
    fmt,
    io::{self, Write},
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
    thread,
    time::Duration,
};

use compact_str::CompactString;
use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace, warn};
use web_time::Instant;

use crate::{
    Progress,
    builder::MeterBuilder,
    error::{ErrorHook, RenderError},
    template::{CLEAR_STATUS, Glyphs, NEWLINE, OVERWRITE, Template},
};

/// Shortest render period; shorter ones (including zero) are raised to it.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A [`Progress`] that periodically renders a counter to a [`Write`] sink.
///
/// Each render overwrites the previous one with a carriage return; the final render
/// from [`done`](Progress::done) ends with a newline so the line survives.
///
/// Cloning is cheap (Arc bump); all clones drive the same display.
pub struct ProgressMeter<W> {
    shared: Arc<Shared<W>>,
}

pub(crate) struct Shared<W> {
    count: Arc<AtomicI64>,
    state: Mutex<State<W>>,
    wake: Condvar,
    period: Duration,
    glyphs: Glyphs,
    thread_name: CompactString,
    on_error: Option<ErrorHook>,
}

struct State<W> {
    sink: W,
    template: Template,
    /// Count written by the most recent render, -1 before the first one.
    last_shown: i64,
    spinner_index: usize,
    /// The live generation; `None` while inert.
    generation: Option<u64>,
    /// Last generation number handed out.
    issued: u64,
    started: Option<Instant>,
    stopped: Option<Instant>,
}

impl<W: Write> State<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let sink = &mut self.sink;
        sink.write_all(line.as_bytes()).and_then(|()| sink.flush())
    }
}

impl<W> Clone for ProgressMeter<W> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<W> fmt::Debug for ProgressMeter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The sink is usually not Debug; report only the hot counter and fixed config.
        f.debug_struct("ProgressMeter")
            .field("count", &self.count())
            .field("period", &self.shared.period)
            .finish_non_exhaustive()
    }
}

impl<W: Write + Send + 'static> ProgressMeter<W> {
    /// Creates an inert meter rendering to `sink` every `period`.
    ///
    /// Nothing runs until [`start`](Progress::start) is called. Use [`MeterBuilder`] to
    /// customize the spinner or observe render failures.
    #[must_use]
    pub fn new(sink: W, period: Duration) -> Self {
        MeterBuilder::new().period(period).build(sink)
    }
}

impl<W> ProgressMeter<W> {
    /// `period` is raised to [`MIN_PERIOD`] if shorter.
    pub(crate) fn from_parts(
        sink: W,
        count: Arc<AtomicI64>,
        period: Duration,
        glyphs: Glyphs,
        thread_name: CompactString,
        on_error: Option<ErrorHook>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                count,
                state: Mutex::new(State {
                    sink,
                    template: Template::default(),
                    last_shown: -1,
                    spinner_index: 0,
                    generation: None,
                    issued: 0,
                    started: None,
                    stopped: None,
                }),
                wake: Condvar::new(),
                period: period.max(MIN_PERIOD),
                glyphs,
                thread_name,
                on_error,
            }),
        }
    }

    /// Reads the current count.
    #[must_use]
    pub fn count(&self) -> i64 {
        self.shared.count.load(Ordering::Relaxed)
    }

    /// Returns a shared reference to the atomic counter.
    ///
    /// Useful for handing the counter to a system that only knows about atomics. Note
    /// that every `start` resets it to zero.
    #[must_use]
    pub fn counter(&self) -> Arc<AtomicI64> {
        Arc::clone(&self.shared.count)
    }

    /// The render period this meter was built with.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.shared.period
    }

    /// Creates a consistent snapshot of the meter's display state.
    ///
    /// This acquires the display lock, so it briefly contends with the renderer.
    #[must_use]
    pub fn snapshot(&self) -> MeterSnapshot {
        let state = self.shared.state.lock();
        let elapsed = state.started.map(|start| {
            state
                .stopped
                .map_or_else(|| start.elapsed(), |stopped| stopped.duration_since(start))
        });

        MeterSnapshot {
            generation: state.generation,
            count: self.shared.count.load(Ordering::SeqCst),
            last_shown: (state.last_shown >= 0).then_some(state.last_shown),
            spinner_index: state.spinner_index,
            elapsed,
        }
    }
}

impl<W> Shared<W> {
    fn report(&self, err: RenderError) {
        if let Some(hook) = &self.on_error {
            hook(&err);
        }
    }
}

impl<W: Write + Send + 'static> Shared<W> {
    /// Renders one periodic line for `generation`, which must be live.
    fn tick(&self, state: &mut State<W>, generation: u64) -> Result<(), RenderError> {
        let count = self.count.load(Ordering::SeqCst);
        let status = if count == 0 {
            self.glyphs.advance(&mut state.spinner_index)
        } else {
            ""
        };
        let line = state.template.render(count, status, OVERWRITE);
        state.last_shown = count;
        state
            .write_line(&line)
            .map_err(|source| RenderError::Write { generation, source })
    }

    /// Body of the background renderer for one generation.
    fn run(self: Arc<Self>, generation: u64) {
        let Some(mut deadline) = Instant::now().checked_add(self.period) else {
            self.park(generation);
            return;
        };

        loop {
            let mut state = self.state.lock();
            loop {
                if state.generation != Some(generation) {
                    trace!(generation, "renderer superseded, exiting");
                    return;
                }
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                self.wake.wait_for(&mut state, deadline - now);
            }

            // Every handle is gone; nobody will ever call `done`.
            if Arc::strong_count(&self) == 1 {
                debug!(generation, "meter dropped while running, renderer exiting");
                return;
            }

            let result = self.tick(&mut state, generation);
            drop(state);
            if let Err(err) = result {
                debug!(generation, error = %err, "periodic render failed");
                self.report(err);
            }

            match self.next_deadline(deadline) {
                Some(next) => deadline = next,
                None => {
                    self.park(generation);
                    return;
                }
            }
        }
    }

    /// The tick after `previous`, skipping ticks already missed (slow sink or
    /// suspended process). `None` once the clock cannot represent it.
    fn next_deadline(&self, previous: Instant) -> Option<Instant> {
        let now = Instant::now();
        match previous.checked_add(self.period) {
            Some(next) if next > now => Some(next),
            _ => now.checked_add(self.period),
        }
    }

    /// Waits without rendering until `generation` is no longer live.
    ///
    /// Used when the period is too long for the clock: only `done` will ever render.
    fn park(&self, generation: u64) {
        trace!(generation, "render period out of clock range, waiting for done");
        let mut state = self.state.lock();
        while state.generation == Some(generation) {
            self.wake.wait(&mut state);
        }
    }
}

impl<W: Write + Send + 'static> Progress for ProgressMeter<W> {
    fn start(&self, format: &str) {
        let generation = {
            let mut state = self.shared.state.lock();
            state.template = Template::parse(format);
            self.shared.count.store(0, Ordering::SeqCst);
            state.last_shown = -1;
            state.spinner_index = 0;
            state.issued += 1;
            let generation = state.issued;
            if let Some(previous) = state.generation.replace(generation) {
                trace!(previous, generation, "superseding running generation");
            }
            state.started = Some(Instant::now());
            state.stopped = None;
            self.shared.wake.notify_all();
            generation
        };

        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name(self.shared.thread_name.to_string())
            .spawn(move || shared.run(generation));

        match spawned {
            Ok(_) => debug!(generation, period = ?self.shared.period, "progress meter started"),
            Err(source) => {
                warn!(generation, error = %source, "could not spawn progress renderer");
                self.shared.report(RenderError::Spawn(source));
            }
        }
    }

    fn inc(&self) {
        self.shared.count.fetch_add(1, Ordering::Relaxed);
    }

    fn add(&self, delta: i64) {
        self.shared.count.fetch_add(delta, Ordering::Relaxed);
    }

    fn done(&self) {
        let mut state = self.shared.state.lock();
        let Some(generation) = state.generation.take() else {
            trace!("done() called on an inert meter");
            return;
        };
        self.shared.wake.notify_all();
        state.stopped = Some(Instant::now());

        let count = self.shared.count.load(Ordering::SeqCst);
        let line = state.template.render(count, CLEAR_STATUS, NEWLINE);
        state.last_shown = count;
        let result = state.write_line(&line);
        drop(state);

        debug!(generation, count, "progress meter finished");
        if let Err(source) = result {
            warn!(generation, error = %source, "final progress render failed");
            self.shared.report(RenderError::Write { generation, source });
        }
    }
}

/// A plain-data snapshot of a [`ProgressMeter`] at a specific point in time.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeterSnapshot {
    generation: Option<u64>,
    count: i64,
    last_shown: Option<i64>,
    spinner_index: usize,
    elapsed: Option<Duration>,
}

impl MeterSnapshot {
    /// The live generation, or `None` if the meter is inert.
    #[must_use]
    pub const fn generation(&self) -> Option<u64> {
        self.generation
    }

    /// Whether a generation is currently running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.generation.is_some()
    }

    /// The counter value at snapshot time.
    #[must_use]
    pub const fn count(&self) -> i64 {
        self.count
    }

    /// The count written by the most recent render of this generation, if any.
    #[must_use]
    pub const fn last_shown(&self) -> Option<i64> {
        self.last_shown
    }

    /// Position in the spinner sequence.
    #[must_use]
    pub const fn spinner_index(&self) -> usize {
        self.spinner_index
    }

    /// Time since the last `start`, frozen at `done`. `None` if never started.
    #[must_use]
    pub const fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }
}
