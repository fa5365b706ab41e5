//! The progress contract shared by every meter.
//!
//! [`Progress`] is the capability set callers program against: `start` a display,
//! `inc`/`add` as work completes, `done` to finish. Two implementations are provided:
//!
//! * [`ProgressMeter`]: renders to a sink on a background thread.
//! * [`NoProgressMeter`]: does nothing at all, for when display is disabled (typically
//!   because the output is not a terminal).
//!
//! Choosing between them is up to the caller; [`for_stderr`] covers the usual case.

use std::{
    io::{self, IsTerminal as _},
    sync::Arc,
    time::Duration,
};

use crate::meter::ProgressMeter;

/// A counter that can be displayed while it grows.
///
/// None of the operations return errors, so they can be called unconditionally in hot
/// loops. [`inc`](Self::inc) and [`add`](Self::add) must never block.
pub trait Progress: Send + Sync {
    /// Begins a new display generation, resetting the count to zero.
    ///
    /// `format` should contain one `%d`, which is replaced by the current count. A width
    /// and a `-` or `0` flag are honored (`%8d`, `%-8d`, `%08d`); `%%` is a literal `%`.
    /// Other `%` sequences are printed as-is.
    fn start(&self, format: &str);

    /// Increments the count by one.
    fn inc(&self);

    /// Adds `delta` to the count. Callers are expected to pass non-negative values.
    fn add(&self, delta: i64);

    /// Stops the display, writing the final count on its own line.
    ///
    /// The meter can be restarted afterwards. Calling `done` on a meter that is not
    /// running (never started, or already done) writes nothing.
    fn done(&self);
}

/// A [`Progress`] that doesn't report anything.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NoProgressMeter;

impl Progress for NoProgressMeter {
    fn start(&self, _format: &str) {}

    fn inc(&self) {}

    fn add(&self, _delta: i64) {}

    fn done(&self) {}
}

impl<P: Progress + ?Sized> Progress for &P {
    fn start(&self, format: &str) {
        (**self).start(format);
    }

    fn inc(&self) {
        (**self).inc();
    }

    fn add(&self, delta: i64) {
        (**self).add(delta);
    }

    fn done(&self) {
        (**self).done();
    }
}

impl<P: Progress + ?Sized> Progress for Box<P> {
    fn start(&self, format: &str) {
        (**self).start(format);
    }

    fn inc(&self) {
        (**self).inc();
    }

    fn add(&self, delta: i64) {
        (**self).add(delta);
    }

    fn done(&self) {
        (**self).done();
    }
}

impl<P: Progress + ?Sized> Progress for Arc<P> {
    fn start(&self, format: &str) {
        (**self).start(format);
    }

    fn inc(&self) {
        (**self).inc();
    }

    fn add(&self, delta: i64) {
        (**self).add(delta);
    }

    fn done(&self) {
        (**self).done();
    }
}

/// Returns a meter on standard error if it is a terminal, otherwise [`NoProgressMeter`].
#[must_use]
pub fn for_stderr(period: Duration) -> Box<dyn Progress> {
    if io::stderr().is_terminal() {
        Box::new(ProgressMeter::new(io::stderr(), period))
    } else {
        Box::new(NoProgressMeter)
    }
}

/// Picks between a [`ProgressMeter`] on `sink` and [`NoProgressMeter`].
#[must_use]
pub fn select<W>(enabled: bool, sink: W, period: Duration) -> Box<dyn Progress>
where
    W: io::Write + Send + 'static,
{
    if enabled {
        Box::new(ProgressMeter::new(sink, period))
    } else {
        Box::new(NoProgressMeter)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread, time::Duration};

    use super::{NoProgressMeter, Progress, select};
    use crate::testing::Capture;

    /// Null Meter Is Silent
    /// Hammering the null meter from many threads writes nothing anywhere.
    #[test]
    fn test_null_meter_concurrent() {
        let meter = Arc::new(NoProgressMeter);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let m = Arc::clone(&meter);
                thread::spawn(move || {
                    m.start("%d");
                    for i in 0..1000 {
                        m.inc();
                        m.add(i);
                    }
                    m.done();
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }
    }

    /// Selection
    /// A disabled selection never touches the sink; an enabled one does.
    #[test]
    fn test_select() {
        let sink = Capture::default();
        let off = select(false, sink.clone(), Duration::from_millis(1));
        off.start("%d");
        off.inc();
        thread::sleep(Duration::from_millis(20));
        off.done();
        assert!(sink.contents().is_empty());

        let on = select(true, sink.clone(), Duration::from_secs(30));
        on.start("%d");
        on.inc();
        on.done();
        assert!(sink.contents().starts_with("1   "));
    }

    /// Forwarding Impls
    /// References and boxes drive the same underlying meter.
    #[test]
    fn test_forwarding() {
        let sink = Capture::default();
        let meter = crate::ProgressMeter::new(sink.clone(), Duration::from_secs(30));

        fn bump(p: impl Progress) {
            p.add(2);
        }

        let by_ref: &dyn Progress = &meter;
        by_ref.start("%d");
        bump(&meter);
        Box::new(meter.clone()).inc();
        meter.done();

        assert!(sink.contents().starts_with("3   "));
    }
}
