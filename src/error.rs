//! Failures that can occur on the background render path.
//!
//! None of these are ever returned from [`Progress`](crate::Progress) operations: the
//! meter is meant to be callable unconditionally from hot loops. They are logged and,
//! if the caller installed one via [`MeterBuilder::on_error`](crate::MeterBuilder::on_error),
//! handed to an observation hook.

use std::{io, sync::Arc};

/// An error raised while rendering a progress line.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Writing (or flushing) a rendered line to the sink failed.
    #[error("failed to write progress line for generation {generation}")]
    Write {
        /// The generation whose render failed.
        generation: u64,
        /// The underlying sink error.
        #[source]
        source: io::Error,
    },

    /// The background renderer thread could not be spawned.
    ///
    /// The generation still runs; only the final line from `done()` will be shown.
    #[error("failed to spawn progress renderer thread")]
    Spawn(#[source] io::Error),
}

/// Callback invoked with every [`RenderError`] the meter absorbs.
pub type ErrorHook = Arc<dyn Fn(&RenderError) + Send + Sync>;

#[cfg(test)]
mod tests {
    use std::{error::Error as _, io};

    use super::RenderError;

    /// Error Messages
    /// Verifies the display text and that the io error is kept as the source.
    #[test]
    fn test_write_error_source() {
        let err = RenderError::Write {
            generation: 3,
            source: io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"),
        };

        assert_eq!(
            err.to_string(),
            "failed to write progress line for generation 3"
        );
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("pipe closed"));
    }
}
