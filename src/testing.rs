//! Shared fixtures for unit tests.

use std::{
    io::{self, Write},
    sync::Arc,
};

use parking_lot::Mutex;

/// An in-memory sink whose clones all append to the same buffer.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A sink that rejects every write.
pub struct FailingSink;

impl Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Splits captured output into `(body, terminator)` pairs.
pub fn renders(out: &str) -> Vec<(&str, char)> {
    out.split_inclusive(['\r', '\n'])
        .filter_map(|piece| {
            let terminator = piece.chars().last()?;
            matches!(terminator, '\r' | '\n').then(|| (&piece[..piece.len() - 1], terminator))
        })
        .collect()
}

/// Splits a render of a `"<prefix>%d"` template into its count and status cell.
pub fn parse_render<'a>(body: &'a str, prefix: &str) -> Option<(i64, &'a str)> {
    let rest = body.strip_prefix(prefix)?;
    let digits = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '-'))
        .unwrap_or(rest.len());
    let count = rest[..digits].parse().ok()?;
    let status = rest[digits..]
        .strip_prefix("   ")?
        .strip_suffix(&" ".repeat(20)[..])?;
    Some((count, status))
}

/// The final line for a `"<prefix>%d"` template.
pub fn final_line(prefix: &str, count: i64) -> String {
    format!("{prefix}{count}    {}\n", " ".repeat(20))
}

/// Routes `tracing` output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
