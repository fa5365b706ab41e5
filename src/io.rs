//! I/O wrappers for counting transferred bytes.
//!
//! [`ProgressReader`] and [`ProgressWriter`] wrap any [`Read`] or [`Write`] and
//! [`add`](Progress::add) the number of bytes each successful call moved. Pair them with
//! a `"%d bytes"` format for a live byte counter on downloads, copies or hashing.
//!
//! They only count: starting and finishing the display stays with the caller.

use std::io::{self, Read, Write};

use crate::Progress;

fn delta(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// A wrapper around [`Read`] that counts bytes read into a [`Progress`].
pub struct ProgressReader<R, P> {
    inner: R,
    progress: P,
}

impl<R, P> ProgressReader<R, P> {
    /// Creates a new `ProgressReader` wrapping `inner`, counting into `progress`.
    pub const fn new(inner: R, progress: P) -> Self {
        Self { inner, progress }
    }

    /// Unwraps the reader, returning the inner reader and the meter.
    pub fn into_parts(self) -> (R, P) {
        (self.inner, self.progress)
    }
}

impl<R: Read, P: Progress> Read for ProgressReader<R, P> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.progress.add(delta(n));
        Ok(n)
    }
}

/// A wrapper around [`Write`] that counts bytes written into a [`Progress`].
pub struct ProgressWriter<W, P> {
    inner: W,
    progress: P,
}

impl<W, P> ProgressWriter<W, P> {
    /// Creates a new `ProgressWriter` wrapping `inner`, counting into `progress`.
    pub const fn new(inner: W, progress: P) -> Self {
        Self { inner, progress }
    }

    /// Unwraps the writer, returning the inner writer and the meter.
    pub fn into_parts(self) -> (W, P) {
        (self.inner, self.progress)
    }
}

impl<W: Write, P: Progress> Write for ProgressWriter<W, P> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.progress.add(delta(n));
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{self, Cursor, Read as _, Write as _},
        time::Duration,
    };

    use super::{ProgressReader, ProgressWriter};
    use crate::{Progress, ProgressMeter, testing::Capture};

    /// Reader Tracking
    /// Bytes read show up in the meter's final line.
    #[test]
    fn test_io_reader() {
        let sink = Capture::default();
        let meter = ProgressMeter::new(sink.clone(), Duration::from_secs(30));
        meter.start("%d bytes");

        let data = vec![0u8; 100];
        let mut reader = ProgressReader::new(Cursor::new(&data), &meter);
        let mut buf = [0u8; 10];
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(meter.count(), 10);

        io::copy(&mut reader, &mut io::sink()).unwrap();
        meter.done();

        assert!(sink.contents().starts_with("100 bytes   "));
    }

    /// Writer Tracking
    #[test]
    fn test_io_writer() {
        let meter = ProgressMeter::new(Capture::default(), Duration::from_secs(30));
        meter.start("%d");

        let mut writer = ProgressWriter::new(Vec::new(), meter.clone());
        writer.write_all(&[1, 2, 3, 4, 5]).unwrap();
        let (inner, _) = writer.into_parts();

        assert_eq!(inner.len(), 5);
        assert_eq!(meter.count(), 5);
        meter.done();
    }
}
