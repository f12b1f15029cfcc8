//! Byte sources and the adapters that open them.
//!
//! A [`ByteSource`] is a sequential, non-seekable handle: it hands out bytes in
//! order and can be released once. A [`SourceAdapter`] knows how to produce a
//! fresh `ByteSource` for one location and how large that location is.
//! [`VideoReader`](crate::VideoReader) only ever talks to these two traits.

mod local;
mod memory;
mod remote;

pub use local::LocalFile;
pub use memory::{MemorySource, SourceCounters};
pub use remote::{browser_headers, RemoteHttp, RemoteOptions, REMOTE_SCHEMES};

use std::io::Read;

use crate::{Error, Result};

/// An opened, sequentially readable, closable stream of bytes.
pub trait ByteSource: Send {
    /// Read up to `len` bytes, advancing the source.
    ///
    /// Fewer than `len` bytes are returned only when the source is exhausted.
    fn read_up_to(&mut self, len: usize) -> Result<Vec<u8>>;

    /// Drain every remaining byte.
    fn read_remaining(&mut self) -> Result<Vec<u8>>;

    /// Release the underlying handle or connection.
    fn close(&mut self) -> Result<()>;
}

/// Something that can open a [`ByteSource`] for a location, possibly many times.
pub trait SourceAdapter: Send {
    /// The path or URL this adapter reads.
    fn location(&self) -> &str;

    /// Open a new byte source positioned at byte 0.
    fn open(&mut self) -> Result<Box<dyn ByteSource>>;

    /// Best-effort total length, as learned by the most recent [`open`](Self::open).
    fn total_size(&self) -> Option<u64>;
}

/// Initial allocation cap for a single read, so a huge request does not
/// reserve memory the source cannot fill.
const READ_CHUNK_HINT: usize = 64 * 1024;

/// [`ByteSource`] over any [`Read`] implementation.
pub struct ReaderSource<R> {
    inner: Option<R>,
}

impl<R: Read + Send> ReaderSource<R> {
    /// Wrap a reader.
    pub fn new(inner: R) -> Self {
        Self { inner: Some(inner) }
    }

    fn inner(&mut self) -> Result<&mut R> {
        self.inner.as_mut().ok_or(Error::Closed)
    }
}

impl<R: Read + Send> ByteSource for ReaderSource<R> {
    fn read_up_to(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(len.min(READ_CHUNK_HINT));
        self.inner()?.take(len as u64).read_to_end(&mut out)?;
        Ok(out)
    }

    fn read_remaining(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.inner()?.read_to_end(&mut out)?;
        Ok(out)
    }

    fn close(&mut self) -> Result<()> {
        self.inner = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reader_source_reads_in_order() {
        let mut source = ReaderSource::new(Cursor::new(b"abcdefgh".to_vec()));
        assert_eq!(source.read_up_to(3).unwrap(), b"abc");
        assert_eq!(source.read_up_to(0).unwrap(), b"");
        assert_eq!(source.read_up_to(2).unwrap(), b"de");
        assert_eq!(source.read_remaining().unwrap(), b"fgh");
        assert!(source.read_up_to(4).unwrap().is_empty());
    }

    #[test]
    fn test_reader_source_short_at_end() {
        let mut source = ReaderSource::new(Cursor::new(b"xy".to_vec()));
        assert_eq!(source.read_up_to(10).unwrap(), b"xy");
    }

    #[test]
    fn test_reader_source_closed() {
        let mut source = ReaderSource::new(Cursor::new(b"xy".to_vec()));
        source.close().unwrap();
        assert!(matches!(source.read_up_to(1), Err(Error::Closed)));
        assert!(matches!(source.read_remaining(), Err(Error::Closed)));
    }
}
