//! The buffered, refreshable video reader.

use std::fmt;
use std::io;

use crate::decode::{self, ByteOrder, Charset, MAX_INT_WIDTH};
use crate::paths::video_extension;
use crate::source::{ByteSource, LocalFile, RemoteHttp, RemoteOptions, SourceAdapter};
use crate::{Error, Result};

/// Default buffer capacity (1 MiB).
pub const DEFAULT_MAX_BUFFER_LENGTH: usize = 1024 * 1024;

/// Options for opening a [`VideoReader`].
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Bytes mirrored in memory before the buffer is abandoned.
    pub max_buffer_length: usize,
    /// Settings used when the location is remote.
    pub remote: RemoteOptions,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            max_buffer_length: DEFAULT_MAX_BUFFER_LENGTH,
            remote: RemoteOptions::default(),
        }
    }
}

/// Sequential reader over a video location with a cheap rewind.
///
/// Every byte handed out is mirrored into an in-memory buffer until the
/// buffer grows past its capacity. [`refresh`](Self::refresh) moves the read
/// position back to byte 0: while the buffer is intact this costs no I/O; once
/// it has overflowed, the source is closed and opened again.
///
/// Reads return the same bytes whether they come from the buffer, from the
/// source, or from both.
///
/// # Example
///
/// ```no_run
/// use vidcursor_io::{ByteOrder, ReaderOptions, VideoReader};
///
/// let mut reader = VideoReader::open("movie.mp4", &ReaderOptions::default())?;
/// let size = reader.read_int(4, ByteOrder::Big)?;
/// let kind = reader.read_text(4, "ascii".parse()?)?;
///
/// // Start over for the metadata pass; served from memory.
/// reader.refresh()?;
/// let header = reader.read(size as usize)?;
/// # let _ = (kind, header);
/// # Ok::<(), vidcursor_io::Error>(())
/// ```
pub struct VideoReader {
    adapter: Box<dyn SourceAdapter>,
    source: Option<Box<dyn ByteSource>>,
    capacity: usize,
    total_size: Option<u64>,
    buffer: Vec<u8>,
    /// Offset in `buffer` of the next byte to hand out.
    cursor: usize,
}

impl VideoReader {
    /// Open `location`, choosing the remote adapter for `scheme://` locations
    /// and the local-file adapter otherwise.
    pub fn open(location: &str, options: &ReaderOptions) -> Result<Self> {
        if location.contains("://") {
            Self::open_remote(location, options)
        } else {
            Self::open_file(location, options.max_buffer_length)
        }
    }

    /// Open a local file.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the file is missing or empty.
    pub fn open_file(location: &str, max_buffer_length: usize) -> Result<Self> {
        let adapter = LocalFile::new(location)?;
        Self::with_adapter(adapter, max_buffer_length)
    }

    /// Open a remote location with a streaming GET.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for a location without an accepted scheme (no request
    /// is sent), [`Error::Http`] for a non-success status, or
    /// [`Error::Network`] if the request fails.
    pub fn open_remote(location: &str, options: &ReaderOptions) -> Result<Self> {
        let adapter = RemoteHttp::new(location, &options.remote)?;
        Self::with_adapter(adapter, options.max_buffer_length)
    }

    /// Open a reader over any adapter.
    pub fn with_adapter(
        mut adapter: impl SourceAdapter + 'static,
        max_buffer_length: usize,
    ) -> Result<Self> {
        if max_buffer_length == 0 {
            return Err(Error::config("max_buffer_length must be positive"));
        }

        let source = adapter.open()?;
        let total_size = adapter.total_size();

        tracing::debug!(
            location = adapter.location(),
            total_size = ?total_size,
            capacity = max_buffer_length,
            "video reader opened"
        );

        Ok(Self {
            adapter: Box::new(adapter),
            source: Some(source),
            capacity: max_buffer_length,
            total_size,
            buffer: Vec::new(),
            cursor: 0,
        })
    }

    /// Read exactly `n` bytes.
    ///
    /// # Errors
    ///
    /// [`Error::UnexpectedEof`] when the source ends first. The bytes that were
    /// available still count as consumed.
    pub fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        let data = self.fill(n)?;
        if data.len() < n {
            return Err(Error::UnexpectedEof {
                expected: n,
                actual: data.len(),
            });
        }
        Ok(data)
    }

    /// Read everything from the current position to the end of the source.
    pub fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let overflowed = self.is_overflowed();
        let source = self.source.as_mut().ok_or(Error::Closed)?;

        if overflowed {
            return source.read_remaining();
        }

        let fresh = source.read_remaining()?;
        let mut data = self.buffer[self.cursor..].to_vec();
        data.extend_from_slice(&fresh);
        self.mirror(&fresh);
        Ok(data)
    }

    /// Read `k` bytes as an unsigned integer.
    ///
    /// `k` may be at most 8; wider requests fail before consuming anything.
    pub fn read_int(&mut self, k: usize, order: ByteOrder) -> Result<u64> {
        check_width(k)?;
        let bytes = self.read(k)?;
        decode::decode_uint(&bytes, order)
    }

    /// Read an `a.b` fixed-point number: `a` integer bytes then `b` fraction bytes.
    pub fn read_float(&mut self, a: usize, b: usize, order: ByteOrder) -> Result<f64> {
        check_width(a)?;
        check_width(b)?;
        let int = self.read(a)?;
        let frac = self.read(b)?;
        decode::decode_fixed(&int, &frac, order)
    }

    /// Read `k` bytes and decode them as text.
    ///
    /// On a decode error the bytes remain consumed.
    pub fn read_text(&mut self, k: usize, charset: Charset) -> Result<String> {
        let bytes = self.read(k)?;
        decode::decode_text(&bytes, charset)
    }

    /// Move the read position back to byte 0.
    ///
    /// If the buffer has overflowed, the source is closed and reopened and the
    /// buffer is discarded. If reopening fails the reader is left closed.
    pub fn refresh(&mut self) -> Result<()> {
        if self.source.is_none() {
            return Err(Error::Closed);
        }

        if self.is_overflowed() {
            tracing::debug!(
                location = self.adapter.location(),
                buffered = self.buffer.len(),
                "buffer overflowed, reopening source"
            );
            self.release_source();
            self.buffer.clear();
            self.cursor = 0;
            self.source = Some(self.adapter.open()?);
            self.total_size = self.adapter.total_size();
        } else {
            tracing::trace!(location = self.adapter.location(), "refresh from buffer");
            self.cursor = 0;
        }

        Ok(())
    }

    /// Release the source and drop the buffer. Later calls return
    /// [`Error::Closed`]; closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        self.buffer = Vec::new();
        self.cursor = 0;
        match self.source.take() {
            Some(mut source) => source.close(),
            None => Ok(()),
        }
    }

    /// The path or URL being read.
    pub fn location(&self) -> &str {
        self.adapter.location()
    }

    /// Configured buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Best-effort total size; `None` when the source does not report it.
    pub fn total_size(&self) -> Option<u64> {
        self.total_size
    }

    /// Number of bytes currently held in the buffer.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes consumed from the buffer since the last refresh.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Whether the buffer has grown past capacity and reads now bypass it.
    pub fn is_overflowed(&self) -> bool {
        self.buffer.len() > self.capacity
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Lowercase video extension of the location, if it is a known one.
    pub fn extension(&self) -> Option<&'static str> {
        video_extension(self.location())
    }

    /// Serve up to `n` bytes; shorter only if the source is exhausted.
    fn fill(&mut self, n: usize) -> Result<Vec<u8>> {
        let overflowed = self.is_overflowed();
        let source = self.source.as_mut().ok_or(Error::Closed)?;

        if overflowed {
            return source.read_up_to(n);
        }

        let unread = self.buffer.len() - self.cursor;

        if unread == 0 {
            let fresh = source.read_up_to(n)?;
            self.mirror(&fresh);
            Ok(fresh)
        } else if unread >= n {
            let start = self.cursor;
            self.cursor += n;
            Ok(self.buffer[start..self.cursor].to_vec())
        } else {
            let fresh = source.read_up_to(n - unread)?;
            let mut data = self.buffer[self.cursor..].to_vec();
            data.extend_from_slice(&fresh);
            self.mirror(&fresh);
            Ok(data)
        }
    }

    /// Append freshly read bytes and move the cursor to the new end.
    fn mirror(&mut self, fresh: &[u8]) {
        let was_overflowed = self.is_overflowed();
        self.buffer.extend_from_slice(fresh);
        self.cursor = self.buffer.len();

        if !was_overflowed && self.is_overflowed() {
            tracing::debug!(
                location = self.adapter.location(),
                buffered = self.buffer.len(),
                capacity = self.capacity,
                "buffer exceeded capacity, bypassing it until the next refresh"
            );
        }
    }

    fn release_source(&mut self) {
        if let Some(mut source) = self.source.take() {
            if let Err(e) = source.close() {
                tracing::warn!("Failed to close source for {}: {}", self.adapter.location(), e);
            }
        }
    }
}

fn check_width(k: usize) -> Result<()> {
    if k > MAX_INT_WIDTH {
        return Err(Error::config(format!(
            "Field width {} exceeds maximum {}",
            k, MAX_INT_WIDTH
        )));
    }
    Ok(())
}

impl io::Read for VideoReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let data = self.fill(buf.len())?;
        buf[..data.len()].copy_from_slice(&data);
        Ok(data.len())
    }
}

impl Drop for VideoReader {
    fn drop(&mut self) {
        self.release_source();
    }
}

impl fmt::Debug for VideoReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoReader")
            .field("location", &self.location())
            .field("capacity", &self.capacity)
            .field("total_size", &self.total_size)
            .field("buffered", &self.buffer.len())
            .field("position", &self.cursor)
            .field("closed", &self.is_closed())
            .finish()
    }
}
