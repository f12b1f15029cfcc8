//! In-memory adapter.
//!
//! Serves bytes already held in RAM through the same interface as files and
//! remote streams. It counts opens and source reads, which makes the cost of a
//! refresh observable.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{ByteSource, ReaderSource, SourceAdapter};
use crate::Result;

/// Shared open/read counters for a [`MemorySource`].
#[derive(Debug, Clone, Default)]
pub struct SourceCounters {
    opens: Arc<AtomicUsize>,
    reads: Arc<AtomicUsize>,
}

impl SourceCounters {
    /// Number of byte sources opened so far.
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::Relaxed)
    }

    /// Number of read calls issued against any opened byte source.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

/// Adapter over an immutable byte buffer.
#[derive(Debug, Clone)]
pub struct MemorySource {
    location: String,
    data: Arc<[u8]>,
    counters: SourceCounters,
}

impl MemorySource {
    /// Create an adapter serving `data` under the given location name.
    pub fn new(location: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            location: location.into(),
            data: data.into(),
            counters: SourceCounters::default(),
        }
    }

    /// Handle to this adapter's counters; stays valid after the adapter is moved.
    pub fn counters(&self) -> SourceCounters {
        self.counters.clone()
    }
}

impl SourceAdapter for MemorySource {
    fn location(&self) -> &str {
        &self.location
    }

    fn open(&mut self) -> Result<Box<dyn ByteSource>> {
        self.counters.opens.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(MemoryBody {
            inner: ReaderSource::new(Cursor::new(Arc::clone(&self.data))),
            reads: Arc::clone(&self.counters.reads),
        }))
    }

    fn total_size(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }
}

struct MemoryBody {
    inner: ReaderSource<Cursor<Arc<[u8]>>>,
    reads: Arc<AtomicUsize>,
}

impl ByteSource for MemoryBody {
    fn read_up_to(&mut self, len: usize) -> Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.inner.read_up_to(len)
    }

    fn read_remaining(&mut self) -> Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.inner.read_remaining()
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }
}
