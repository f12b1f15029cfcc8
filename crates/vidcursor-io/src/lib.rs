//! Vidcursor-IO: buffered, refreshable readers for video files.
//!
//! A [`VideoReader`] reads a local file or a remote HTTP(S) stream strictly in
//! order, mirroring what it hands out into a bounded memory buffer. A type
//! detection pass can consume the first bytes, call
//! [`refresh`](VideoReader::refresh), and a metadata pass can start again from
//! byte 0 without the remote request being issued twice.
//!
//! # Modules
//!
//! - `reader` - [`VideoReader`], the buffer/cursor logic and typed reads
//! - `source` - [`ByteSource`] and [`SourceAdapter`] plus the local, remote and
//!   in-memory adapters
//! - `decode` - integer, fixed-point and text decoding
//! - `paths` - video extension allow-list

pub mod decode;
pub mod error;
pub mod paths;
pub mod reader;
pub mod source;

pub use decode::{ByteOrder, Charset};
pub use error::{Error, ErrorKind, Result};
pub use reader::{ReaderOptions, VideoReader, DEFAULT_MAX_BUFFER_LENGTH};
pub use source::{
    ByteSource, LocalFile, MemorySource, RemoteHttp, RemoteOptions, SourceAdapter,
    SourceCounters,
};
