//! Movie header (`moov/mvhd`) extraction from a sequential reader.
//!
//! Boxes are walked strictly forward; skipped payloads are read and dropped
//! since the reader cannot seek.

use serde::Serialize;
use vidcursor_io::{ByteOrder, Charset, ErrorKind, Result, VideoReader};

const SKIP_CHUNK: u64 = 64 * 1024;

/// Fields of the MP4 movie header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieHeader {
    pub version: u8,
    pub timescale: u32,
    pub duration: u64,
    /// Preferred playback rate, 16.16 fixed point (1.0 is normal).
    pub rate: f64,
    /// Preferred volume, 8.8 fixed point (1.0 is full).
    pub volume: f64,
}

impl MovieHeader {
    /// Duration in seconds, if the timescale is usable.
    pub fn duration_secs(&self) -> Option<f64> {
        (self.timescale > 0).then(|| self.duration as f64 / self.timescale as f64)
    }
}

struct BoxHeader {
    kind: String,
    /// Payload size; `None` when the box runs to the end of the file.
    payload: Option<u64>,
    header_len: u64,
}

/// Walk top-level boxes to `moov`, then its children to `mvhd`.
///
/// Returns `Ok(None)` if the stream ends or `scan_limit` bytes are read first.
pub fn read_movie_header(reader: &mut VideoReader, scan_limit: u64) -> Result<Option<MovieHeader>> {
    let mut scanned = 0u64;

    while let Some(header) = next_box(reader)? {
        scanned += header.header_len;

        if header.kind == "moov" {
            return find_mvhd(reader, header.payload);
        }

        let Some(payload) = header.payload else {
            return Ok(None);
        };
        if scanned.saturating_add(payload) > scan_limit {
            tracing::debug!("moov not found within {} bytes", scan_limit);
            return Ok(None);
        }
        skip(reader, payload)?;
        scanned = scanned.saturating_add(payload);
    }

    Ok(None)
}

fn find_mvhd(reader: &mut VideoReader, moov_payload: Option<u64>) -> Result<Option<MovieHeader>> {
    let mut remaining = moov_payload.unwrap_or(u64::MAX);

    while remaining >= 8 {
        let Some(child) = next_box(reader)? else {
            return Ok(None);
        };
        remaining = remaining.saturating_sub(child.header_len);

        if child.kind == "mvhd" {
            return parse_mvhd(reader).map(Some);
        }

        let Some(payload) = child.payload else {
            return Ok(None);
        };
        skip(reader, payload)?;
        remaining = remaining.saturating_sub(payload);
    }

    Ok(None)
}

fn parse_mvhd(reader: &mut VideoReader) -> Result<MovieHeader> {
    let version = reader.read_int(1, ByteOrder::Big)? as u8;
    let _flags = reader.read_int(3, ByteOrder::Big)?;

    let (timescale, duration) = if version == 1 {
        let _created = reader.read_int(8, ByteOrder::Big)?;
        let _modified = reader.read_int(8, ByteOrder::Big)?;
        let timescale = reader.read_int(4, ByteOrder::Big)? as u32;
        (timescale, reader.read_int(8, ByteOrder::Big)?)
    } else {
        let _created = reader.read_int(4, ByteOrder::Big)?;
        let _modified = reader.read_int(4, ByteOrder::Big)?;
        let timescale = reader.read_int(4, ByteOrder::Big)? as u32;
        (timescale, reader.read_int(4, ByteOrder::Big)?)
    };

    let rate = reader.read_float(2, 2, ByteOrder::Big)?;
    let volume = reader.read_float(1, 1, ByteOrder::Big)?;

    Ok(MovieHeader {
        version,
        timescale,
        duration,
        rate,
        volume,
    })
}

fn next_box(reader: &mut VideoReader) -> Result<Option<BoxHeader>> {
    let size = match reader.read_int(4, ByteOrder::Big) {
        Ok(size) => size,
        Err(e) if e.kind() == ErrorKind::Exhaustion => return Ok(None),
        Err(e) => return Err(e),
    };
    let kind = reader.read_text(4, Charset::Latin1)?;

    let (payload, header_len) = match size {
        // Extends to end of file
        0 => (None, 8),
        1 => {
            let large = reader.read_int(8, ByteOrder::Big)?;
            (Some(large.saturating_sub(16)), 16)
        }
        _ => (Some(size.saturating_sub(8)), 8),
    };

    Ok(Some(BoxHeader {
        kind,
        payload,
        header_len,
    }))
}

fn skip(reader: &mut VideoReader, mut n: u64) -> Result<()> {
    while n > 0 {
        let chunk = n.min(SKIP_CHUNK);
        reader.read(chunk as usize)?;
        n -= chunk;
    }
    Ok(())
}
