//! Container detection and header metadata over a [`VideoReader`].
//!
//! Probing is two passes over the same reader: the first bytes are sniffed for
//! a container signature, the reader is refreshed, and the metadata pass starts
//! again from byte 0. For remote locations the refresh is served from memory.

pub mod mp4;

use anyhow::{Context, Result};
use serde::Serialize;
use vidcursor_io::{ErrorKind, ReaderOptions, VideoReader};

pub use mp4::MovieHeader;

/// Bytes needed to recognize every supported signature.
pub const MAGIC_LEN: usize = 12;

/// Default cap on how far the metadata pass may read looking for `moov`.
pub const DEFAULT_SCAN_LIMIT: u64 = 64 * 1024 * 1024;

/// Container formats recognized from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    /// Matroska / WebM (EBML header)
    Matroska,
    /// ISO base media (MP4, MOV)
    Mp4,
    /// RIFF AVI
    Avi,
    /// Flash video
    Flv,
    /// Advanced Systems Format (WMV, ASF)
    Asf,
    /// RealMedia
    RealMedia,
}

impl std::fmt::Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Container::Matroska => write!(f, "Matroska"),
            Container::Mp4 => write!(f, "MP4"),
            Container::Avi => write!(f, "AVI"),
            Container::Flv => write!(f, "FLV"),
            Container::Asf => write!(f, "ASF"),
            Container::RealMedia => write!(f, "RealMedia"),
        }
    }
}

const ASF_GUID_PREFIX: [u8; 8] = [0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11];

/// Detect a container from the first bytes of a file.
pub fn detect_container(magic: &[u8]) -> Option<Container> {
    if magic.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some(Container::Matroska);
    }

    if magic.len() >= 8 {
        let kind = &magic[4..8];
        if kind == b"ftyp"
            || kind == b"moov"
            || kind == b"mdat"
            || kind == b"free"
            || kind == b"wide"
            || kind == b"skip"
        {
            return Some(Container::Mp4);
        }
    }

    if magic.len() >= 12 && magic.starts_with(b"RIFF") && &magic[8..12] == b"AVI " {
        return Some(Container::Avi);
    }

    if magic.starts_with(b"FLV") {
        return Some(Container::Flv);
    }

    if magic.starts_with(&ASF_GUID_PREFIX) {
        return Some(Container::Asf);
    }

    if magic.starts_with(b".RMF") {
        return Some(Container::RealMedia);
    }

    None
}

/// Options for [`probe_location`].
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Reader configuration.
    pub reader: ReaderOptions,
    /// Maximum bytes the metadata pass reads before giving up on `moov`.
    pub scan_limit: u64,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            reader: ReaderOptions::default(),
            scan_limit: DEFAULT_SCAN_LIMIT,
        }
    }
}

/// Result of probing one location.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub location: String,
    pub total_size: Option<u64>,
    pub extension: Option<&'static str>,
    pub container: Option<Container>,
    pub movie_header: Option<MovieHeader>,
    /// Whether the metadata pass read past the reader's buffer capacity.
    pub buffer_overflowed: bool,
}

/// Open `location`, sniff its container, refresh, and read header metadata.
pub fn probe_location(location: &str, options: &ProbeOptions) -> Result<ProbeReport> {
    let mut reader = VideoReader::open(location, &options.reader)
        .with_context(|| format!("Failed to open {}", location))?;

    let container = sniff(&mut reader)?;
    tracing::debug!("Detected container {:?} for {}", container, location);

    reader.refresh().context("Failed to rewind reader")?;

    let movie_header = match container {
        Some(Container::Mp4) => mp4::read_movie_header(&mut reader, options.scan_limit)
            .with_context(|| format!("Failed to read MP4 header of {}", location))?,
        _ => None,
    };

    let report = ProbeReport {
        location: location.to_string(),
        total_size: reader.total_size(),
        extension: reader.extension(),
        container,
        movie_header,
        buffer_overflowed: reader.is_overflowed(),
    };

    reader.close()?;
    Ok(report)
}

fn sniff(reader: &mut VideoReader) -> Result<Option<Container>> {
    match reader.read(MAGIC_LEN) {
        Ok(magic) => Ok(detect_container(&magic)),
        // Too short for any signature
        Err(e) if e.kind() == ErrorKind::Exhaustion => Ok(None),
        Err(e) => Err(e).context("Failed to read magic bytes"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_container() {
        let mkv = [0x1A, 0x45, 0xDF, 0xA3, 0x93, 0x42, 0x82, 0x88, 0, 0, 0, 0];
        assert_eq!(detect_container(&mkv), Some(Container::Matroska));

        let mp4 = *b"\x00\x00\x00\x14ftypisom";
        assert_eq!(detect_container(&mp4), Some(Container::Mp4));

        let mov = *b"\x00\x00\x00\x08wide\x00\x00\x00\x00";
        assert_eq!(detect_container(&mov), Some(Container::Mp4));

        let avi = *b"RIFF\x00\x10\x00\x00AVI ";
        assert_eq!(detect_container(&avi), Some(Container::Avi));

        let wav = *b"RIFF\x00\x10\x00\x00WAVE";
        assert_eq!(detect_container(&wav), None);

        assert_eq!(detect_container(b"FLV\x01\x05"), Some(Container::Flv));
        assert_eq!(
            detect_container(&[0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11, 0xA6, 0xD9]),
            Some(Container::Asf)
        );
        assert_eq!(detect_container(b".RMF\x00\x00"), Some(Container::RealMedia));
        assert_eq!(detect_container(b"plain text!!"), None);
        assert_eq!(detect_container(b""), None);
    }

    #[test]
    fn test_container_display() {
        assert_eq!(Container::Mp4.to_string(), "MP4");
        assert_eq!(Container::RealMedia.to_string(), "RealMedia");
        assert_eq!(
            serde_json::to_string(&Container::Matroska).unwrap(),
            "\"matroska\""
        );
    }
}
