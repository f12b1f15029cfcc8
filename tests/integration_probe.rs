//! Probe integration tests over files on disk.

use std::fs;

use tempfile::tempdir;
use vidcursor::probe::{probe_location, Container, ProbeOptions};
use vidcursor_io::ReaderOptions;

fn mp4_box(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    out
}

fn mvhd(timescale: u32, duration: u32) -> Vec<u8> {
    let mut payload = vec![0, 0, 0, 0];
    payload.extend_from_slice(&[0; 8]);
    payload.extend_from_slice(&timescale.to_be_bytes());
    payload.extend_from_slice(&duration.to_be_bytes());
    payload.extend_from_slice(&[0x00, 0x02, 0x40, 0x00]); // 2.25
    payload.extend_from_slice(&[0x01, 0x00]);
    mp4_box(b"mvhd", &payload)
}

#[test]
fn probe_faststart_mp4() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("movie.mp4");

    let mut file = mp4_box(b"ftyp", b"mp42\x00\x00\x00\x00");
    file.extend(mp4_box(b"moov", &mvhd(48_000, 96_000)));
    file.extend(mp4_box(b"mdat", &[0xAB; 2048]));
    fs::write(&path, &file).unwrap();

    let report = probe_location(path.to_str().unwrap(), &ProbeOptions::default()).unwrap();
    assert_eq!(report.container, Some(Container::Mp4));
    assert_eq!(report.extension, Some("mp4"));
    assert_eq!(report.total_size, Some(file.len() as u64));
    assert!(!report.buffer_overflowed);

    let header = report.movie_header.unwrap();
    assert_eq!(header.timescale, 48_000);
    assert_eq!(header.duration_secs(), Some(2.0));
    assert_eq!(header.rate, 2.25);
    assert_eq!(header.volume, 1.0);
}

#[test]
fn probe_moov_after_mdat_with_small_buffer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("movie.mov");

    let mut file = mp4_box(b"ftyp", b"qt  \x00\x00\x00\x00");
    file.extend(mp4_box(b"mdat", &[0x11; 10_000]));
    file.extend(mp4_box(b"moov", &mvhd(600, 1200)));
    fs::write(&path, &file).unwrap();

    let options = ProbeOptions {
        reader: ReaderOptions {
            max_buffer_length: 256,
            ..ReaderOptions::default()
        },
        ..ProbeOptions::default()
    };
    let report = probe_location(path.to_str().unwrap(), &options).unwrap();
    assert!(report.buffer_overflowed);
    assert_eq!(report.movie_header.unwrap().duration, 1200);
}

#[test]
fn probe_matroska_has_no_movie_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("show.mkv");
    let mut file = vec![0x1A, 0x45, 0xDF, 0xA3, 0x93, 0x42, 0x82, 0x88];
    file.extend_from_slice(b"matroska");
    fs::write(&path, &file).unwrap();

    let report = probe_location(path.to_str().unwrap(), &ProbeOptions::default()).unwrap();
    assert_eq!(report.container, Some(Container::Matroska));
    assert_eq!(report.extension, Some("mkv"));
    assert!(report.movie_header.is_none());
}

#[test]
fn probe_tiny_file_is_unknown() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tiny.avi");
    fs::write(&path, b"RIFF").unwrap();

    let report = probe_location(path.to_str().unwrap(), &ProbeOptions::default()).unwrap();
    assert!(report.container.is_none());
    assert_eq!(report.extension, Some("avi"));
}

#[test]
fn probe_bad_remote_location() {
    let err = probe_location("http//missing-colon/clip.mp4", &ProbeOptions::default())
        .unwrap_err();
    // No scheme separator, so it is treated as a local path
    assert!(format!("{:#}", err).contains("not exist"));
}
