//! Integration tests for readers over local files.

use std::io::Write;

use tempfile::{tempdir, NamedTempFile};
use vidcursor_io::{ByteOrder, Charset, ErrorKind, ReaderOptions, VideoReader};

fn write_fixture(data: &[u8]) -> NamedTempFile {
    let mut temp = NamedTempFile::new().unwrap();
    temp.write_all(data).unwrap();
    temp.flush().unwrap();
    temp
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 % 256) as u8).collect()
}

fn location(temp: &NamedTempFile) -> String {
    temp.path().to_str().unwrap().to_string()
}

#[test]
fn composed_reads_equal_one_pass() {
    let data = pattern(4096);
    let temp = write_fixture(&data);

    let sizes = [1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144, 233, 377, 610];
    let total: usize = sizes.iter().sum();

    let mut reader = VideoReader::open_file(&location(&temp), total).unwrap();
    let mut collected = Vec::new();
    for n in sizes {
        collected.extend(reader.read(n).unwrap());
    }
    assert_eq!(collected, &data[..total]);

    // Same bytes again after a cheap refresh, in a different split
    reader.refresh().unwrap();
    let mut again = Vec::new();
    for n in sizes.iter().rev() {
        again.extend(reader.read(*n).unwrap());
    }
    assert_eq!(again, collected);
}

#[test]
fn refresh_replays_prefix() {
    let data = pattern(512);
    let temp = write_fixture(&data);
    let mut reader = VideoReader::open(&location(&temp), &ReaderOptions::default()).unwrap();

    assert_eq!(reader.total_size(), Some(512));
    let first = reader.read(100).unwrap();

    for k in [0, 1, 50, 100] {
        reader.refresh().unwrap();
        assert_eq!(reader.read(k).unwrap(), &first[..k]);
    }
}

#[test]
fn refresh_after_overflow_reopens_file() {
    let data = pattern(2048);
    let temp = write_fixture(&data);
    let mut reader = VideoReader::open_file(&location(&temp), 64).unwrap();

    reader.read(60).unwrap();
    reader.read(60).unwrap();
    assert!(reader.is_overflowed());
    assert_eq!(reader.read(100).unwrap(), &data[120..220]);

    reader.refresh().unwrap();
    assert!(!reader.is_overflowed());
    assert_eq!(reader.buffered_len(), 0);
    assert_eq!(reader.read(200).unwrap(), &data[..200]);
}

#[test]
fn reads_past_end_fail() {
    let temp = write_fixture(b"short");
    let mut reader = VideoReader::open_file(&location(&temp), 1024).unwrap();

    let err = reader.read(10).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Exhaustion);

    reader.refresh().unwrap();
    assert_eq!(reader.read_text(5, Charset::Ascii).unwrap(), "short");
}

#[test]
fn mp4_style_header_fields() {
    let mut data = Vec::new();
    data.extend_from_slice(&[0x00, 0x00, 0x00, 0x18]);
    data.extend_from_slice(b"ftyp");
    data.extend_from_slice(b"isom");
    data.extend_from_slice(&[0x00, 0x01, 0x00, 0x00]); // 16.16 rate
    data.extend_from_slice(&[0x01, 0x00]); // 8.8 volume
    data.extend_from_slice(&[0x34, 0x12]); // little endian u16
    let temp = write_fixture(&data);

    let mut reader = VideoReader::open_file(&location(&temp), 1024).unwrap();
    assert_eq!(reader.read_int(4, ByteOrder::Big).unwrap(), 0x18);
    assert_eq!(reader.read_text(4, Charset::Ascii).unwrap(), "ftyp");
    assert_eq!(reader.read_text(4, Charset::Utf8).unwrap(), "isom");
    assert_eq!(reader.read_float(2, 2, ByteOrder::Big).unwrap(), 1.0);
    assert_eq!(reader.read_float(1, 1, ByteOrder::Big).unwrap(), 1.0);
    assert_eq!(reader.read_int(2, ByteOrder::Little).unwrap(), 0x1234);
}

#[test]
fn missing_file_is_configuration_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.mkv");

    let err = VideoReader::open_file(missing.to_str().unwrap(), 1024).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = VideoReader::open(missing.to_str().unwrap(), &ReaderOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn extension_from_location() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("clip.MP4");
    std::fs::write(&path, b"data").unwrap();

    let reader = VideoReader::open_file(path.to_str().unwrap(), 1024).unwrap();
    assert_eq!(reader.extension(), Some("mp4"));

    let path = dir.path().join("clip.txt");
    std::fs::write(&path, b"data").unwrap();
    let reader = VideoReader::open_file(path.to_str().unwrap(), 1024).unwrap();
    assert_eq!(reader.extension(), None);
}
