//! Byte-level decoding used by the typed reads.
//!
//! These are pure functions over byte slices so they can be exercised without a
//! reader. [`VideoReader`](crate::VideoReader) pulls the bytes and hands them here.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Widest integer field accepted by [`decode_uint`].
pub const MAX_INT_WIDTH: usize = 8;

/// Byte order of a multi-byte field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Most significant byte first.
    #[default]
    Big,
    /// Least significant byte first.
    Little,
}

impl FromStr for ByteOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "big" | "be" => Ok(Self::Big),
            "little" | "le" => Ok(Self::Little),
            other => Err(Error::config(format!("Unknown byte order: {other}"))),
        }
    }
}

/// Character sets understood by [`decode_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Utf8,
    Ascii,
    /// ISO-8859-1; every byte maps to the code point of the same value.
    Latin1,
    Utf16Be,
    Utf16Le,
}

impl Charset {
    /// Canonical label.
    pub fn label(&self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Ascii => "ascii",
            Charset::Latin1 => "iso-8859-1",
            Charset::Utf16Be => "utf-16be",
            Charset::Utf16Le => "utf-16le",
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Charset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "ascii" | "us-ascii" => Ok(Self::Ascii),
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" => Ok(Self::Latin1),
            "utf-16be" | "utf16be" => Ok(Self::Utf16Be),
            "utf-16le" | "utf16le" => Ok(Self::Utf16Le),
            _ => Err(Error::config(format!("Unknown charset: {s}"))),
        }
    }
}

/// Interpret `bytes` as an unsigned integer.
///
/// An empty slice decodes to 0. Slices wider than [`MAX_INT_WIDTH`] are
/// rejected rather than truncated.
pub fn decode_uint(bytes: &[u8], order: ByteOrder) -> Result<u64> {
    if bytes.len() > MAX_INT_WIDTH {
        return Err(Error::config(format!(
            "Integer field of {} bytes exceeds maximum {}",
            bytes.len(),
            MAX_INT_WIDTH
        )));
    }

    let fold = |acc: u64, b: &u8| (acc << 8) | u64::from(*b);
    Ok(match order {
        ByteOrder::Big => bytes.iter().fold(0, fold),
        ByteOrder::Little => bytes.iter().rev().fold(0, fold),
    })
}

/// Decode a fixed-point number from its integer and fractional fields.
///
/// The fractional field is first read as an integer in `order`, then its
/// `8 * frac.len()` bits are taken most-significant first, bit `i` adding
/// `2^(-1 - i)`. With one byte each, `[0x05]`/`[0x80]` is `5.5`.
pub fn decode_fixed(int: &[u8], frac: &[u8], order: ByteOrder) -> Result<f64> {
    let whole = decode_uint(int, order)?;
    let bits = decode_uint(frac, order)?;
    let width = frac.len() * 8;

    let fraction: f64 = (0..width)
        .filter(|i| bits & (1u64 << (width - 1 - i)) != 0)
        .map(|i| 2f64.powi(-1 - i as i32))
        .sum();

    Ok(whole as f64 + fraction)
}

/// Decode `bytes` as text in `charset`. Invalid sequences are an error.
pub fn decode_text(bytes: &[u8], charset: Charset) -> Result<String> {
    match charset {
        Charset::Utf8 => String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::decode(charset.label(), e.utf8_error().to_string())),
        Charset::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
            Some(pos) => Err(Error::decode(
                charset.label(),
                format!("byte 0x{:02x} at offset {} is not ASCII", bytes[pos], pos),
            )),
            None => Ok(bytes.iter().map(|&b| b as char).collect()),
        },
        Charset::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        Charset::Utf16Be | Charset::Utf16Le => {
            if bytes.len() % 2 != 0 {
                return Err(Error::decode(
                    charset.label(),
                    format!("odd byte length {}", bytes.len()),
                ));
            }
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| match charset {
                    Charset::Utf16Be => u16::from_be_bytes([pair[0], pair[1]]),
                    _ => u16::from_le_bytes([pair[0], pair[1]]),
                })
                .collect();
            String::from_utf16(&units).map_err(|e| Error::decode(charset.label(), e.to_string()))
        }
    }
}
