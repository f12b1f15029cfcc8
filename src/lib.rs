//! Vidcursor - rewindable reads over local and remote video files
//!
//! This library crate exposes the CLI's configuration and probing logic for
//! integration testing. The reader itself lives in `vidcursor-io`.

pub mod config;
pub mod probe;
