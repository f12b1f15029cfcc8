//! Extension classification for video locations.
//!
//! Works on the raw location string so it applies equally to file paths and
//! URLs: the token after the last `.` is lowercased and checked against a fixed
//! allow-list of common container extensions.

/// Recognized video container extensions.
const VIDEO_EXTENSIONS: &[&str] = &["asf", "avi", "flv", "mkv", "mov", "mp4", "rm", "rmvb"];

/// Return the lowercase video extension of `location`, if it is a known one.
///
/// # Examples
///
/// ```
/// use vidcursor_io::paths::video_extension;
///
/// assert_eq!(video_extension("clip.MP4"), Some("mp4"));
/// assert_eq!(video_extension("notes.txt"), None);
/// assert_eq!(video_extension("no_extension"), None);
/// ```
pub fn video_extension(location: &str) -> Option<&'static str> {
    let (_, ext) = location.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    let ext = ext.to_lowercase();
    VIDEO_EXTENSIONS.iter().copied().find(|known| *known == ext)
}

/// Get the list of recognized video extensions.
#[must_use]
pub fn video_extensions() -> &'static [&'static str] {
    VIDEO_EXTENSIONS
}
