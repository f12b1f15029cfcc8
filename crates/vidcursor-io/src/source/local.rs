//! Local file adapter.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::{ByteSource, ReaderSource, SourceAdapter};
use crate::{Error, Result};

/// Opens a file on disk as a [`ByteSource`].
///
/// The file must exist and be non-empty when the adapter is created. Its size
/// is read from file metadata and refreshed on every open.
#[derive(Debug)]
pub struct LocalFile {
    location: String,
    path: PathBuf,
    size: u64,
}

impl LocalFile {
    /// Validate `location` as a readable, non-empty file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the path does not exist, is not a regular
    /// file, or is empty.
    pub fn new(location: impl Into<String>) -> Result<Self> {
        let location = location.into();
        let path = PathBuf::from(&location);

        let size = match fs::metadata(&path) {
            Ok(meta) if meta.is_file() && meta.len() > 0 => meta.len(),
            Ok(meta) if meta.is_file() => {
                return Err(Error::config(format!("File {location} is empty.")));
            }
            Ok(_) => return Err(Error::config(format!("{location} is not a file."))),
            Err(_) => return Err(Error::config(format!("File {location} not exist."))),
        };

        Ok(Self {
            location,
            path,
            size,
        })
    }

    /// Returns the path to the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SourceAdapter for LocalFile {
    fn location(&self) -> &str {
        &self.location
    }

    fn open(&mut self) -> Result<Box<dyn ByteSource>> {
        let file = File::open(&self.path)?;
        self.size = file.metadata()?.len();
        Ok(Box::new(ReaderSource::new(BufReader::new(file))))
    }

    fn total_size(&self) -> Option<u64> {
        Some(self.size)
    }
}
