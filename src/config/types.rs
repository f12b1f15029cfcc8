use serde::{Deserialize, Serialize};
use vidcursor_io::{ReaderOptions, RemoteOptions, DEFAULT_MAX_BUFFER_LENGTH};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub reader: ReaderConfig,

    #[serde(default)]
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReaderConfig {
    /// Bytes kept in memory for cheap refreshes (default: 1 MiB)
    #[serde(default = "default_max_buffer_length")]
    pub max_buffer_length: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_buffer_length: default_max_buffer_length(),
        }
    }
}

fn default_max_buffer_length() -> usize {
    DEFAULT_MAX_BUFFER_LENGTH
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    /// Connect and per-read timeout in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Override for the browser User-Agent
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Options for opening readers with this configuration.
    pub fn reader_options(&self) -> ReaderOptions {
        ReaderOptions {
            max_buffer_length: self.reader.max_buffer_length,
            remote: RemoteOptions {
                timeout_secs: self.remote.timeout_secs,
                user_agent: self.remote.user_agent.clone(),
            },
        }
    }
}
