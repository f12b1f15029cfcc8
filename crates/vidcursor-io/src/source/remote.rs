//! HTTP(S)/FTP adapter using a blocking reqwest client.
//!
//! Each open issues one streaming GET. The response body is exposed as a lazy
//! byte sequence that cannot be rewound; reopening means a new request.

use std::io::{BufReader, Bytes, Read};
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH};
use reqwest::Url;

use super::{ByteSource, SourceAdapter};
use crate::{Error, Result};

/// URL schemes accepted as remote locations.
pub const REMOTE_SCHEMES: &[&str] = &["http", "https", "ftp"];

/// Headers sent with every request so the client looks like a desktop browser.
const BROWSER_HEADERS: &[(&str, &str)] = &[
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
    ),
    ("accept-charset", "UTF-8,*;q=0.5"),
    ("accept-encoding", "identity"),
    ("accept-language", "en-US,en;q=0.8"),
];

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; WOW64; rv:51.0) Gecko/20100101 Firefox/51.0";

/// Options for remote sources.
#[derive(Debug, Clone)]
pub struct RemoteOptions {
    /// Connect and per-read timeout in seconds (default: 10).
    pub timeout_secs: u64,
    /// Replaces the browser User-Agent when set.
    pub user_agent: Option<String>,
}

impl Default for RemoteOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: None,
        }
    }
}

/// Build the fixed outbound header set (User-Agent excluded).
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    for &(name, value) in BROWSER_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers
}

/// Opens a remote location with a streaming GET.
#[derive(Debug)]
pub struct RemoteHttp {
    location: String,
    url: Url,
    client: Client,
    content_length: Option<u64>,
}

impl RemoteHttp {
    /// Validate `location` and build the client. No request is sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the location is not a URL with one of the
    /// [`REMOTE_SCHEMES`], or [`Error::Network`] if the client cannot be built.
    pub fn new(location: impl Into<String>, options: &RemoteOptions) -> Result<Self> {
        let location = location.into();
        let url = parse_remote_location(&location)?;

        let mut builder = Client::builder()
            .default_headers(browser_headers())
            .connect_timeout(Duration::from_secs(options.timeout_secs))
            .timeout(Duration::from_secs(options.timeout_secs));

        builder = match &options.user_agent {
            Some(ua) => builder.user_agent(ua.clone()),
            None => builder.user_agent(BROWSER_USER_AGENT),
        };

        Ok(Self {
            location,
            url,
            client: builder.build()?,
            content_length: None,
        })
    }

    /// The parsed URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

fn parse_remote_location(location: &str) -> Result<Url> {
    let parsed = Url::parse(location)
        .ok()
        .filter(|url| REMOTE_SCHEMES.contains(&url.scheme()));

    parsed.ok_or_else(|| {
        tracing::error!(
            "Add a proper scheme to your remote location:\n  https://{0} or\n  http://{0} or\n  ftp://{0}",
            location
        );
        Error::config(format!(
            "Remote location {location} must start with one of: {}",
            REMOTE_SCHEMES.join(", ")
        ))
    })
}

impl SourceAdapter for RemoteHttp {
    fn location(&self) -> &str {
        &self.location
    }

    fn open(&mut self) -> Result<Box<dyn ByteSource>> {
        if self.url.scheme() == "ftp" {
            return Err(Error::UnsupportedTransport(format!(
                "ftp is not available for {}",
                self.location
            )));
        }

        let response = self.client.get(self.url.clone()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown error").into(),
            });
        }

        self.content_length = content_length(response.headers());
        tracing::trace!(url = %self.url, content_length = ?self.content_length, "remote stream opened");

        Ok(Box::new(RemoteBody::new(response)))
    }

    fn total_size(&self) -> Option<u64> {
        self.content_length
    }
}

/// Parse Content-Length; absent or malformed values mean the size is unknown.
fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
}

/// Response body pulled one byte at a time.
struct RemoteBody {
    bytes: Option<Bytes<BufReader<Response>>>,
}

impl RemoteBody {
    fn new(response: Response) -> Self {
        Self {
            bytes: Some(BufReader::new(response).bytes()),
        }
    }

    fn bytes(&mut self) -> Result<&mut Bytes<BufReader<Response>>> {
        self.bytes.as_mut().ok_or(Error::Closed)
    }
}

impl ByteSource for RemoteBody {
    fn read_up_to(&mut self, len: usize) -> Result<Vec<u8>> {
        let bytes = self.bytes()?;
        Ok(bytes.take(len).collect::<std::io::Result<Vec<u8>>>()?)
    }

    fn read_remaining(&mut self) -> Result<Vec<u8>> {
        let bytes = self.bytes()?;
        Ok(bytes.collect::<std::io::Result<Vec<u8>>>()?)
    }

    fn close(&mut self) -> Result<()> {
        // Dropping the body releases the connection.
        self.bytes = None;
        Ok(())
    }
}
