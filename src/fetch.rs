//! Remote script sources.
//!
//! A source that starts with `http://` or `https://` is fetched with a plain
//! GET. Only a 200 response counts; its body becomes the script, byte for
//! byte. Redirects are not followed: a 3xx is as much a failure as a 404.

use std::time::Duration;

use tracing::debug;
use url::Url;

/// Download settings.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Global request timeout in milliseconds. `None` blocks until the
    /// transfer completes or the connection fails.
    pub timeout_ms: Option<u64>,
    /// Maximum script body size in bytes.
    pub max_response_bytes: u64,
    /// Whether `http://` sources are accepted (not just HTTPS).
    pub allow_http: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            max_response_bytes: 10 * 1024 * 1024, // 10 MiB
            allow_http: true,
        }
    }
}

/// Errors from fetching a remote script.
#[derive(Debug)]
pub enum FetchError {
    /// URL failed to parse.
    ParseError(String),
    /// URL scheme is not allowed.
    InsecureScheme(String),
    /// URL has no hostname.
    NoHostname,
    /// Server answered with something other than 200.
    Status(u16),
    /// Connection, DNS, TLS or timeout failure.
    Transport(String),
    /// Body could not be read (too large, connection dropped).
    Body(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParseError(e) => write!(f, "invalid URL: {e}"),
            Self::InsecureScheme(s) => write!(f, "insecure scheme '{s}', HTTPS required"),
            Self::NoHostname => write!(f, "URL has no hostname"),
            Self::Status(code) => write!(f, "HTTP status {code}"),
            Self::Transport(e) => write!(f, "{e}"),
            Self::Body(e) => write!(f, "failed to read response body: {e}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Whether a source string names a remote script.
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Parse a URL source and check its scheme and host.
pub fn validate_url(url_str: &str, allow_http: bool) -> Result<Url, FetchError> {
    let url = Url::parse(url_str).map_err(|e| FetchError::ParseError(e.to_string()))?;

    let scheme = url.scheme();
    if scheme != "https" && !(allow_http && scheme == "http") {
        return Err(FetchError::InsecureScheme(scheme.to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(FetchError::NoHostname);
    }

    Ok(url)
}

/// Fetch a script body. Blocks the calling thread.
pub fn fetch_blocking(url_str: &str, config: &HttpConfig) -> Result<Vec<u8>, FetchError> {
    let url = validate_url(url_str, config.allow_http)?;

    let agent = ureq::Agent::new_with_config(
        ureq::config::Config::builder()
            .timeout_global(config.timeout_ms.map(Duration::from_millis))
            .http_status_as_error(false)
            .max_redirects(0)
            .build(),
    );

    let mut response = agent
        .get(url.as_str())
        .call()
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    debug!(%url, status, "download response");
    if status != 200 {
        return Err(FetchError::Status(status));
    }

    let body = response
        .body_mut()
        .with_config()
        .limit(config.max_response_bytes)
        .read_to_vec()
        .map_err(|e| FetchError::Body(e.to_string()))?;

    debug!(bytes = body.len(), "downloaded script");
    Ok(body)
}

/// Fetch a script body without blocking the async runtime.
pub async fn fetch(url: &str, config: &HttpConfig) -> Result<Vec<u8>, FetchError> {
    let url = url.to_string();
    let config = config.clone();
    tokio::task::spawn_blocking(move || fetch_blocking(&url, &config))
        .await
        .map_err(|e| FetchError::Transport(format!("download task failed: {e}")))?
}
