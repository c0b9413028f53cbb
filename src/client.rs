//! Main Diffbot client implementation.

use std::collections::BTreeMap;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::result::DiffbotResult;

const DEFAULT_API_URL: &str = "http://api.diffbot.com/";
const DEFAULT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_METHOD: &str = "article";

/// The single API version this client can speak.
///
/// The request shape (URL layout, body fields) is version-specific, so the
/// client refuses to send requests for any other version rather than
/// silently producing malformed ones.
pub const SUPPORTED_API_VERSION: u32 = 2;

const CLIENT_USER_AGENT: &str = concat!("diffbot-rs/", env!("CARGO_PKG_VERSION"));

/// Escapes everything outside RFC 3986 unreserved characters, the same set
/// libcurl's URL escaping uses.
const FORM_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn escape(s: &str) -> String {
    utf8_percent_encode(s, FORM_ESCAPE).to_string()
}

/// Client for the Diffbot content-extraction API.
///
/// Holds the configuration a request is derived from (token, API version,
/// timeout, extraction method, field selector, extra parameters) and the
/// raw body of the most recent response. One instance may be reused across
/// many requests; it is not safe to share across threads while mutating.
///
/// # Example
///
/// ```rust,no_run
/// use diffbot::Diffbot;
///
/// fn main() -> Result<(), diffbot::Error> {
///     let mut client = Diffbot::new("your-api-token")?;
///     client.set_timeout(20)?;
///
///     client.api_request("https://example.com/some-article")?;
///     let result = client.parse_response()?;
///
///     println!("{}", result.field("title"));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Diffbot {
    api_url: String,
    token: String,
    version: u32,
    timeout_secs: u64,
    method: String,
    fields: String,
    params: BTreeMap<String, String>,
    response: String,
}

impl Diffbot {
    /// Create a client with default settings and the given API token.
    ///
    /// Defaults: API version 2, 5 second timeout, `article` method.
    /// Fails with [`Error::Config`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let mut client = Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: String::new(),
            version: SUPPORTED_API_VERSION,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            method: DEFAULT_METHOD.to_string(),
            fields: String::new(),
            params: BTreeMap::new(),
            response: String::new(),
        };
        client.set_token(token)?;
        Ok(client)
    }

    /// Override the API endpoint root (mostly useful for testing).
    ///
    /// A trailing slash is added if missing; [`Self::endpoint`] appends the
    /// version and method directly.
    pub fn set_api_url(&mut self, url: impl Into<String>) {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.api_url = url;
    }

    /// Set the API token. Fails with [`Error::Config`] if empty.
    pub fn set_token(&mut self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::Config("token is empty".into()));
        }
        self.token = token;
        Ok(())
    }

    /// The configured API token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Set the API version.
    ///
    /// Only [`SUPPORTED_API_VERSION`] is accepted; any other value fails
    /// with [`Error::Config`] and leaves the previous version in place.
    pub fn set_version(&mut self, version: u32) -> Result<()> {
        if version != SUPPORTED_API_VERSION {
            return Err(Error::Config(format!("unsupported version: {version}")));
        }
        self.version = version;
        Ok(())
    }

    /// The configured API version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Set the server-side processing timeout in seconds.
    ///
    /// Negative values fail with [`Error::Config`]. Zero means no explicit
    /// timeout is enforced on the request.
    pub fn set_timeout(&mut self, secs: i64) -> Result<()> {
        if secs < 0 {
            return Err(Error::Config(format!("unsupported timeout: {secs}")));
        }
        self.timeout_secs = secs as u64;
        Ok(())
    }

    /// The configured timeout in seconds.
    pub fn timeout(&self) -> u64 {
        self.timeout_secs
    }

    /// Set the extraction method, e.g. `"article"` or `"classifier"`.
    ///
    /// Not validated against a fixed set, so new server-side methods work
    /// without a client upgrade.
    pub fn set_method(&mut self, method: impl Into<String>) {
        self.method = method.into();
    }

    /// The configured extraction method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Set the field-selector expression, e.g. `"meta"`.
    ///
    /// An empty string omits the selector from the request. The value is
    /// sent literally; escaping special characters is the caller's
    /// responsibility.
    pub fn set_fields(&mut self, fields: impl Into<String>) {
        self.fields = fields.into();
    }

    /// The configured field selector.
    pub fn fields(&self) -> &str {
        &self.fields
    }

    /// Set an extra POST parameter, e.g. `mode=article` for the classifier
    /// method.
    pub fn set_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Remove an extra POST parameter.
    pub fn del_parameter(&mut self, key: &str) {
        self.params.remove(key);
    }

    /// Look up an extra POST parameter. An absent key yields `""`.
    pub fn parameter(&self, key: &str) -> &str {
        self.params.get(key).map(String::as_str).unwrap_or("")
    }

    /// The raw body of the most recent response, unparsed.
    pub fn raw_response(&self) -> &str {
        &self.response
    }

    /// The versioned endpoint URL derived from the current configuration.
    pub fn endpoint(&self) -> String {
        format!("{}v{}/{}", self.api_url, self.version, self.method)
    }

    /// Build the form-encoded POST body for the given page URL.
    ///
    /// Segment order is fixed: `token`, `url`, `fields` (only when set),
    /// then one segment per extra parameter. The page URL and extra
    /// parameter keys/values are percent-encoded; the token and field
    /// selector are emitted literally, matching the shape the server
    /// expects. The page URL is not validated; a bad URL is the server's
    /// to reject.
    pub fn post_body(&self, page_url: &str) -> String {
        let mut body = format!("token={}", self.token);
        body.push_str("&url=");
        body.push_str(&escape(page_url));
        if !self.fields.is_empty() {
            body.push_str("&fields=");
            body.push_str(&self.fields);
        }
        for (key, value) in &self.params {
            body.push('&');
            body.push_str(&escape(key));
            body.push('=');
            body.push_str(&escape(value));
        }
        body
    }

    /// Submit the page URL to the API and retain the raw response body.
    ///
    /// Blocks until the transport completes or times out. When a timeout is
    /// configured, the transport is given 2 extra seconds of slack beyond
    /// the server-side processing timeout; with a zero timeout no deadline
    /// is enforced at all. Each call uses a fresh transport handle; there
    /// is no pooling and no retry.
    ///
    /// Only transport-level failures (DNS, connect, TLS, timeout) fail with
    /// [`Error::Network`]. A non-2xx status is not an error: the body is
    /// retained and returned so the caller can inspect the server's
    /// diagnostic JSON.
    pub fn api_request(&mut self, page_url: &str) -> Result<&str> {
        let endpoint = self.endpoint();
        let body = self.post_body(page_url);

        let timeout = if self.timeout_secs > 0 {
            // 2 additional seconds for network delay on top of the
            // server-side processing timeout.
            Some(Duration::from_secs(self.timeout_secs + 2))
        } else {
            None
        };

        debug!(url = %endpoint, method = %self.method, "sending extraction request");

        // reqwest's blocking client applies a default timeout, so "no
        // timeout" has to be set explicitly.
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        let response = http
            .post(&endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .body(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, url = %endpoint, "server returned non-success status");
        }

        self.response = response.text()?;
        Ok(&self.response)
    }

    /// Parse the retained raw response into a [`DiffbotResult`].
    ///
    /// Fails with [`Error::MalformedResponse`] if the body is not valid
    /// JSON.
    pub fn parse_response(&self) -> Result<DiffbotResult> {
        DiffbotResult::parse(self.method.clone(), &self.response)
    }
}
