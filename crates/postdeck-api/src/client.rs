// reqwest-backed transport
//
// Wraps `reqwest::Client` with base-URL path joining and envelope
// unwrapping. Resource services sit on top of this via the `Transport`
// trait and never see raw HTTP responses.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::envelope::{self, Body};
use crate::error::Error;
use crate::transport::{Request, Transport, TransportConfig};

/// HTTP transport for the automation backend's REST API.
///
/// `base_url` is the API root (e.g. `https://host/api`); request segments
/// such as `["accounts", "42"]` are appended one by one.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a transport around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The API root all request paths are joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append the request's segments to the base URL, encoding each one
    /// (including any `/` inside it) as a single segment.
    fn url(&self, segments: &[String]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            path.pop_if_empty();
            path.extend(segments.iter().map(String::as_str));
        }
        Ok(url)
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response(&self, resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();
        let raw = resp.text().await?;
        trace!(status = status.as_u16(), body = %preview(&raw), "response body");

        if status.is_client_error() || status.is_server_error() {
            return Err(envelope::failure(
                status.as_u16(),
                envelope::failure_body(&raw),
            ));
        }

        match envelope::unwrap_body(&raw) {
            Body::Payload(data) => Ok(data),
            Body::Failure(body) => Err(envelope::failure(status.as_u16(), body)),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Value, Error> {
        let url = self.url(&request.segments)?;
        debug!("{} {}", request.method, url);

        let mut builder = self.http.request(request.method.into(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        self.handle_response(resp).await
    }
}

fn preview(raw: &str) -> &str {
    let mut end = raw.len().min(200);
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    &raw[..end]
}
