//! HTTP client for replaying catalog requests

use crate::catalog::TestCase;
use crate::error::{ConformanceError, ConformanceResult};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use std::borrow::Cow;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Which side of the comparison a server plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerRole {
    /// Trusted implementation, treated as ground truth
    Reference,
    /// Implementation under test
    Candidate,
}

impl fmt::Display for ServerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerRole::Reference => write!(f, "reference"),
            ServerRole::Candidate => write!(f, "candidate"),
        }
    }
}

/// Client bound to one of the two servers
#[derive(Clone)]
pub struct ServerClient {
    client: Client,
    base_url: String,
    role: ServerRole,
}

/// Everything captured from one response
///
/// Header values and the body are kept as the raw bytes the server sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedResponse {
    pub status: StatusCode,
    /// Lower-cased names (the HTTP stack normalises them); repeated headers
    /// are folded into one value
    pub headers: Vec<(String, HeaderValue)>,
    pub body: Vec<u8>,
}

impl ServerClient {
    pub fn new(role: ServerRole, base_url: &str, timeout: Duration) -> ConformanceResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ConformanceError::BuildClient { source })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            role,
        })
    }

    pub fn role(&self) -> ServerRole {
        self.role
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a catalog path. Paths are appended verbatim.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one catalog request and capture the response
    pub async fn send(&self, case: &TestCase) -> ConformanceResult<CapturedResponse> {
        // Methods go out upper-cased, so `get` and `GET` hit the server identically.
        let method = Method::from_bytes(case.method.to_ascii_uppercase().as_bytes()).map_err(
            |_| ConformanceError::InvalidMethod {
                method: case.method.clone(),
            },
        )?;
        let url = self.url(&case.path);
        debug!(server = %self.role, %method, %url, "sending request");

        let mut request = self.client.request(method, &url);
        for (name, value) in &case.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(ref body) = case.body {
            request = request.body(body.clone());
        }

        let response = request.send().await.map_err(|source| self.request_error(source))?;
        self.parse_response(response).await
    }

    async fn parse_response(&self, response: Response) -> ConformanceResult<CapturedResponse> {
        let status = response.status();
        let headers = fold_headers(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|source| self.request_error(source))?
            .to_vec();

        debug!(server = %self.role, %status, body_len = body.len(), "captured response");
        Ok(CapturedResponse {
            status,
            headers,
            body,
        })
    }

    fn request_error(&self, source: reqwest::Error) -> ConformanceError {
        ConformanceError::Request {
            server: self.role,
            source,
        }
    }
}

fn fold_headers(map: &HeaderMap) -> Vec<(String, HeaderValue)> {
    map.keys()
        .filter_map(|name| {
            let mut values = map.get_all(name).iter();
            let first = values.next()?;
            let mut folded = first.as_bytes().to_vec();
            for value in values {
                folded.extend_from_slice(b", ");
                folded.extend_from_slice(value.as_bytes());
            }
            // Joining valid values with ", " yields a valid value.
            let value = HeaderValue::from_bytes(&folded).ok()?;
            Some((name.as_str().to_string(), value))
        })
        .collect()
}

/// Header value for display; bytes outside UTF-8 become U+FFFD.
pub fn display_value(value: &HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).into_owned()
}

impl CapturedResponse {
    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Body decoded for display. Never use this for comparison.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
