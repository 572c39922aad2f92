//! HTTP transport: turning a sampled request description into a live call.
//!
//! The [`Transport`] trait is the seam the driver tests through; the real
//! implementation wraps a blocking `reqwest` client, and test doubles can
//! record requests instead of sending them.

use oasconform_core::HttpMethod;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Payload of a request body parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Sent as `application/json`.
    Json(Value),
    /// Raw payload sent as `application/octet-stream` (`type: file`).
    Binary(Vec<u8>),
}

/// One fully sampled request, still in terms of the path template.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path template with `{name}` placeholders.
    pub path: String,
    pub path_params: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl ApiRequest {
    /// The path with placeholders substituted by percent-encoded values.
    pub fn rendered_path(&self) -> String {
        let mut path = self.path.clone();
        for (name, value) in &self.path_params {
            path = path.replace(&format!("{{{name}}}"), &percent_encode(value));
        }
        path
    }
}

/// Response data the conformance checks need.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: reqwest::header::HeaderMap,
    pub body_text: String,
}

impl ApiResponse {
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body_text).ok()
    }
}

pub trait Transport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Blocking HTTP client bound to one server root.
#[derive(Debug)]
pub struct HttpClient {
    base_url: String,
    extra_headers: Vec<(String, String)>,
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new(
        base_url: &str,
        extra_headers: Vec<(String, String)>,
        timeout: std::time::Duration,
    ) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            extra_headers,
            client,
        })
    }
}

impl Transport for HttpClient {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.rendered_path());
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|_| TransportError::InvalidRequest(request.method.to_string()))?;

        let mut req = self.client.request(method, &url);
        for (k, v) in self.extra_headers.iter().chain(&request.headers) {
            // Values the HTTP layer cannot carry never reach the server, so
            // sending the request without them tests nothing less.
            if reqwest::header::HeaderValue::from_str(v).is_ok() {
                req = req.header(k, v);
            }
        }
        for (k, v) in &request.query {
            req = req.query(&[(k, v)]);
        }
        match &request.body {
            Some(RequestBody::Json(value)) => {
                req = req.header("Content-Type", "application/json").json(value);
            }
            Some(RequestBody::Binary(bytes)) => {
                req = req
                    .header("Content-Type", "application/octet-stream")
                    .body(bytes.clone());
            }
            None => {}
        }

        let response = req.send().map_err(|e| TransportError::Http(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body_text = response.text().unwrap_or_default();
        Ok(ApiResponse {
            status,
            headers,
            body_text,
        })
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
pub fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
