//! HTTP request/response types and client trait.

use super::HttpError;

/// A file attached to a multipart body.
///
/// The content is fully buffered so the same bytes can be sent again on
/// every retry without touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name
    pub field: String,
    /// File name reported to the server
    pub file_name: String,
    /// File content
    pub content: Vec<u8>,
}

/// A multipart form: ordered text fields plus one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartForm {
    /// The attached file
    pub file: FilePart,
    /// Text fields in the order they are appended
    pub fields: Vec<(String, String)>,
}

impl MultipartForm {
    /// Creates a form holding only the given file.
    #[must_use]
    pub const fn new(file: FilePart) -> Self {
        Self {
            file,
            fields: Vec::new(),
        }
    }

    /// Appends a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Returns the value of the first text field with the given name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Raw bytes, sent as-is (JSON payloads).
    Bytes(Vec<u8>),
    /// Multipart form; the boundary is chosen by the client implementation.
    Multipart(MultipartForm),
}

/// One outgoing call to the platform.
///
/// Built once per send and cloned for every attempt, so all attempts carry
/// identical headers and body.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Always `POST` for the platform endpoints
    pub method: http::Method,
    /// Fully resolved endpoint
    pub url: url::Url,
    /// Authorization and content-type headers
    pub headers: http::HeaderMap,
    /// JSON bytes or a multipart form
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    /// Starts a `POST` to `url` with no headers and no body.
    #[must_use]
    pub fn post(url: url::Url) -> Self {
        Self {
            method: http::Method::POST,
            url,
            headers: http::HeaderMap::new(),
            body: None,
        }
    }

    /// Uses `body` as the raw request body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(RequestBody::Bytes(body));
        self
    }

    /// Uses `form` as the request body, replacing any byte body.
    #[must_use]
    pub fn with_multipart(mut self, form: MultipartForm) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }

    /// Appends a header; an existing value under the same name is kept.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }
}

/// The platform's answer to one attempt, body fully buffered.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status line code
    pub status: http::StatusCode,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub const fn new(status: http::StatusCode, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parses the body as JSON.
    ///
    /// Empty or malformed bodies yield an empty JSON object instead of an
    /// error; upstream replies are not always well-formed.
    #[must_use]
    pub fn json_or_empty(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new()))
    }
}

/// Performs single HTTP calls for the retrying transport.
///
/// Implemented by [`ReqwestClient`](super::ReqwestClient) in production and
/// by scripted clients in tests. Timeouts are not the client's concern; the
/// retrying transport bounds every call itself.
pub trait HttpClient: Send + Sync {
    /// Sends `req` once and returns whatever status the server answered with.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when no response was received:
    /// - Network connection fails ([`HttpError::Connection`])
    /// - Request times out ([`HttpError::Timeout`])
    /// - The request cannot be built ([`HttpError::InvalidRequest`])
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}

impl<T: HttpClient> HttpClient for std::sync::Arc<T> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        (**self).request(req).await
    }
}
