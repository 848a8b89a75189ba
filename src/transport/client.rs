//! reqwest-backed [`HttpClient`].

use reqwest::multipart::{Form, Part};

use super::{HttpClient, HttpError, HttpRequest, HttpResponse, MultipartForm, RequestBody};

/// `User-Agent` sent with every platform call.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Production HTTP client.
///
/// Buffered multipart forms are turned into a fresh [`Form`] on every call,
/// so reqwest picks the boundary and sets the content type itself.
///
/// # Example
///
/// ```no_run
/// use bmp_gateway::transport::{HttpClient, HttpRequest, ReqwestClient};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let url = Url::parse("https://bmp.example.com/api/v1/message")?;
/// let response = client.request(HttpRequest::post(url).with_body(b"{}".to_vec())).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client that identifies itself with [`USER_AGENT`].
    #[must_use]
    pub fn new() -> Self {
        let inner = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { inner }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let builder = self
            .inner
            .request(req.method, req.url.as_str())
            .headers(req.headers);

        let builder = match req.body {
            Some(RequestBody::Bytes(bytes)) => builder.body(bytes),
            Some(RequestBody::Multipart(form)) => builder.multipart(into_form(form)),
            None => builder,
        };

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let body = response.bytes().await.map_err(classify)?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

fn into_form(form: MultipartForm) -> Form {
    let MultipartForm { file, fields } = form;
    let part = Part::bytes(file.content).file_name(file.file_name);

    fields
        .into_iter()
        .fold(Form::new().part(file.field, part), |form, (name, value)| {
            form.text(name, value)
        })
}

fn classify(error: reqwest::Error) -> HttpError {
    if error.is_timeout() {
        HttpError::Timeout
    } else if error.is_builder() {
        HttpError::InvalidRequest(error.to_string())
    } else {
        HttpError::Connection(Box::new(error))
    }
}
