//! Retrying transport: bounded attempts, per-call timeout, exponential backoff.

use std::time::Duration;

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::HeaderValue;
use serde::Serialize;

use crate::config::defaults;
use crate::time::{Sleeper, TokioSleeper};

use super::{
    AccessToken, AttemptError, HttpClient, HttpError, HttpRequest, MultipartForm, RetryPolicy,
    TransportError,
};

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(defaults::REQUEST_TIMEOUT_MS);

/// Normalized successful reply: status plus best-effort parsed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// HTTP status code
    pub status: http::StatusCode,
    /// Response body; an empty object when the body was not valid JSON
    pub data: serde_json::Value,
}

/// HTTP transport with retry support.
///
/// Both entry points ([`post_json`](Self::post_json) and
/// [`post_multipart`](Self::post_multipart)) run the same algorithm:
///
/// 1. Issue the call, aborting it if it exceeds the configured timeout.
/// 2. On a 2xx status, parse the body and return.
/// 3. On 408, 429, 5xx, timeout or connection failure, wait
///    `min(1s * 2^(attempt-1), 5s)` and try again while attempts remain.
/// 4. Any other status fails immediately.
///
/// Attempts are strictly sequential. The request (including any file
/// content) is built once and reused verbatim for every attempt.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper used for backoff delays (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```
/// use bmp_gateway::transport::{ReqwestClient, RetryingTransport};
/// use url::Url;
///
/// let transport = RetryingTransport::new(
///     ReqwestClient::new(),
///     Url::parse("https://bmp.example.com/api/v1").unwrap(),
/// );
/// assert_eq!(transport.retry_policy().max_attempts, 3);
/// ```
#[derive(Debug)]
pub struct RetryingTransport<H, S = TokioSleeper> {
    client: H,
    sleeper: S,
    base_url: url::Url,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl<H> RetryingTransport<H, TokioSleeper> {
    /// Creates a transport with the default timeout and retry policy.
    #[must_use]
    pub fn new(client: H, base_url: url::Url) -> Self {
        Self {
            client,
            sleeper: TokioSleeper,
            base_url,
            timeout: DEFAULT_TIMEOUT,
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl<H, S> RetryingTransport<H, S> {
    /// Sets a custom sleeper for backoff delays.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RetryingTransport<H, S2> {
        RetryingTransport {
            client: self.client,
            sleeper,
            base_url: self.base_url,
            timeout: self.timeout,
            retry_policy: self.retry_policy,
        }
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Returns the configured base URL.
    #[must_use]
    pub const fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Resolves `path` against the base URL by plain concatenation.
    ///
    /// `https://host/api` + `/message` gives `https://host/api/message`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidEndpoint`] if the result is not a URL.
    pub fn endpoint(&self, path: &str) -> Result<url::Url, TransportError> {
        let endpoint = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url::Url::parse(&endpoint).map_err(|e| TransportError::InvalidEndpoint {
            endpoint,
            reason: e.to_string(),
        })
    }
}

impl<H: HttpClient, S: Sleeper> RetryingTransport<H, S> {
    /// POSTs a JSON body to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the body cannot be encoded, the endpoint
    /// is invalid, or the call fails after all permitted attempts.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        token: &AccessToken,
    ) -> Result<Delivery, TransportError> {
        let body = serde_json::to_vec(body)?;
        let request = self
            .authorized_post(path, token)?
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .with_body(body);

        self.send_with_retry(&request).await
    }

    /// POSTs a multipart form to `path`.
    ///
    /// No content type is set here; the client computes the boundary.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the endpoint is invalid or the call
    /// fails after all permitted attempts.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: MultipartForm,
        token: &AccessToken,
    ) -> Result<Delivery, TransportError> {
        let request = self.authorized_post(path, token)?.with_multipart(form);

        self.send_with_retry(&request).await
    }

    fn authorized_post(
        &self,
        path: &str,
        token: &AccessToken,
    ) -> Result<HttpRequest, TransportError> {
        let auth = token
            .header_value()
            .map_err(TransportError::InvalidCredential)?;
        Ok(HttpRequest::post(self.endpoint(path)?).with_header(AUTHORIZATION, auth))
    }

    /// Executes a single attempt, bounded by the timeout.
    async fn execute_request(&self, request: &HttpRequest) -> Result<Delivery, AttemptError> {
        let response = tokio::time::timeout(self.timeout, self.client.request(request.clone()))
            .await
            .map_err(|_| HttpError::Timeout)??;

        let data = response.json_or_empty();
        if response.is_success() {
            return Ok(Delivery {
                status: response.status,
                data,
            });
        }

        Err(AttemptError::NonSuccessStatus {
            status: response.status,
            body: data,
        })
    }

    /// Runs at most `max_attempts` attempts; the last one never sleeps.
    async fn send_with_retry(&self, request: &HttpRequest) -> Result<Delivery, TransportError> {
        let policy = self.retry_policy.with_max_attempts(self.retry_policy.max_attempts);

        for attempt in 1..policy.max_attempts {
            match self.execute_request(request).await {
                Ok(delivery) => return Ok(delivery),
                Err(e) => {
                    log_failure(&e, attempt, policy.max_attempts);
                    if !e.is_retryable() {
                        return Err(TransportError::from_attempt(e, attempt));
                    }
                    let delay = policy.delay_after(attempt);
                    tracing::debug!(attempt, ?delay, "Backing off before retry");
                    self.sleeper.sleep(delay).await;
                }
            }
        }

        self.execute_request(request).await.map_err(|e| {
            log_failure(&e, policy.max_attempts, policy.max_attempts);
            TransportError::from_attempt(e, policy.max_attempts)
        })
    }
}

fn log_failure(error: &AttemptError, attempt: u32, max_attempts: u32) {
    match error {
        AttemptError::NonSuccessStatus { status, body } => tracing::warn!(
            attempt,
            max_attempts,
            status = status.as_u16(),
            %body,
            "HTTP error from messaging platform"
        ),
        AttemptError::Http(e) => {
            tracing::warn!(attempt, max_attempts, error = %e, "HTTP request failed");
        }
    }
}

/// Extension trait for checking if an error is retryable.
///
/// Determines whether an error represents a transient failure that
/// warrants another attempt.
pub trait IsRetryable {
    /// Returns true if the error is potentially transient and should be retried.
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for HttpError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout => true,
            Self::InvalidRequest(_) => false,
        }
    }
}

impl IsRetryable for http::StatusCode {
    fn is_retryable(&self) -> bool {
        self.is_server_error()
            || *self == Self::TOO_MANY_REQUESTS
            || *self == Self::REQUEST_TIMEOUT
    }
}

impl IsRetryable for AttemptError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_retryable(),
            Self::NonSuccessStatus { status, .. } => status.is_retryable(),
        }
    }
}
