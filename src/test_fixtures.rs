//! Shared test fixtures: scripted HTTP client and recording sleeper.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::time::Sleeper;
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// One scripted reaction of [`MockClient`].
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Answer with the given status and body.
    Respond(http::StatusCode, Vec<u8>),
    /// Fail the call with a connection error.
    ConnectionError,
    /// Never answer (lets the transport timeout fire).
    Hang,
}

/// Mock HTTP client that replays a configurable sequence of reactions.
///
/// Once the script is exhausted the last reaction is repeated.
#[derive(Debug)]
pub struct MockClient {
    script: Mutex<VecDeque<Scripted>>,
    fallback: Mutex<Option<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn json(status: u16, body: &serde_json::Value) -> Scripted {
        Scripted::Respond(
            http::StatusCode::from_u16(status).unwrap(),
            serde_json::to_vec(body).unwrap(),
        )
    }

    pub fn status(status: u16) -> Scripted {
        Scripted::Respond(http::StatusCode::from_u16(status).unwrap(), Vec::new())
    }

    /// Client answering every call with 200 and `{"status":"ok","messageId":"123"}`.
    pub fn ok() -> Self {
        Self::new(vec![Self::json(
            200,
            &serde_json::json!({"status": "ok", "messageId": "123"}),
        )])
    }

    /// Client answering `failures` times with `status`, then 200.
    pub fn failing_then_ok(status: u16, failures: usize) -> Self {
        let mut script: Vec<Scripted> = (0..failures).map(|_| Self::status(status)).collect();
        script.push(Self::json(200, &serde_json::json!({"status": "ok"})));
        Self::new(script)
    }

    /// Client answering every call with `status`.
    pub fn always(status: u16) -> Self {
        Self::new(vec![Self::status(status)])
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_reaction(&self) -> Scripted {
        let mut script = self.script.lock().unwrap();
        let mut fallback = self.fallback.lock().unwrap();
        if let Some(reaction) = script.pop_front() {
            *fallback = Some(reaction.clone());
            return reaction;
        }
        fallback.clone().unwrap_or(Scripted::Hang)
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);

        match self.next_reaction() {
            Scripted::Respond(status, body) => Ok(HttpResponse::new(status, body)),
            Scripted::ConnectionError => Err(HttpError::Connection("connection refused".into())),
            Scripted::Hang => std::future::pending().await,
        }
    }
}

/// Sleeper that returns immediately but remembers every requested delay.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

impl Sleeper for std::sync::Arc<RecordingSleeper> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}
