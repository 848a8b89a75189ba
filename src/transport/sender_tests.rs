//! Tests for `RetryingTransport`.

use std::sync::Arc;
use std::time::Duration;

use super::{
    AccessToken, AttemptError, FilePart, HttpError, IsRetryable, MultipartForm, RequestBody,
    RetryPolicy, RetryingTransport, TransportError,
};
use crate::test_fixtures::{MockClient, RecordingSleeper, Scripted};
use crate::time::InstantSleeper;

fn base_url() -> url::Url {
    url::Url::parse("https://bmp.example.com/api/v1").unwrap()
}

fn token() -> AccessToken {
    AccessToken::new("abc123")
}

fn transport(
    client: Arc<MockClient>,
    max_attempts: u32,
) -> RetryingTransport<Arc<MockClient>, Arc<RecordingSleeper>> {
    RetryingTransport::new(client, base_url())
        .with_sleeper(Arc::new(RecordingSleeper::default()))
        .with_retry_policy(RetryPolicy::new().with_max_attempts(max_attempts))
}

fn sample_form() -> MultipartForm {
    MultipartForm::new(FilePart {
        field: "file".to_string(),
        file_name: "cat.png".to_string(),
        content: vec![0x89, 0x50, 0x4e, 0x47],
    })
    .text("to", "628116823073")
    .text("mediaType", "image")
}

mod builder {
    use super::*;

    #[test]
    fn new_uses_defaults() {
        let transport = RetryingTransport::new(MockClient::ok(), base_url());

        assert_eq!(transport.base_url().as_str(), "https://bmp.example.com/api/v1");
        assert_eq!(transport.timeout(), Duration::from_millis(15_000));
        assert_eq!(transport.retry_policy(), &RetryPolicy::default());
    }

    #[test]
    fn default_timeout_follows_config_default() {
        let expected = crate::config::defaults::REQUEST_TIMEOUT_MS;

        assert_eq!(crate::transport::DEFAULT_TIMEOUT, Duration::from_millis(expected));
    }

    #[test]
    fn with_timeout_and_policy() {
        let transport = RetryingTransport::new(MockClient::ok(), base_url())
            .with_timeout(Duration::from_millis(250))
            .with_retry_policy(RetryPolicy::new().with_max_attempts(7));

        assert_eq!(transport.timeout(), Duration::from_millis(250));
        assert_eq!(transport.retry_policy().max_attempts, 7);
    }

    #[test]
    fn endpoint_concatenates_path() {
        let transport = RetryingTransport::new(MockClient::ok(), base_url());

        assert_eq!(
            transport.endpoint("/message").unwrap().as_str(),
            "https://bmp.example.com/api/v1/message"
        );
        assert_eq!(
            transport.endpoint("/message/media").unwrap().as_str(),
            "https://bmp.example.com/api/v1/message/media"
        );
    }

    #[test]
    fn endpoint_handles_trailing_slash_on_base() {
        let base = url::Url::parse("https://bmp.example.com/").unwrap();
        let transport = RetryingTransport::new(MockClient::ok(), base);

        assert_eq!(
            transport.endpoint("/message").unwrap().as_str(),
            "https://bmp.example.com/message"
        );
    }
}

mod post_json {
    use super::*;

    #[tokio::test]
    async fn returns_status_and_parsed_body() {
        let client = Arc::new(MockClient::ok());
        let transport = transport(client.clone(), 3);

        let delivery = transport
            .post_json("/message", &serde_json::json!({"type": "text"}), &token())
            .await
            .unwrap();

        assert_eq!(delivery.status, http::StatusCode::OK);
        assert_eq!(
            delivery.data,
            serde_json::json!({"status": "ok", "messageId": "123"})
        );
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn sends_json_body_with_headers() {
        let client = Arc::new(MockClient::ok());
        let transport = transport(client.clone(), 3);

        transport
            .post_json("/message", &serde_json::json!({"text": "hello"}), &token())
            .await
            .unwrap();

        let request = &client.captured_requests()[0];
        assert_eq!(request.method, http::Method::POST);
        assert_eq!(
            request.url.as_str(),
            "https://bmp.example.com/api/v1/message"
        );
        assert_eq!(
            request.headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let Some(RequestBody::Bytes(body)) = &request.body else {
            panic!("expected byte body, got {:?}", request.body);
        };
        let sent: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(sent, serde_json::json!({"text": "hello"}));
    }

    #[tokio::test]
    async fn authorization_header_is_normalized() {
        for raw in ["abc123", "Bearer abc123"] {
            let client = Arc::new(MockClient::ok());
            let transport = transport(client.clone(), 1);

            transport
                .post_json("/message", &serde_json::json!({}), &AccessToken::new(raw))
                .await
                .unwrap();

            let request = &client.captured_requests()[0];
            assert_eq!(
                request.headers.get(http::header::AUTHORIZATION).unwrap(),
                "Bearer abc123",
                "token given as {raw:?}"
            );
        }
    }

    #[tokio::test]
    async fn unparsable_body_becomes_empty_object() {
        let client = Arc::new(MockClient::new(vec![Scripted::Respond(
            http::StatusCode::OK,
            b"<html>ok</html>".to_vec(),
        )]));
        let transport = transport(client, 1);

        let delivery = transport
            .post_json("/message", &serde_json::json!({}), &token())
            .await
            .unwrap();

        assert_eq!(delivery.data, serde_json::json!({}));
    }

    #[tokio::test]
    async fn empty_body_becomes_empty_object() {
        let client = Arc::new(MockClient::always(202));
        let transport = transport(client, 1);

        let delivery = transport
            .post_json("/message", &serde_json::json!({}), &token())
            .await
            .unwrap();

        assert_eq!(delivery.status, http::StatusCode::ACCEPTED);
        assert_eq!(delivery.data, serde_json::json!({}));
    }

    #[tokio::test]
    async fn invalid_token_fails_before_any_call() {
        let client = Arc::new(MockClient::ok());
        let transport = transport(client.clone(), 3);

        let result = transport
            .post_json("/message", &serde_json::json!({}), &AccessToken::new("a\nb"))
            .await;

        assert!(matches!(result, Err(TransportError::InvalidCredential(_))));
        assert_eq!(client.calls(), 0);
    }
}

mod retry {
    use super::*;

    #[tokio::test]
    async fn succeeds_on_nth_attempt_after_server_errors() {
        for n in 1..=3 {
            let client = Arc::new(MockClient::failing_then_ok(500, n - 1));
            let transport = transport(client.clone(), 3);

            let result = transport
                .post_json("/message", &serde_json::json!({}), &token())
                .await;

            assert!(result.is_ok(), "n = {n}");
            assert_eq!(client.calls(), n);
        }
    }

    #[tokio::test]
    async fn persistent_server_error_exhausts_attempts() {
        let client = Arc::new(MockClient::always(500));
        let sleeper = Arc::new(RecordingSleeper::default());
        let transport = RetryingTransport::new(client.clone(), base_url())
            .with_sleeper(sleeper.clone())
            .with_retry_policy(RetryPolicy::new().with_max_attempts(3));

        let result = transport
            .post_json("/message", &serde_json::json!({}), &token())
            .await;

        assert_eq!(client.calls(), 3);
        match result {
            Err(TransportError::Status {
                status, attempts, ..
            }) => {
                assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(attempts, 3);
            }
            other => panic!("expected Status error, got {other:?}"),
        }

        let delays = sleeper.delays();
        assert_eq!(delays, vec![Duration::from_secs(1), Duration::from_secs(2)]);
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
        assert!(delays.iter().all(|d| *d <= Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn backoff_is_capped_at_five_seconds() {
        let client = Arc::new(MockClient::always(503));
        let sleeper = Arc::new(RecordingSleeper::default());
        let transport = RetryingTransport::new(client.clone(), base_url())
            .with_sleeper(sleeper.clone())
            .with_retry_policy(RetryPolicy::new().with_max_attempts(6));

        let _ = transport
            .post_json("/message", &serde_json::json!({}), &token())
            .await;

        assert_eq!(client.calls(), 6);
        assert_eq!(
            sleeper.delays(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(5),
                Duration::from_secs(5),
            ]
        );
    }

    #[tokio::test]
    async fn client_error_is_terminal() {
        let client = Arc::new(MockClient::new(vec![MockClient::json(
            404,
            &serde_json::json!({"error": "not found"}),
        )]));
        let sleeper = Arc::new(RecordingSleeper::default());
        let transport = RetryingTransport::new(client.clone(), base_url())
            .with_sleeper(sleeper.clone());

        let result = transport
            .post_json("/message", &serde_json::json!({}), &token())
            .await;

        assert_eq!(client.calls(), 1);
        assert!(sleeper.delays().is_empty());
        match result {
            Err(TransportError::Status {
                status,
                body,
                attempts,
            }) => {
                assert_eq!(status, http::StatusCode::NOT_FOUND);
                assert_eq!(body, serde_json::json!({"error": "not found"}));
                assert_eq!(attempts, 1);
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rate_limit_and_request_timeout_are_retried() {
        for status in [429, 408] {
            let client = Arc::new(MockClient::failing_then_ok(status, 1));
            let transport = transport(client.clone(), 3);

            let result = transport
                .post_json("/message", &serde_json::json!({}), &token())
                .await;

            assert!(result.is_ok(), "status {status}");
            assert_eq!(client.calls(), 2);
        }
    }

    #[tokio::test]
    async fn connection_errors_are_retried_then_surface_as_network_error() {
        let client = Arc::new(MockClient::new(vec![Scripted::ConnectionError]));
        let transport = transport(client.clone(), 3);

        let result = transport
            .post_json("/message", &serde_json::json!({}), &token())
            .await;

        assert_eq!(client.calls(), 3);
        assert!(matches!(
            result,
            Err(TransportError::Network {
                attempts: 3,
                source: HttpError::Connection(_)
            })
        ));
    }

    #[tokio::test]
    async fn single_attempt_never_sleeps() {
        let client = Arc::new(MockClient::always(500));
        let sleeper = Arc::new(RecordingSleeper::default());
        let transport = RetryingTransport::new(client.clone(), base_url())
            .with_sleeper(sleeper.clone())
            .with_retry_policy(RetryPolicy::new().with_max_attempts(1));

        let result = transport
            .post_json("/message", &serde_json::json!({}), &token())
            .await;

        assert!(result.is_err());
        assert_eq!(client.calls(), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn error_reports_attempts() {
        let client = MockClient::always(502);
        let transport = RetryingTransport::new(client, base_url())
            .with_sleeper(InstantSleeper)
            .with_retry_policy(RetryPolicy::new().with_max_attempts(4));

        let error = transport
            .post_json("/message", &serde_json::json!({}), &token())
            .await
            .unwrap_err();

        assert_eq!(error.attempts(), Some(4));
        assert_eq!(error.status(), Some(http::StatusCode::BAD_GATEWAY));
    }
}

mod timeout {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn hung_call_is_aborted_and_retried() {
        let client = Arc::new(MockClient::new(vec![
            Scripted::Hang,
            MockClient::json(200, &serde_json::json!({"messageId": "late"})),
        ]));
        let transport = RetryingTransport::new(client.clone(), base_url())
            .with_sleeper(InstantSleeper)
            .with_timeout(Duration::from_millis(100));

        let delivery = transport
            .post_json("/message", &serde_json::json!({}), &token())
            .await
            .unwrap();

        assert_eq!(client.calls(), 2);
        assert_eq!(delivery.data, serde_json::json!({"messageId": "late"}));
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_timeout_surfaces_as_network_error() {
        let client = Arc::new(MockClient::new(vec![Scripted::Hang]));
        let transport = RetryingTransport::new(client.clone(), base_url())
            .with_sleeper(InstantSleeper)
            .with_timeout(Duration::from_millis(100))
            .with_retry_policy(RetryPolicy::new().with_max_attempts(2));

        let result = transport
            .post_json("/message", &serde_json::json!({}), &token())
            .await;

        assert_eq!(client.calls(), 2);
        assert!(matches!(
            result,
            Err(TransportError::Network {
                attempts: 2,
                source: HttpError::Timeout
            })
        ));
    }
}

mod post_multipart {
    use super::*;

    #[tokio::test]
    async fn sends_form_without_content_type_override() {
        let client = Arc::new(MockClient::ok());
        let transport = transport(client.clone(), 3);

        transport
            .post_multipart("/message/media", sample_form(), &token())
            .await
            .unwrap();

        let request = &client.captured_requests()[0];
        assert_eq!(
            request.url.as_str(),
            "https://bmp.example.com/api/v1/message/media"
        );
        assert!(request.headers.get(http::header::CONTENT_TYPE).is_none());
        assert_eq!(
            request.headers.get(http::header::AUTHORIZATION).unwrap(),
            "Bearer abc123"
        );
        assert_eq!(request.body, Some(RequestBody::Multipart(sample_form())));
    }

    #[tokio::test]
    async fn retries_reuse_identical_form() {
        let client = Arc::new(MockClient::failing_then_ok(503, 2));
        let transport = transport(client.clone(), 3);

        transport
            .post_multipart("/message/media", sample_form(), &token())
            .await
            .unwrap();

        let requests = client.captured_requests();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r.body == requests[0].body));
    }

    #[tokio::test]
    async fn terminal_status_is_not_retried() {
        let client = Arc::new(MockClient::always(400));
        let transport = transport(client.clone(), 3);

        let result = transport
            .post_multipart("/message/media", sample_form(), &token())
            .await;

        assert_eq!(client.calls(), 1);
        assert_eq!(
            result.unwrap_err().status(),
            Some(http::StatusCode::BAD_REQUEST)
        );
    }
}

mod is_retryable {
    use super::*;

    fn status_error(code: u16) -> AttemptError {
        AttemptError::NonSuccessStatus {
            status: http::StatusCode::from_u16(code).unwrap(),
            body: serde_json::json!({}),
        }
    }

    #[test]
    fn server_errors_are_retryable() {
        for code in [500, 502, 503, 504, 599] {
            assert!(status_error(code).is_retryable(), "{code}");
        }
    }

    #[test]
    fn rate_limit_and_timeout_statuses_are_retryable() {
        assert!(status_error(429).is_retryable());
        assert!(status_error(408).is_retryable());
    }

    #[test]
    fn other_client_errors_are_terminal() {
        for code in [400, 401, 403, 404, 409, 422] {
            assert!(!status_error(code).is_retryable(), "{code}");
        }
    }

    #[test]
    fn transport_failures() {
        assert!(HttpError::Timeout.is_retryable());
        assert!(HttpError::Connection("reset".into()).is_retryable());
        assert!(!HttpError::InvalidRequest("bad".to_string()).is_retryable());
    }
}
