//! Tests for `ReqwestClient`.
//!
//! Request behaviour is exercised through the mock client in the transport
//! tests; these only touch what needs a real client.

use super::client::USER_AGENT;
use super::{HttpClient, HttpError, HttpRequest, ReqwestClient};

#[test]
fn user_agent_names_the_crate() {
    assert!(USER_AGENT.starts_with("bmp-gateway/"));
}

#[test]
fn client_is_send_sync() {
    fn assert_send_sync<T: Send + Sync + HttpClient>() {}
    assert_send_sync::<ReqwestClient>();
}

#[tokio::test]
async fn unreachable_host_is_a_connection_failure() {
    let client = ReqwestClient::default();
    let url = url::Url::parse("http://invalid.invalid.invalid/message").unwrap();
    let req = HttpRequest::post(url).with_body(b"{}".to_vec());

    let result = client.request(req).await;

    // A proxy may answer with an error status instead
    match result {
        Err(HttpError::Connection(_) | HttpError::Timeout) => {}
        Ok(resp) if !resp.is_success() => {}
        other => panic!("expected a connection failure, got {other:?}"),
    }
}
