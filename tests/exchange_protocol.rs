//! Integration tests for the accumulate/freeze/dispatch protocol.
//!
//! A recording runner stands in for the real exchange runner so the frozen
//! actions handed through the seam can be inspected without a network.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use stepwire::{
    ActionRunner, ClientConfig, HttpEndpoint, HttpMethod, HttpWorld, ReceiveExpectation,
    SendRequest, StepError,
};

/// Shared handles onto the actions a [`RecordingRunner`] has captured.
#[derive(Debug, Default, Clone)]
struct Recording {
    sent: Arc<Mutex<Vec<SendRequest>>>,
    received: Arc<Mutex<Vec<ReceiveExpectation>>>,
}

impl Recording {
    fn sent(&self) -> Vec<SendRequest> {
        self.sent.lock().expect("sent lock").clone()
    }

    fn received(&self) -> Vec<ReceiveExpectation> {
        self.received.lock().expect("received lock").clone()
    }
}

/// Runner double capturing dispatched actions instead of performing them.
#[derive(Debug)]
struct RecordingRunner(Recording);

#[async_trait]
impl ActionRunner for RecordingRunner {
    async fn send(
        &mut self,
        _endpoint: &HttpEndpoint,
        request: SendRequest,
    ) -> Result<(), StepError> {
        self.0.sent.lock().expect("sent lock").push(request);
        Ok(())
    }

    async fn receive(
        &mut self,
        _endpoint: &HttpEndpoint,
        expected: ReceiveExpectation,
    ) -> Result<(), StepError> {
        self.0.received.lock().expect("received lock").push(expected);
        Ok(())
    }
}

fn recording_world() -> (HttpWorld, Recording) {
    let mut world = HttpWorld::new().expect("world");
    let recording = Recording::default();
    world.set_runner(Box::new(RecordingRunner(recording.clone())));
    (world, recording)
}

#[tokio::test]
async fn header_merge_is_last_writer_wins_and_cleared_by_send() {
    let (mut world, recording) = recording_world();

    world.exchange_mut().add_request_header("X-Run", "1");
    world.exchange_mut().add_request_header("X-Run", "2");
    world.exchange_mut().add_request_header("Accept", "application/json");
    world
        .send(Some(HttpMethod::Post), Some("/orders".to_string()))
        .await
        .expect("first send");

    world.send(Some(HttpMethod::Get), None).await.expect("second send");

    let sent = recording.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].headers.get("X-Run").map(String::as_str), Some("2"));
    assert_eq!(sent[0].headers.len(), 2);
    assert!(sent[1].headers.is_empty(), "headers leaked into the next turn");
}

#[tokio::test]
async fn later_body_wins_and_is_cleared_by_send() {
    let (mut world, recording) = recording_world();

    world.exchange_mut().set_request_body("{\"draft\":true}");
    world.exchange_mut().set_request_body("{\"draft\":false}");
    world
        .send(Some(HttpMethod::Put), Some("/orders/7".to_string()))
        .await
        .expect("first send");
    world.send(None, None).await.expect("second send");

    let sent = recording.sent();
    assert_eq!(sent[0].body.as_deref(), Some("{\"draft\":false}"));
    assert!(sent[1].body.is_none());
}

#[tokio::test]
async fn omitted_method_dispatches_as_post() {
    let (mut world, recording) = recording_world();

    world.send(None, None).await.expect("send");
    assert_eq!(recording.sent()[0].method, HttpMethod::Post);
}

#[tokio::test]
async fn receive_carries_headers_body_and_expressions_then_clears() {
    let (mut world, recording) = recording_world();

    world
        .exchange_mut()
        .add_response_header("Content-Type", "application/json");
    world.exchange_mut().set_response_body("{\"status\":\"ok\"}");
    world.exchange_mut().add_expression("$.status", "ok");
    world.receive(200).await.expect("first receive");

    world.receive(204).await.expect("second receive");

    let received = recording.received();
    assert_eq!(received[0].status, 200);
    assert_eq!(
        received[0].headers.get("Content-Type").map(String::as_str),
        Some("application/json")
    );
    assert_eq!(received[0].body.as_deref(), Some("{\"status\":\"ok\"}"));
    assert_eq!(
        received[0].expressions.get("$.status").map(String::as_str),
        Some("ok")
    );

    assert_eq!(received[1].status, 204);
    assert!(received[1].headers.is_empty());
    assert!(received[1].body.is_none());
    assert!(received[1].expressions.is_empty());
}

#[tokio::test]
async fn secure_url_installs_the_trust_all_transport() {
    let (mut world, _recording) = recording_world();

    assert!(!world.endpoint().trusts_all());
    world.set_url("http://localhost:8080").expect("plain url");
    assert!(!world.endpoint().trusts_all());

    world.set_url("https://localhost:8443").expect("secure url");
    assert!(world.endpoint().trusts_all());
}

#[tokio::test]
async fn explicit_url_rides_along_with_the_frozen_request() {
    let (mut world, recording) = recording_world();

    world.set_url("http://localhost:9191/api").expect("url");
    world
        .send(Some(HttpMethod::Get), Some("/health".to_string()))
        .await
        .expect("send");
    world.send(None, None).await.expect("later send");

    let sent = recording.sent();
    assert_eq!(
        sent[0].url.as_ref().map(url::Url::as_str),
        Some("http://localhost:9191/api")
    );
    // The target URL is scenario-scoped, not part of the cleared request.
    assert_eq!(sent[0].url, sent[1].url);
}

#[tokio::test]
async fn raw_request_text_freezes_without_leaking_accumulated_state() {
    let (mut world, recording) = recording_world();

    world.exchange_mut().add_request_header("X-Stale", "yes");
    world.exchange_mut().set_request_body("stale body");
    world
        .send_raw("GET /catalogue HTTP/1.1\nAccept: application/json\n")
        .await
        .expect("raw send");
    world.send(None, None).await.expect("next send");

    let sent = recording.sent();
    assert_eq!(sent[0].method, HttpMethod::Get);
    assert_eq!(sent[0].path.as_deref(), Some("/catalogue"));
    assert_eq!(
        sent[0].headers.get("Accept").map(String::as_str),
        Some("application/json")
    );
    assert!(!sent[0].headers.contains_key("X-Stale"));
    assert!(sent[0].body.is_none());
    assert!(sent[1].headers.is_empty(), "stale state survived the raw send");
    assert!(sent[1].body.is_none());
}

#[tokio::test]
async fn raw_response_text_freezes_the_expectation() {
    let (mut world, recording) = recording_world();

    world.exchange_mut().add_expression("$.status", "ok");
    world
        .receive_raw("HTTP/1.1 404 Not Found\nContent-Type: text/plain\n\nmissing")
        .await
        .expect("raw receive");

    let received = recording.received();
    assert_eq!(received[0].status, 404);
    assert_eq!(received[0].body.as_deref(), Some("missing"));
    assert_eq!(
        received[0].expressions.get("$.status").map(String::as_str),
        Some("ok")
    );
}

#[tokio::test]
async fn selecting_an_unknown_client_names_the_id() {
    let (mut world, _recording) = recording_world();

    let err = world.select_client("billing").expect_err("not registered");
    assert!(matches!(err, StepError::UnknownClient(_)));
    assert!(err.to_string().contains("billing"));
}

#[tokio::test]
async fn selecting_a_registered_client_switches_the_endpoint() {
    let (mut world, _recording) = recording_world();

    world.register_client(
        "stub",
        ClientConfig::for_base_url("http://127.0.0.1:7777").expect("config"),
    );
    world.select_client("stub").expect("registered");
    assert_eq!(world.endpoint().name(), "stub");
    assert_eq!(world.endpoint().base_url().port(), Some(7777));
}
