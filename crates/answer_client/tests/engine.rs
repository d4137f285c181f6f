use std::sync::Arc;
use std::time::Duration;

use answer_client::{
    AnswerEngine, AskRequest, EngineEvent, FailureKind, ReqwestTransport, TransportSettings,
};
use answer_core::{SessionId, StreamChunk};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

fn engine_for(server: &MockServer) -> AnswerEngine {
    let transport = ReqwestTransport::new(TransportSettings {
        base_url: server.uri(),
        ..TransportSettings::default()
    })
    .expect("client");
    AnswerEngine::new(Arc::new(transport)).expect("engine")
}

/// Collects events up to and including the first `Closed`, `Rejected` or `Failed`.
fn collect_until_settled(engine: &AnswerEngine) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Some(event) = engine.recv_timeout(WAIT) {
        let settled = !matches!(event, EngineEvent::Chunk { .. });
        events.push(event);
        if settled {
            break;
        }
    }
    events
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_reports_chunks_then_closed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            concat!(
                "data: {\"type\":\"answer\",\"content\":\"x\"}\n\n",
                "data: {\"type\":\"done\",\"found_in_docs\":true}\n\n",
            ),
            "text/event-stream",
        ))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.ask(4, AskRequest::new("q", &SessionId::new("s")));

    let events = tokio::task::spawn_blocking(move || collect_until_settled(&engine))
        .await
        .unwrap();
    assert_eq!(
        events,
        vec![
            EngineEvent::Chunk {
                request_id: 4,
                chunk: StreamChunk::Answer {
                    content: "x".to_string()
                },
            },
            EngineEvent::Chunk {
                request_id: 4,
                chunk: StreamChunk::Done {
                    sources: vec![],
                    keywords: vec![],
                    found_in_docs: true,
                },
            },
            EngineEvent::Closed { request_id: 4 },
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_maps_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.ask(1, AskRequest::new("q", &SessionId::new("s")));

    let events = tokio::task::spawn_blocking(move || collect_until_settled(&engine))
        .await
        .unwrap();
    assert_eq!(
        events,
        vec![EngineEvent::Rejected {
            request_id: 1,
            detail: Some("expired".to_string()),
        }]
    );
}

#[test]
fn engine_maps_network_failure() {
    let transport = ReqwestTransport::new(TransportSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        ..TransportSettings::default()
    })
    .expect("client");
    let engine = AnswerEngine::new(Arc::new(transport)).expect("engine");
    engine.ask(2, AskRequest::new("q", &SessionId::new("s")));

    let events = collect_until_settled(&engine);
    assert_eq!(events.len(), 1);
    match &events[0] {
        EngineEvent::Failed { request_id, error } => {
            assert_eq!(*request_id, 2);
            assert_eq!(error.kind, FailureKind::Network);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn cancel_failure_produces_no_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask/cancel/s"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.cancel(SessionId::new("s"));

    let event = tokio::task::spawn_blocking(move || engine.recv_timeout(Duration::from_secs(1)))
        .await
        .unwrap();
    assert_eq!(event, None);
}
