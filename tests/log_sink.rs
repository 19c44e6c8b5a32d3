mod common;

use coinpoll::error::ErrorKind;
use coinpoll::models::SinkConfig;
use coinpoll::services::{HttpLogSink, LogSink, SinkLevel};

use common::{MockApi, Reply};

fn sink_for(api: &MockApi) -> HttpLogSink {
    let config = SinkConfig {
        endpoint: api.base_url(),
        ..SinkConfig::default()
    };
    HttpLogSink::new(reqwest::Client::new(), &config, "tok-123").unwrap()
}

#[tokio::test]
async fn test_posts_to_tagged_input() {
    let api = MockApi::start(vec![Reply::Json(200, r#"{"response":"ok"}"#.into())]).await;

    sink_for(&api)
        .send(SinkLevel::Info, "1. Bitcoin (BTC) - 1.0000 USD")
        .await
        .unwrap();

    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("post /inputs/tok-123/tag/coinapi/ "));
    assert!(requests[0].contains("content-type: application/json"));
}

#[tokio::test]
async fn test_rejected_submission_is_sink_error() {
    let api = MockApi::start(vec![Reply::Json(500, r#"{"response":"nope"}"#.into())]).await;

    let err = sink_for(&api)
        .send(SinkLevel::Error, "boom")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Sink);
    assert!(err.to_string().contains("500"));
}
