use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use futures::StreamExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use brew_timers::{create_router, tasks::ManualScheduler, timer::BrewDurations, AppState};

struct Harness {
    app: Router,
    brew: ManualScheduler,
    backwash: ManualScheduler,
}

fn harness() -> Harness {
    let brew = ManualScheduler::new();
    let backwash = ManualScheduler::new();
    let state = Arc::new(AppState::with_schedulers(
        20554,
        "127.0.0.1".to_string(),
        BrewDurations::new(3, 2),
        Box::new(brew.clone()),
        Box::new(backwash.clone()),
    ));
    Harness {
        app: create_router(state),
        brew,
        backwash,
    }
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn health() {
    let h = harness();
    let (status, body) = call(&h.app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn brew_runs_through_both_stages() {
    let h = harness();
    let (status, body) = call(&h.app, Method::POST, "/brew/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["timer"]["phase"], "running_on");
    assert_eq!(body["timer"]["display"], "00:03");

    h.brew.advance(3);
    let (_, body) = call(&h.app, Method::GET, "/status", None).await;
    assert_eq!(body["brew"]["phase"], "running_off");
    assert_eq!(body["brew"]["current"], 2);
    assert_eq!(body["brew"]["display"], "00:02");

    h.brew.advance(2);
    let (_, body) = call(&h.app, Method::GET, "/status", None).await;
    assert_eq!(body["brew"]["phase"], "complete");
    assert_eq!(body["last_action"], "brew-start");
}

#[tokio::test]
async fn pause_and_resume() {
    let h = harness();
    call(&h.app, Method::POST, "/brew/start", None).await;
    h.brew.advance(1);

    let (_, body) = call(&h.app, Method::POST, "/brew/pause", None).await;
    assert_eq!(body["status"], "paused");
    assert_eq!(h.brew.advance(5), 0);

    let (_, body) = call(&h.app, Method::POST, "/brew/start", None).await;
    assert_eq!(body["status"], "running");
    assert_eq!(body["timer"]["remaining_seconds"], 2);
}

#[tokio::test]
async fn editing_durations_resets_with_coerced_values() {
    let h = harness();
    call(&h.app, Method::POST, "/brew/start", None).await;
    h.brew.advance(1);

    let edit = json!({
        "stage1": { "minutes": "1", "seconds": "5" },
        "stage2": { "minutes": "", "seconds": "oops" }
    });
    let (status, body) = call(&h.app, Method::PUT, "/brew/durations", Some(edit)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");
    assert_eq!(body["timer"]["display"], "01:05");
    assert_eq!(body["timer"]["configured_durations"], json!([65, 0]));
    assert_eq!(h.brew.live_handles(), 0);

    let (_, body) = call(&h.app, Method::POST, "/brew/reset", None).await;
    assert_eq!(body["timer"]["remaining_seconds"], 65);
}

#[tokio::test]
async fn backwash_preset_and_stop() {
    let h = harness();
    let (status, body) = call(&h.app, Method::POST, "/backwash/short/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["configured_durations"], json!([5, 5]));
    assert_eq!(body["timer"]["total"], 10);
    assert_eq!(body["timer"]["label"], "Round 1/10 - on");

    h.backwash.advance(6);
    let (_, body) = call(&h.app, Method::GET, "/status", None).await;
    assert_eq!(body["backwash"]["phase"], "running_off");
    assert_eq!(body["backwash"]["display"], "00:04");

    let (_, body) = call(&h.app, Method::POST, "/backwash/stop", None).await;
    assert_eq!(body["status"], "idle");
    assert_eq!(body["timer"]["display"], "00:00");

    let (status, body) = call(&h.app, Method::POST, "/backwash/stop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["display"], "00:00");
}

#[tokio::test]
async fn long_preset_runs_to_completion() {
    let h = harness();
    call(&h.app, Method::POST, "/backwash/long/start", None).await;
    assert_eq!(h.backwash.advance(1000), 100);

    let (_, body) = call(&h.app, Method::GET, "/status", None).await;
    assert_eq!(body["backwash"]["phase"], "complete");
    assert_eq!(body["backwash"]["current"], 5);
}

#[tokio::test]
async fn restarting_backwash_keeps_one_handle() {
    let h = harness();
    call(&h.app, Method::POST, "/backwash/long/start", None).await;
    h.backwash.advance(3);
    call(&h.app, Method::POST, "/backwash/short/start", None).await;

    assert_eq!(h.backwash.live_handles(), 1);
    h.backwash.advance(1);
    let (_, body) = call(&h.app, Method::GET, "/status", None).await;
    assert_eq!(body["backwash"]["remaining_seconds"], 4);
}

#[tokio::test]
async fn unknown_preset_is_not_found() {
    let h = harness();
    let (status, _) = call(&h.app, Method::POST, "/backwash/medium/start", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn events_stream_carries_display_updates() {
    let h = harness();
    call(&h.app, Method::POST, "/brew/start", None).await;

    let request = Request::builder().uri("/events").body(Body::empty()).unwrap();
    let response = h.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/event-stream"), "{}", content_type);

    h.brew.advance(1);

    let mut frames = response.into_body().into_data_stream();
    let chunk = tokio::time::timeout(Duration::from_secs(5), frames.next())
        .await
        .expect("no event within timeout")
        .expect("stream ended")
        .unwrap();
    let text = String::from_utf8(chunk.to_vec()).unwrap();
    let data = text
        .lines()
        .find_map(|line| line.strip_prefix("data:"))
        .expect("frame without data line");
    let event: Value = serde_json::from_str(data.trim()).unwrap();

    assert_eq!(event["type"], "display");
    assert_eq!(event["timer"], "brew");
    assert_eq!(event["display"], "00:02");
    assert_eq!(event["remaining_seconds"], 2);
}
