//! Integration tests for the dashboard API endpoints.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. The end-to-end tests wire real controllers over
//! an in-memory store into a [`BroadcastView`].

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use headcount_core::{CounterSyncController, HistorySyncController, ManualClock};
use headcount_observer::router::build_router;
use headcount_observer::state::{AppState, DashboardCommand, DashboardSnapshot, DashboardUpdate};
use headcount_observer::view::BroadcastView;
use headcount_store::MemoryStore;
use headcount_types::EventKind;
use serde_json::Value;
use tower::ServiceExt;

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_json(state: &Arc<AppState>, path: &str) -> (StatusCode, Value) {
    let response = build_router(Arc::clone(state))
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn post(state: &Arc<AppState>, path: &str) -> (StatusCode, Value) {
    let response = build_router(Arc::clone(state))
        .oneshot(Request::post(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn wait_until(state: &AppState, predicate: impl Fn(&DashboardSnapshot) -> bool) {
    let waited = tokio::time::timeout(Duration::from_secs(2), async {
        while !predicate(&state.current()) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(waited.is_ok(), "timed out, state: {:?}", state.current());
}

#[tokio::test]
async fn test_index_returns_html() {
    let (state, _commands) = AppState::new();
    let response = build_router(Arc::new(state))
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Headcount"));
    assert!(html.contains("/api/counter"));
}

#[tokio::test]
async fn test_counter_starts_with_placeholders() {
    let (state, _commands) = AppState::new();
    let (status, json) = get_json(&Arc::new(state), "/api/counter").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["inside"], "-");
    assert_eq!(json["people_inside"], "-");
    assert_eq!(json["activity_log_requests"], 0);
}

#[tokio::test]
async fn test_history_starts_empty() {
    let (state, _commands) = AppState::new();
    let (status, json) = get_json(&Arc::new(state), "/api/history").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["entries"].as_array().unwrap().len(), 0);
    assert_eq!(json["loading"], false);
}

#[tokio::test]
async fn test_clear_history_is_accepted_and_queued() {
    let (state, mut commands) = AppState::new();
    let (status, json) = post(&Arc::new(state), "/api/history/clear").await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["accepted"], true);
    assert_eq!(commands.try_recv().unwrap(), DashboardCommand::ClearHistory);
}

#[tokio::test]
async fn test_activity_log_click_is_queued() {
    let (state, mut commands) = AppState::new();
    let (status, _) = post(&Arc::new(state), "/api/activity-log").await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(
        commands.try_recv().unwrap(),
        DashboardCommand::OpenActivityLog
    );
}

#[tokio::test]
async fn test_commands_after_shutdown_are_unavailable() {
    let (state, commands) = AppState::new();
    drop(commands);
    let (status, json) = post(&Arc::new(state), "/api/history/clear").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], 503);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (state, _commands) = AppState::new();
    let (status, json) = get_json(&Arc::new(state), "/api/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "/api/nope");
}

#[tokio::test]
async fn test_counter_controller_renders_into_api() {
    let store = MemoryStore::new();
    store.record(EventKind::Entry, 1_000).unwrap();
    store.record(EventKind::Entry, 2_000).unwrap();

    let (state, _commands) = AppState::new();
    let state = Arc::new(state);
    let mut controller = CounterSyncController::with_clock(
        Arc::new(store.clone()),
        Arc::new(ManualClock::new(302_000)),
    );
    controller.attach(Arc::new(BroadcastView::new(Arc::clone(&state))));
    controller.load();

    wait_until(&state, |s| s.counter.people_inside == "2").await;
    let (_, json) = get_json(&state, "/api/counter").await;
    assert_eq!(json["entered"], "2");
    assert_eq!(json["exited"], "0");
    assert_eq!(json["last_updated"], "Updated 5m ago");

    controller.detach();
}

#[tokio::test]
async fn test_history_controller_clear_reaches_api() {
    let store = MemoryStore::new();
    store.record(EventKind::Entry, 10).unwrap();
    store.record(EventKind::Exit, 20).unwrap();

    let (state, _commands) = AppState::new();
    let state = Arc::new(state);
    let mut controller = HistorySyncController::with_clock(
        Arc::new(store.clone()),
        Arc::new(ManualClock::new(30)),
    );
    controller.attach(Arc::new(BroadcastView::new(Arc::clone(&state))));
    controller.load();

    wait_until(&state, |s| s.history.entries.len() == 2).await;
    let (_, json) = get_json(&state, "/api/history").await;
    assert_eq!(json["entries"][0]["timestamp"], 20);
    assert_eq!(json["entries"][0]["type"], "exit");

    controller.clear_history();
    wait_until(&state, |s| s.history.success.is_some()).await;
    wait_until(&state, |s| s.history.entries.is_empty()).await;
    assert_eq!(
        state.current().history.success.as_deref(),
        Some("History cleared and counter reset to 0")
    );

    controller.detach();
}

#[tokio::test]
async fn test_broadcast_channel_carries_panel_updates() {
    let (state, _commands) = AppState::new();
    let state = Arc::new(state);
    let mut rx = state.subscribe();

    let store = MemoryStore::new();
    let mut controller = CounterSyncController::new(Arc::new(store));
    controller.attach(Arc::new(BroadcastView::new(Arc::clone(&state))));
    controller.load();

    let update = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(update, DashboardUpdate::Counter(_)));

    controller.detach();
}
