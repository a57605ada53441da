//! Router tests.
//!
//! These drive the Axum router in-process against `MemoryStorage`.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use nodeconf_core::{ConfigStore, MemoryStorage, Storage, CONFIG_PATH};
use nodeconf_web::{create_router, ServerState, WebOptions};
use tower::ServiceExt;

fn test_app(storage: Arc<MemoryStorage>, options: WebOptions) -> (Router, Arc<ServerState>) {
    let state = Arc::new(ServerState::new(ConfigStore::node(), storage, options));
    (create_router(state.clone()), state)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn saved_json(storage: &MemoryStorage) -> serde_json::Value {
    serde_json::from_str(&storage.contents(CONFIG_PATH).expect("config saved")).unwrap()
}

#[tokio::test]
async fn test_root_redirects_to_config() {
    let (app, _) = test_app(Arc::new(MemoryStorage::new()), WebOptions::default());

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/config");
}

#[tokio::test]
async fn test_config_page_renders_current_values() {
    let (app, state) = test_app(Arc::new(MemoryStorage::new()), WebOptions::default());
    state.config.write().await.set("dataStoreDelay", 45).unwrap();

    let response = app.oneshot(get("/config")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("name='dataStoreDelay' value='45'"));
    assert!(html.contains("name='tAlarmMin1' value='' placeholder='off'"));
    assert!(html.contains("name='useTermoSensor1' value='1' checked"));
}

#[tokio::test]
async fn test_form_submission_applies_and_saves() {
    let storage = Arc::new(MemoryStorage::new());
    let (app, state) = test_app(storage.clone(), WebOptions::default());
    state.config.write().await.set("t1ShiftDelta", 1.5f32).unwrap();

    let response = app
        .oneshot(form_post(
            "/config",
            "hostname=cellar&alarmActive=1&t1ShiftDelta=&dataStoreDelay=90&storeURL=http%3A%2F%2Fexample.org",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/config");

    let saved = saved_json(&storage);
    assert_eq!(saved["hostname"], "cellar");
    assert_eq!(saved["alarmActive"], true);
    assert_eq!(saved["useTermoSensor1"], false);
    assert_eq!(saved["t1ShiftDelta"], 0.0);
    assert_eq!(saved["dataStoreDelay"], 90);
    assert_eq!(saved["storeURL"], "http://example.org");

    let config = state.config.read().await;
    assert_eq!(config.get::<bool>("alarmActive"), Some(true));
}

#[tokio::test]
async fn test_lenient_form_reads_garbage_as_zero() {
    let storage = Arc::new(MemoryStorage::new());
    let (app, _) = test_app(storage.clone(), WebOptions::default());

    let response = app
        .oneshot(form_post("/config", "dataStoreAttempts=lots&tControlMin=abc"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let saved = saved_json(&storage);
    assert_eq!(saved["dataStoreAttempts"], 0);
    assert_eq!(saved["tControlMin"], 0.0);
}

#[tokio::test]
async fn test_strict_form_rejects_bad_numbers() {
    let storage = Arc::new(MemoryStorage::new());
    let (app, state) = test_app(storage.clone(), WebOptions { strict_forms: true });

    let response = app
        .oneshot(form_post("/config", "hostname=cellar&dataStoreAttempts=lots"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["fields"][0]["field"], "dataStoreAttempts");

    assert!(storage.contents(CONFIG_PATH).is_none());
    assert_eq!(*state.config.read().await, ConfigStore::node());
}

#[tokio::test]
async fn test_save_failure_keeps_submitted_values() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set_read_only(true);
    let (app, state) = test_app(storage.clone(), WebOptions::default());

    let response = app
        .oneshot(form_post("/config", "hostname=cellar"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(storage.contents(CONFIG_PATH).is_none());
    assert_eq!(
        state.config.read().await.get::<String>("hostname"),
        Some("cellar".to_string())
    );
}

#[tokio::test]
async fn test_oversized_submission_is_not_saved() {
    let storage = Arc::new(MemoryStorage::new());
    let (app, state) = test_app(storage.clone(), WebOptions::default());
    let url = format!("http://example.org/{}", "u".repeat(1100));

    let response = app
        .oneshot(form_post("/config", &format!("hostname=cellar&storeURL={}", url)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(storage.contents(CONFIG_PATH).is_none());
    let config = state.config.read().await;
    assert_eq!(config.get::<String>("storeURL"), Some(url));
    assert_eq!(config.get::<String>("hostname"), Some("cellar".to_string()));
}

#[tokio::test]
async fn test_json_view_masks_secrets() {
    let (app, _) = test_app(Arc::new(MemoryStorage::new()), WebOptions::default());

    let response = app.oneshot(get("/config.json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["storePassword"], "********");
    assert_eq!(body["alarmInit1"], -1);
    assert_eq!(body["tAlarmMin1"], -127.0);
}

#[tokio::test]
async fn test_reload_reports_applied_fields() {
    let storage = Arc::new(MemoryStorage::with_file(
        CONFIG_PATH,
        r#"{"alarmActive": true, "dataStoreDelay": 30, "legacy": 1}"#,
    ));
    let (app, state) = test_app(storage, WebOptions::default());

    let response = app
        .oneshot(Request::post("/config/reload").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["applied"], serde_json::json!(["alarmActive", "dataStoreDelay"]));
    assert_eq!(body["ignored"], serde_json::json!(["legacy"]));
    assert_eq!(state.config.read().await.get::<i32>("dataStoreDelay"), Some(30));
}

#[tokio::test]
async fn test_reload_error_statuses() {
    let cases = [
        (MemoryStorage::new(), StatusCode::NOT_FOUND),
        (
            MemoryStorage::with_file(CONFIG_PATH, &" ".repeat(2048)),
            StatusCode::PAYLOAD_TOO_LARGE,
        ),
        (
            MemoryStorage::with_file(CONFIG_PATH, "[true]"),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (
            MemoryStorage::with_file(CONFIG_PATH, "not json"),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
    ];

    for (storage, expected) in cases {
        let (app, state) = test_app(Arc::new(storage), WebOptions::default());

        let response = app
            .oneshot(Request::post("/config/reload").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), expected);
        assert_eq!(*state.config.read().await, ConfigStore::node());
    }
}

#[tokio::test]
async fn test_saved_file_reloads_into_fresh_state() {
    let storage = Arc::new(MemoryStorage::new());
    let (app, _) = test_app(storage.clone(), WebOptions::default());
    app.oneshot(form_post("/config", "alarmInit1=1&tAlarmMin2=4.5&useAlarmSensor2=1"))
        .await
        .unwrap();

    let mut fresh = ConfigStore::node();
    fresh.load(storage.as_ref()).unwrap();

    assert_eq!(fresh.get::<i8>("alarmInit1"), Some(1));
    assert_eq!(fresh.get::<i8>("alarmInit2"), Some(-1));
    assert_eq!(fresh.get::<f32>("tAlarmMin2"), Some(4.5));
    assert_eq!(fresh.get::<bool>("useAlarmSensor1"), Some(false));
    assert_eq!(fresh.get::<bool>("useAlarmSensor2"), Some(true));
}
