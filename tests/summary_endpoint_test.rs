use axum::http::StatusCode;
use gasledger::api::{self, AppState};
use gasledger::{Archive, Ledger, ManualClock, SqliteStore, Tariff, Transaction};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

struct TestApp {
    app: axum::Router,
    clock: ManualClock,
    _temp: TempDir,
}

async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();

    let store = SqliteStore::open(&db_path).await.expect("open failed");
    let archive = Archive::new(temp_dir.path().join("archives"));
    let ledger = Arc::new(Ledger::new(Arc::new(store), archive, Tariff::standard()));
    let clock = ManualClock::new(Transaction::parse_datetime("2024-01-01 10:00:00").unwrap());
    let state = AppState::new(ledger, Arc::new(clock.clone()));

    TestApp {
        app: api::create_router(state),
        clock,
        _temp: temp_dir,
    }
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let req = axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    (status, body)
}

async fn post_sale(app: axum::Router, payload: serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/v1/sales")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(payload.to_string()))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_summary_totals_for_date() {
    let test_app = setup_test_app().await;

    for _ in 0..3 {
        post_sale(
            test_app.app.clone(),
            serde_json::json!({"customerType": 0, "smallQty": 1}),
        )
        .await;
    }

    let (status, body) = get(test_app.app, "/v1/summary?date=2024-01-01").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["date"], "2024-01-01");
    assert_eq!(json["totalPrice"], "2190");
    assert_eq!(json["totalGas"], "8.1");
    assert_eq!(json["count"], 3);
}

#[tokio::test]
async fn test_summary_defaults_to_clock_date() {
    let test_app = setup_test_app().await;

    post_sale(
        test_app.app.clone(),
        serde_json::json!({"customerType": 1, "largeQty": 2, "mediumQty": 1}),
    )
    .await;

    let (status, body) = get(test_app.app, "/v1/summary").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["date"], "2024-01-01");
    assert_eq!(json["totalPrice"], "7765");
    assert_eq!(json["totalGas"], "30");
    assert_eq!(json["count"], 1);
}

#[tokio::test]
async fn test_summary_empty_day_is_zero() {
    let test_app = setup_test_app().await;

    let (status, body) = get(test_app.app, "/v1/summary?date=2030-05-05").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["date"], "2030-05-05");
    assert_eq!(json["totalPrice"], "0");
    assert_eq!(json["totalGas"], "0");
    assert_eq!(json["count"], 0);
}

#[tokio::test]
async fn test_summary_rejects_malformed_date() {
    let test_app = setup_test_app().await;

    let (status, body) = get(test_app.app, "/v1/summary?date=2024-1-1-extra").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("Invalid date"));
}

#[tokio::test]
async fn test_daily_summaries_span_archive_and_active() {
    let test_app = setup_test_app().await;

    post_sale(
        test_app.app.clone(),
        serde_json::json!({"customerType": 0, "largeQty": 1}),
    )
    .await;

    // Next day's sale rotates 2024-01-01 into the archive.
    test_app
        .clock
        .set(Transaction::parse_datetime("2024-01-02 09:00:00").unwrap());
    post_sale(
        test_app.app.clone(),
        serde_json::json!({"customerType": 0, "largeQty": 1}),
    )
    .await;

    let (status, body) = get(test_app.app, "/v1/summary/daily").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let days = json["days"].as_array().unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0]["date"], "2024-01-01");
    assert_eq!(days[1]["date"], "2024-01-02");
    for day in days {
        assert_eq!(day["totalPrice"], "3330");
        assert_eq!(day["totalGas"], "12");
        assert_eq!(day["count"], 1);
    }
}

#[tokio::test]
async fn test_daily_summaries_deterministic() {
    let test_app = setup_test_app().await;

    post_sale(
        test_app.app.clone(),
        serde_json::json!({"customerType": 2, "mediumQty": 2}),
    )
    .await;
    post_sale(
        test_app.app.clone(),
        serde_json::json!({"customerType": 0, "smallQty": 1}),
    )
    .await;

    let (_s1, b1) = get(test_app.app.clone(), "/v1/summary/daily").await;
    let (_s2, b2) = get(test_app.app, "/v1/summary/daily").await;

    assert_eq!(b1, b2, "Responses must be byte-identical");
}
