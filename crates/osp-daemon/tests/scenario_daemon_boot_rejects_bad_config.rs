//! Startup configuration is validated before the daemon serves anything.
//!
//! `AppState::from_settings` is what `main` calls; an error there aborts boot.

use std::sync::Arc;

use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use osp_config::{load_layered_yaml_from_strings, Settings};
use osp_daemon::{routes, state::AppState};
use tower::ServiceExt;

#[test]
fn precision_above_six_is_fatal() {
    let loaded =
        load_layered_yaml_from_strings(&["allocation:\n  share_decimal_places: 9\n"]).unwrap();
    let settings = Settings::from_config_json(&loaded.config_json).unwrap();
    assert!(AppState::from_settings(&settings, None).is_err());
}

#[test]
fn non_positive_default_price_is_fatal() {
    let loaded =
        load_layered_yaml_from_strings(&["allocation:\n  default_stock_price: -5\n"]).unwrap();
    let settings = Settings::from_config_json(&loaded.config_json).unwrap();
    assert!(AppState::from_settings(&settings, None).is_err());
}

#[test]
fn unknown_calendar_is_fatal() {
    let settings = Settings {
        calendar_policy: "fortnightly".into(),
        ..Settings::default()
    };
    assert!(AppState::from_settings(&settings, None).is_err());
}

#[tokio::test]
async fn configured_precision_and_price_reach_the_allocator() {
    let loaded = load_layered_yaml_from_strings(&[
        "allocation:\n  share_decimal_places: 1\n  default_stock_price: 7\n",
    ])
    .unwrap();
    let settings = Settings::from_config_json(&loaded.config_json).unwrap();
    let st = Arc::new(AppState::from_settings(&settings, Some(loaded.config_hash.clone())).unwrap());

    let req = Request::builder()
        .method("POST")
        .uri("/v1/orders")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(
            r#"{"orderType":"BUY","totalAmount":100,"portfolio":[{"symbol":"AAPL","weight":100}]}"#,
        ))
        .unwrap();
    let resp = routes::build_router(Arc::clone(&st)).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    // 100 / 7 = 14.2857.. → 14.3 at one place
    assert_eq!(json["breakdown"][0]["price"], 7.0);
    assert_eq!(json["breakdown"][0]["quantity"], 14.3);

    let health = Request::builder()
        .uri("/v1/health")
        .body(axum::body::Body::empty())
        .unwrap();
    let resp = routes::build_router(st).oneshot(health).await.unwrap();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["config_hash"], loaded.config_hash);
}
