//! Axum router and all HTTP handlers for osp-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers so tests can use the bare router.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use osp_orders::OrderError;
use osp_schemas::{CreateOrderBody, OrderView};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, warn};

use crate::{
    api_types::{ErrorResponse, HealthResponse},
    state::AppState,
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/orders", get(list_orders).post(create_order))
        .with_state(state)
}

/// CORS: allow only localhost origins. Attached by `main.rs`, not by
/// [`build_router`].
pub fn cors_localhost_only() -> CorsLayer {
    let allowed_origins = [
        "http://localhost",
        "http://127.0.0.1",
        "http://localhost:3000",
        "http://127.0.0.1:3000",
        "http://localhost:5173",
        "http://127.0.0.1:5173",
    ];

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service.to_string(),
            version: st.build.version.to_string(),
            config_hash: st.config_hash.clone(),
        }),
    )
}

// ---------------------------------------------------------------------------
// POST /v1/orders
// ---------------------------------------------------------------------------

/// 201 with the created order, 400 on a malformed or invalid body, 500 if the
/// store fails.
pub(crate) async fn create_order(
    State(st): State<Arc<AppState>>,
    payload: Result<Json<CreateOrderBody>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(b) => b,
        Err(rejection) => {
            warn!(reason = %rejection.body_text(), "malformed order body");
            return error_response(
                StatusCode::BAD_REQUEST,
                "MALFORMED_BODY",
                rejection.body_text(),
            );
        }
    };

    let request = match body.into_request() {
        Ok(r) => r,
        Err(e) => {
            warn!(code = e.code(), error = %e, "order request rejected at boundary");
            return error_response(StatusCode::BAD_REQUEST, e.code(), e.to_string());
        }
    };

    match st.orders.create_order(request) {
        Ok(order) => (StatusCode::CREATED, Json(OrderView::from(&order))).into_response(),
        Err(e) => order_error_response(e),
    }
}

// ---------------------------------------------------------------------------
// GET /v1/orders
// ---------------------------------------------------------------------------

pub(crate) async fn list_orders(State(st): State<Arc<AppState>>) -> Response {
    match st.orders.get_all_orders() {
        Ok(orders) => {
            let views: Vec<OrderView> = orders.iter().map(OrderView::from).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(e) => order_error_response(e),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn order_error_response(e: OrderError) -> Response {
    let status = if e.is_validation() {
        StatusCode::BAD_REQUEST
    } else {
        error!(error = %e, "order store failure");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    error_response(status, e.code(), e.to_string())
}

fn error_response(status: StatusCode, code: &str, error: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            error,
            code: code.to_string(),
        }),
    )
        .into_response()
}
