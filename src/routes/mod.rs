pub mod predict;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

use crate::AppState;
use crate::constants::MSG_SERVER_ERROR;
use crate::models::ApiResponse;

/// Build all routes for the API
pub fn build_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .merge(predict::routes())
}

/// Full application: routes, shared state and the panic guard
pub fn build_app(state: Arc<AppState>) -> Router {
    build_routes()
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Last-resort handler: a panicking request gets the generic server error
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    log::error!("Unhandled error: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::failure("error", MSG_SERVER_ERROR)),
    )
        .into_response()
}
