use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::state::AppState;
use crate::ui;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(upload_page))
        .route("/health", get(health))
        .route("/api/status", get(api_status))
        .fallback(not_found)
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn upload_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(ui::render_upload_page(&state.config, &state.build))
}

async fn api_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    let config = &state.config;
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "build": state.build,
        "endpoints": {
            "upload": config.upload_endpoint,
            "register": config.register_endpoint,
        },
        "max_upload_bytes": config.max_upload_bytes(),
    }))
}

async fn not_found(uri: Uri) -> ApiError {
    debug!("no route for {uri}");
    ApiError::not_found(format!("no route for {}", uri.path()))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    detail: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self
            .status
            .canonical_reason()
            .unwrap_or("error")
            .to_ascii_lowercase();
        let body = Json(ErrorBody {
            error,
            detail: self.message,
        });
        (self.status, body).into_response()
    }
}
