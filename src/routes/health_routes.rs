use axum::{Json, Router, routing::get};

use crate::models::AppState;

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "ok",
    })
}
