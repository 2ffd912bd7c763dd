// src/routes/therapist_routes.rs

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{AppState, Therapist},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/therapists", get(list_therapists))
        .route("/therapists/{therapist_id}", get(get_therapist))
}

#[derive(Debug, Serialize)]
pub struct ListTherapistsResponse {
    pub success: bool,
    pub count: usize,
    pub therapists: Vec<Therapist>,
}

#[derive(Debug, Serialize)]
pub struct GetTherapistResponse {
    pub success: bool,
    pub therapist: Therapist,
}

pub async fn list_therapists(
    State(state): State<AppState>,
) -> Result<Json<ListTherapistsResponse>, ApiError> {
    let therapists = state.directory.list_therapists().await?;

    Ok(Json(ListTherapistsResponse {
        success: true,
        count: therapists.len(),
        therapists,
    }))
}

pub async fn get_therapist(
    State(state): State<AppState>,
    Path(therapist_id): Path<Uuid>,
) -> Result<Json<GetTherapistResponse>, ApiError> {
    let therapist = state
        .directory
        .get_therapist(therapist_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Therapist"))?;

    Ok(Json(GetTherapistResponse {
        success: true,
        therapist,
    }))
}
