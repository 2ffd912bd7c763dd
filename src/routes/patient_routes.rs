// src/routes/patient_routes.rs

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{AppState, Patient},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/patients", get(search_patients))
        .route("/patients/{patient_id}", get(get_patient))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListPatientsResponse {
    pub success: bool,
    pub count: usize,
    pub patients: Vec<Patient>,
}

#[derive(Debug, Serialize)]
pub struct GetPatientResponse {
    pub success: bool,
    pub patient: Patient,
}

pub async fn search_patients(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<ListPatientsResponse>, ApiError> {
    let patients = state.directory.list_patients(q.query.as_deref()).await?;

    Ok(Json(ListPatientsResponse {
        success: true,
        count: patients.len(),
        patients,
    }))
}

pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<GetPatientResponse>, ApiError> {
    let patient = state
        .directory
        .get_patient(patient_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Patient"))?;

    Ok(Json(GetPatientResponse {
        success: true,
        patient,
    }))
}
