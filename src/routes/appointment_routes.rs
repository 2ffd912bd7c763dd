// src/routes/appointment_routes.rs

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{AppState, AppointmentDetail},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/appointments", get(list_appointments))
        .route("/appointments/{appointment_id}", get(get_appointment))
}

#[derive(Debug, Deserialize)]
pub struct ListAppointmentsQuery {
    /// Restrict to appointments scheduled on this calendar day.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct ListAppointmentsResponse {
    pub success: bool,
    pub count: usize,
    pub appointments: Vec<AppointmentDetail>,
}

#[derive(Debug, Serialize)]
pub struct GetAppointmentResponse {
    pub success: bool,
    pub appointment: AppointmentDetail,
}

pub async fn list_appointments(
    State(state): State<AppState>,
    Query(q): Query<ListAppointmentsQuery>,
) -> Result<Json<ListAppointmentsResponse>, ApiError> {
    let appointments = state.directory.list_appointments(q.date).await?;

    Ok(Json(ListAppointmentsResponse {
        success: true,
        count: appointments.len(),
        appointments,
    }))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<GetAppointmentResponse>, ApiError> {
    let appointment = state
        .directory
        .get_appointment(appointment_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Appointment"))?;

    Ok(Json(GetAppointmentResponse {
        success: true,
        appointment,
    }))
}
