// src/routes/booking_routes.rs

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    models::{AppState, Booking, BookingStatus, NewBooking},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking).get(list_bookings))
        .route(
            "/bookings/{booking_id}",
            get(get_booking).patch(update_booking_status),
        )
}

/// Raw intake payload. Required fields arrive as `Option` so a missing field
/// reaches `validate_submission` and comes back as a 400 body, not a
/// deserializer rejection.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub date: Option<String>,
    pub message: Option<String>,
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Serialize)]
pub struct CreateBookingResponse {
    pub success: bool,
    #[serde(rename = "bookingId")]
    pub booking_id: i64,
}

#[derive(Debug, Serialize)]
pub struct ListBookingsResponse {
    pub success: bool,
    pub count: usize,
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Serialize)]
pub struct GetBookingResponse {
    pub success: bool,
    pub booking: Booking,
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::validation(format!("{field} is required"))),
    }
}

/// Validation happens entirely at the boundary; nothing touches the store
/// until the submission is known good.
pub fn validate_submission(req: &CreateBookingRequest) -> Result<NewBooking, ApiError> {
    let name = required(req.name.as_deref(), "name")?;
    let phone = required(req.phone.as_deref(), "phone")?;
    let service = required(req.service.as_deref(), "service")?;
    let date_raw = required(req.date.as_deref(), "date")?;

    let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d")
        .map_err(|_| ApiError::validation("date must be a valid YYYY-MM-DD calendar date"))?;

    let message = req
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    Ok(NewBooking {
        name: name.to_string(),
        phone: phone.to_string(),
        service: service.to_string(),
        date,
        message,
        status: req.status.unwrap_or(BookingStatus::Pending),
    })
}

pub async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<CreateBookingResponse>, ApiError> {
    let new = validate_submission(&req)?;
    let booking = state.bookings.create_booking(new).await?;

    tracing::info!(booking_id = booking.booking_id, "booking created");
    Ok(Json(CreateBookingResponse {
        success: true,
        booking_id: booking.booking_id,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    pub status: Option<BookingStatus>,
}

pub async fn list_bookings(
    State(state): State<AppState>,
    Query(q): Query<ListBookingsQuery>,
) -> Result<Json<ListBookingsResponse>, ApiError> {
    let bookings = state.bookings.list_bookings(q.status).await?;

    Ok(Json(ListBookingsResponse {
        success: true,
        count: bookings.len(),
        bookings,
    }))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
) -> Result<Json<GetBookingResponse>, ApiError> {
    let booking = state
        .bookings
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking"))?;

    Ok(Json(GetBookingResponse {
        success: true,
        booking,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

pub async fn update_booking_status(
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
    Json(req): Json<UpdateBookingStatusRequest>,
) -> Result<Json<GetBookingResponse>, ApiError> {
    let booking = state
        .bookings
        .set_booking_status(booking_id, req.status)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking"))?;

    Ok(Json(GetBookingResponse {
        success: true,
        booking,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> CreateBookingRequest {
        CreateBookingRequest {
            name: Some("Aisha".into()),
            phone: Some("555-0101".into()),
            service: Some("General".into()),
            date: Some("2026-09-14".into()),
            message: None,
            status: None,
        }
    }

    #[test]
    fn valid_submission_defaults_to_pending() {
        let new = validate_submission(&full_request()).unwrap();
        assert_eq!(new.status, BookingStatus::Pending);
        assert_eq!(new.date, NaiveDate::from_ymd_opt(2026, 9, 14).unwrap());
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let mut req = full_request();
        req.phone = Some("   ".into());
        assert!(matches!(
            validate_submission(&req),
            Err(ApiError::BadRequest("VALIDATION_ERROR", _))
        ));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut req = full_request();
        req.date = Some("14/09/2026".into());
        assert!(matches!(
            validate_submission(&req),
            Err(ApiError::BadRequest("VALIDATION_ERROR", _))
        ));
    }
}
