use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repo::{BookingStore, DirectoryStore, NotificationStore};

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<dyn BookingStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub directory: Arc<dyn DirectoryStore>,
}

impl AppState {
    /// Build the state from a single store implementing all three interfaces
    /// (the Postgres store in production, the in-memory store in tests).
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: BookingStore + NotificationStore + DirectoryStore + 'static,
    {
        AppState {
            bookings: store.clone(),
            notifications: store.clone(),
            directory: store,
        }
    }
}

/* -------------------------
   Status enums
--------------------------*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Active,
    Cancelled,
}

impl BookingStatus {
    pub fn as_i16(self) -> i16 {
        match self {
            BookingStatus::Pending => 0,
            BookingStatus::Active => 1,
            BookingStatus::Cancelled => 2,
        }
    }

    pub fn from_i16(v: i16) -> Self {
        match v {
            1 => BookingStatus::Active,
            2 => BookingStatus::Cancelled,
            _ => BookingStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Pending,
    Resolved,
}

impl NotificationStatus {
    pub fn as_i16(self) -> i16 {
        match self {
            NotificationStatus::Pending => 0,
            NotificationStatus::Resolved => 1,
        }
    }

    pub fn from_i16(v: i16) -> Self {
        match v {
            1 => NotificationStatus::Resolved,
            _ => NotificationStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_i16(self) -> i16 {
        match self {
            AppointmentStatus::Scheduled => 0,
            AppointmentStatus::Completed => 1,
            AppointmentStatus::Cancelled => 2,
        }
    }

    pub fn from_i16(v: i16) -> Self {
        match v {
            1 => AppointmentStatus::Completed,
            2 => AppointmentStatus::Cancelled,
            _ => AppointmentStatus::Scheduled,
        }
    }
}

/// The only notification type the fan-out pass produces today.
pub const NOTIFICATION_TYPE_BOOKING_REQUEST: &str = "booking_request";

/* -------------------------
   Domain records
--------------------------*/

/// A client-submitted request for a service slot. Immutable after intake
/// except for `status`; never auto-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: i64,
    pub name: String,
    pub phone: String,
    pub service: String,
    pub date: NaiveDate,
    pub message: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Validated intake payload, ready for the store. Produced only by
/// `booking_routes::validate_submission`.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub name: String,
    pub phone: String,
    pub service: String,
    pub date: NaiveDate,
    pub message: Option<String>,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub notification_id: i64,
    pub booking_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
}

/// Draft produced by the fan-out pass. Title and message are derived from the
/// booking once, at creation time; they are never re-synced on booking edits.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub booking_id: i64,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub patient_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Therapist {
    pub therapist_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub specialty: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub appointment_id: Uuid,
    pub patient_id: Uuid,
    pub therapist_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_min: i32,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Appointment joined with its direct relations, as served to the admin UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetail {
    pub appointment_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_min: i32,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub patient: PatientRef,
    pub therapist: TherapistRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRef {
    pub patient_id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TherapistRef {
    pub therapist_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub specialty: Option<String>,
}
