// src/repo/mod.rs
//
// Storage seam for the request handlers. Handlers hold no process-wide
// mutable state; everything durable goes through these traits, with the
// Postgres store behind them in production and the in-memory store in tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    AppointmentDetail, Booking, BookingStatus, NewBooking, NewNotification, Notification,
    NotificationStatus, Patient, Therapist,
};

pub mod memory;
pub mod postgres;

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Single atomic insert; the store assigns the (positive, monotonic) id
    /// and the creation timestamp.
    async fn create_booking(&self, new: NewBooking) -> Result<Booking, StoreError>;

    async fn get_booking(&self, booking_id: i64) -> Result<Option<Booking>, StoreError>;

    async fn list_bookings(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, StoreError>;

    /// Status is the only mutable booking field. Returns `None` for a missing id.
    async fn set_booking_status(
        &self,
        booking_id: i64,
        status: BookingStatus,
    ) -> Result<Option<Booking>, StoreError>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn list_notifications(
        &self,
        status: Option<NotificationStatus>,
    ) -> Result<Vec<Notification>, StoreError>;

    /// Bookings that have not yet been picked up by the fan-out pass.
    async fn bookings_without_notification(&self) -> Result<Vec<Booking>, StoreError>;

    /// Insert a booking_request notification unless the booking already has
    /// one. Returns `None` when the uniqueness backstop suppressed the insert,
    /// which is how a lost fan-out race resolves.
    async fn create_booking_request(
        &self,
        draft: NewNotification,
    ) -> Result<Option<Notification>, StoreError>;

    async fn mark_notification_read(
        &self,
        notification_id: i64,
    ) -> Result<Option<Notification>, StoreError>;

    async fn set_notification_status(
        &self,
        notification_id: i64,
        status: NotificationStatus,
    ) -> Result<Option<Notification>, StoreError>;
}

#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// `query`, when present, is a case-insensitive substring match on names.
    async fn list_patients(&self, query: Option<&str>) -> Result<Vec<Patient>, StoreError>;

    async fn get_patient(&self, patient_id: Uuid) -> Result<Option<Patient>, StoreError>;

    async fn list_therapists(&self) -> Result<Vec<Therapist>, StoreError>;

    async fn get_therapist(&self, therapist_id: Uuid) -> Result<Option<Therapist>, StoreError>;

    async fn list_appointments(
        &self,
        on: Option<NaiveDate>,
    ) -> Result<Vec<AppointmentDetail>, StoreError>;

    async fn get_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Option<AppointmentDetail>, StoreError>;
}
