// src/repo/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    AppointmentDetail, AppointmentStatus, Booking, BookingStatus, NewBooking, NewNotification,
    Notification, NotificationStatus, Patient, PatientRef, Therapist, TherapistRef,
    NOTIFICATION_TYPE_BOOKING_REQUEST,
};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/* -------------------------
   Row models (status stays smallint in the DB)
--------------------------*/

#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    booking_id: i64,
    name: String,
    phone: String,
    service: String,
    date: NaiveDate,
    message: Option<String>,
    status: i16,
    created_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(r: BookingRow) -> Self {
        Booking {
            booking_id: r.booking_id,
            name: r.name,
            phone: r.phone,
            service: r.service,
            date: r.date,
            message: r.message,
            status: BookingStatus::from_i16(r.status),
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    notification_id: i64,
    booking_id: i64,
    notification_type: String,
    title: String,
    message: String,
    read: bool,
    status: i16,
    created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(r: NotificationRow) -> Self {
        Notification {
            notification_id: r.notification_id,
            booking_id: r.booking_id,
            kind: r.notification_type,
            title: r.title,
            message: r.message,
            read: r.read,
            status: NotificationStatus::from_i16(r.status),
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AppointmentDetailRow {
    appointment_id: Uuid,
    patient_id: Uuid,
    therapist_id: Uuid,
    scheduled_at: DateTime<Utc>,
    duration_min: i32,
    status: i16,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    patient_first_name: String,
    patient_last_name: String,
    therapist_first_name: String,
    therapist_last_name: String,
    therapist_specialty: Option<String>,
}

impl From<AppointmentDetailRow> for AppointmentDetail {
    fn from(r: AppointmentDetailRow) -> Self {
        AppointmentDetail {
            appointment_id: r.appointment_id,
            scheduled_at: r.scheduled_at,
            duration_min: r.duration_min,
            status: AppointmentStatus::from_i16(r.status),
            notes: r.notes,
            created_at: r.created_at,
            patient: PatientRef {
                patient_id: r.patient_id,
                first_name: r.patient_first_name,
                last_name: r.patient_last_name,
            },
            therapist: TherapistRef {
                therapist_id: r.therapist_id,
                first_name: r.therapist_first_name,
                last_name: r.therapist_last_name,
                specialty: r.therapist_specialty,
            },
        }
    }
}

const APPOINTMENT_DETAIL_SELECT: &str = r#"
    SELECT a.appointment_id, a.patient_id, a.therapist_id, a.scheduled_at,
           a.duration_min, a.status, a.notes, a.created_at,
           p.first_name AS patient_first_name, p.last_name AS patient_last_name,
           t.first_name AS therapist_first_name, t.last_name AS therapist_last_name,
           t.specialty AS therapist_specialty
    FROM appointment a
    JOIN patient p ON p.patient_id = a.patient_id
    JOIN therapist t ON t.therapist_id = a.therapist_id
"#;

#[async_trait]
impl super::BookingStore for PgStore {
    async fn create_booking(&self, new: NewBooking) -> Result<Booking, StoreError> {
        let row: BookingRow = sqlx::query_as::<_, BookingRow>(
            r#"
            INSERT INTO booking (name, phone, service, "date", message, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, now())
            RETURNING booking_id, name, phone, service, "date", message, status, created_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.phone)
        .bind(&new.service)
        .bind(new.date)
        .bind(new.message.as_deref())
        .bind(new.status.as_i16())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_booking(&self, booking_id: i64) -> Result<Option<Booking>, StoreError> {
        let row: Option<BookingRow> = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT booking_id, name, phone, service, "date", message, status, created_at
            FROM booking
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_bookings(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, StoreError> {
        let rows: Vec<BookingRow> = match status {
            Some(s) => {
                sqlx::query_as::<_, BookingRow>(
                    r#"
                    SELECT booking_id, name, phone, service, "date", message, status, created_at
                    FROM booking
                    WHERE status = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(s.as_i16())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, BookingRow>(
                    r#"
                    SELECT booking_id, name, phone, service, "date", message, status, created_at
                    FROM booking
                    ORDER BY created_at DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn set_booking_status(
        &self,
        booking_id: i64,
        status: BookingStatus,
    ) -> Result<Option<Booking>, StoreError> {
        let row: Option<BookingRow> = sqlx::query_as::<_, BookingRow>(
            r#"
            UPDATE booking
            SET status = $1
            WHERE booking_id = $2
            RETURNING booking_id, name, phone, service, "date", message, status, created_at
            "#,
        )
        .bind(status.as_i16())
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl super::NotificationStore for PgStore {
    async fn list_notifications(
        &self,
        status: Option<NotificationStatus>,
    ) -> Result<Vec<Notification>, StoreError> {
        let rows: Vec<NotificationRow> = match status {
            Some(s) => {
                sqlx::query_as::<_, NotificationRow>(
                    r#"
                    SELECT notification_id, booking_id, notification_type, title, message,
                           "read", status, created_at
                    FROM notification
                    WHERE status = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(s.as_i16())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, NotificationRow>(
                    r#"
                    SELECT notification_id, booking_id, notification_type, title, message,
                           "read", status, created_at
                    FROM notification
                    ORDER BY created_at DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn bookings_without_notification(&self) -> Result<Vec<Booking>, StoreError> {
        let rows: Vec<BookingRow> = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT b.booking_id, b.name, b.phone, b.service, b."date", b.message,
                   b.status, b.created_at
            FROM booking b
            WHERE NOT EXISTS (
                SELECT 1 FROM notification n WHERE n.booking_id = b.booking_id
            )
            ORDER BY b.booking_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_booking_request(
        &self,
        draft: NewNotification,
    ) -> Result<Option<Notification>, StoreError> {
        // Unique index on notification.booking_id is the backstop for the
        // fan-out's check-then-act; a lost race lands on DO NOTHING.
        let row: Option<NotificationRow> = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notification
                (booking_id, notification_type, title, message, "read", status, created_at)
            VALUES ($1, $2, $3, $4, false, $5, now())
            ON CONFLICT (booking_id) DO NOTHING
            RETURNING notification_id, booking_id, notification_type, title, message,
                      "read", status, created_at
            "#,
        )
        .bind(draft.booking_id)
        .bind(NOTIFICATION_TYPE_BOOKING_REQUEST)
        .bind(&draft.title)
        .bind(&draft.message)
        .bind(NotificationStatus::Pending.as_i16())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn mark_notification_read(
        &self,
        notification_id: i64,
    ) -> Result<Option<Notification>, StoreError> {
        let row: Option<NotificationRow> = sqlx::query_as::<_, NotificationRow>(
            r#"
            UPDATE notification
            SET "read" = true
            WHERE notification_id = $1
            RETURNING notification_id, booking_id, notification_type, title, message,
                      "read", status, created_at
            "#,
        )
        .bind(notification_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn set_notification_status(
        &self,
        notification_id: i64,
        status: NotificationStatus,
    ) -> Result<Option<Notification>, StoreError> {
        let row: Option<NotificationRow> = sqlx::query_as::<_, NotificationRow>(
            r#"
            UPDATE notification
            SET status = $1
            WHERE notification_id = $2
            RETURNING notification_id, booking_id, notification_type, title, message,
                      "read", status, created_at
            "#,
        )
        .bind(status.as_i16())
        .bind(notification_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl super::DirectoryStore for PgStore {
    async fn list_patients(&self, query: Option<&str>) -> Result<Vec<Patient>, StoreError> {
        let rows: Vec<Patient> = match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => {
                let like = format!("%{q}%");
                sqlx::query_as::<_, Patient>(
                    r#"
                    SELECT patient_id, first_name, last_name, email, phone, created_at
                    FROM patient
                    WHERE first_name ILIKE $1
                       OR last_name ILIKE $1
                    ORDER BY created_at DESC
                    LIMIT 50
                    "#,
                )
                .bind(like)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Patient>(
                    r#"
                    SELECT patient_id, first_name, last_name, email, phone, created_at
                    FROM patient
                    ORDER BY created_at DESC
                    LIMIT 50
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    async fn get_patient(&self, patient_id: Uuid) -> Result<Option<Patient>, StoreError> {
        let row: Option<Patient> = sqlx::query_as::<_, Patient>(
            r#"
            SELECT patient_id, first_name, last_name, email, phone, created_at
            FROM patient
            WHERE patient_id = $1
            "#,
        )
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_therapists(&self) -> Result<Vec<Therapist>, StoreError> {
        let rows: Vec<Therapist> = sqlx::query_as::<_, Therapist>(
            r#"
            SELECT therapist_id, first_name, last_name, specialty, email, created_at
            FROM therapist
            ORDER BY last_name, first_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get_therapist(&self, therapist_id: Uuid) -> Result<Option<Therapist>, StoreError> {
        let row: Option<Therapist> = sqlx::query_as::<_, Therapist>(
            r#"
            SELECT therapist_id, first_name, last_name, specialty, email, created_at
            FROM therapist
            WHERE therapist_id = $1
            "#,
        )
        .bind(therapist_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_appointments(
        &self,
        on: Option<NaiveDate>,
    ) -> Result<Vec<AppointmentDetail>, StoreError> {
        let rows: Vec<AppointmentDetailRow> = match on {
            Some(day) => {
                let sql = format!("{APPOINTMENT_DETAIL_SELECT} WHERE a.scheduled_at::date = $1 ORDER BY a.scheduled_at");
                sqlx::query_as::<_, AppointmentDetailRow>(&sql)
                    .bind(day)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("{APPOINTMENT_DETAIL_SELECT} ORDER BY a.scheduled_at");
                sqlx::query_as::<_, AppointmentDetailRow>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Option<AppointmentDetail>, StoreError> {
        let sql = format!("{APPOINTMENT_DETAIL_SELECT} WHERE a.appointment_id = $1");
        let row: Option<AppointmentDetailRow> = sqlx::query_as::<_, AppointmentDetailRow>(&sql)
            .bind(appointment_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }
}
