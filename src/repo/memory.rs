// src/repo/memory.rs
//
// In-memory store used by the test suite and as a DB-free stand-in behind the
// same traits as the Postgres store. Locks are never held across an await.

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    Appointment, AppointmentDetail, Booking, BookingStatus, NewBooking, NewNotification,
    Notification, NotificationStatus, Patient, PatientRef, Therapist, TherapistRef,
    NOTIFICATION_TYPE_BOOKING_REQUEST,
};

#[derive(Default)]
pub struct MemoryStore {
    bookings: Mutex<Vec<Booking>>,
    notifications: Mutex<Vec<Notification>>,
    patients: Mutex<Vec<Patient>>,
    therapists: Mutex<Vec<Therapist>>,
    appointments: Mutex<Vec<Appointment>>,
    next_booking_id: AtomicI64,
    next_notification_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_patient(&self, patient: Patient) {
        self.patients.lock().unwrap().push(patient);
    }

    pub fn add_therapist(&self, therapist: Therapist) {
        self.therapists.lock().unwrap().push(therapist);
    }

    pub fn add_appointment(&self, appointment: Appointment) {
        self.appointments.lock().unwrap().push(appointment);
    }

    fn detail_for(&self, appointment: &Appointment) -> Option<AppointmentDetail> {
        let patient = self
            .patients
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.patient_id == appointment.patient_id)
            .cloned()?;
        let therapist = self
            .therapists
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.therapist_id == appointment.therapist_id)
            .cloned()?;

        Some(AppointmentDetail {
            appointment_id: appointment.appointment_id,
            scheduled_at: appointment.scheduled_at,
            duration_min: appointment.duration_min,
            status: appointment.status,
            notes: appointment.notes.clone(),
            created_at: appointment.created_at,
            patient: PatientRef {
                patient_id: patient.patient_id,
                first_name: patient.first_name,
                last_name: patient.last_name,
            },
            therapist: TherapistRef {
                therapist_id: therapist.therapist_id,
                first_name: therapist.first_name,
                last_name: therapist.last_name,
                specialty: therapist.specialty,
            },
        })
    }
}

#[async_trait]
impl super::BookingStore for MemoryStore {
    async fn create_booking(&self, new: NewBooking) -> Result<Booking, StoreError> {
        let booking = Booking {
            booking_id: self.next_booking_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: new.name,
            phone: new.phone,
            service: new.service,
            date: new.date,
            message: new.message,
            status: new.status,
            created_at: Utc::now(),
        };
        self.bookings.lock().unwrap().push(booking.clone());
        Ok(booking)
    }

    async fn get_booking(&self, booking_id: i64) -> Result<Option<Booking>, StoreError> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.booking_id == booking_id)
            .cloned())
    }

    async fn list_bookings(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, StoreError> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings
            .iter()
            .filter(|b| status.is_none_or(|s| b.status == s))
            .cloned()
            .collect())
    }

    async fn set_booking_status(
        &self,
        booking_id: i64,
        status: BookingStatus,
    ) -> Result<Option<Booking>, StoreError> {
        let mut bookings = self.bookings.lock().unwrap();
        match bookings.iter_mut().find(|b| b.booking_id == booking_id) {
            Some(b) => {
                b.status = status;
                Ok(Some(b.clone()))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl super::NotificationStore for MemoryStore {
    async fn list_notifications(
        &self,
        status: Option<NotificationStatus>,
    ) -> Result<Vec<Notification>, StoreError> {
        let notifications = self.notifications.lock().unwrap();
        Ok(notifications
            .iter()
            .filter(|n| status.is_none_or(|s| n.status == s))
            .cloned()
            .collect())
    }

    async fn bookings_without_notification(&self) -> Result<Vec<Booking>, StoreError> {
        let bookings = self.bookings.lock().unwrap();
        let notifications = self.notifications.lock().unwrap();
        Ok(bookings
            .iter()
            .filter(|b| !notifications.iter().any(|n| n.booking_id == b.booking_id))
            .cloned()
            .collect())
    }

    async fn create_booking_request(
        &self,
        draft: NewNotification,
    ) -> Result<Option<Notification>, StoreError> {
        let mut notifications = self.notifications.lock().unwrap();
        // Membership check mirrors the unique index backstop in Postgres.
        if notifications
            .iter()
            .any(|n| n.booking_id == draft.booking_id)
        {
            return Ok(None);
        }

        let notification = Notification {
            notification_id: self.next_notification_id.fetch_add(1, Ordering::SeqCst) + 1,
            booking_id: draft.booking_id,
            kind: NOTIFICATION_TYPE_BOOKING_REQUEST.to_string(),
            title: draft.title,
            message: draft.message,
            read: false,
            status: NotificationStatus::Pending,
            created_at: Utc::now(),
        };
        notifications.push(notification.clone());
        Ok(Some(notification))
    }

    async fn mark_notification_read(
        &self,
        notification_id: i64,
    ) -> Result<Option<Notification>, StoreError> {
        let mut notifications = self.notifications.lock().unwrap();
        match notifications
            .iter_mut()
            .find(|n| n.notification_id == notification_id)
        {
            Some(n) => {
                n.read = true;
                Ok(Some(n.clone()))
            }
            None => Ok(None),
        }
    }

    async fn set_notification_status(
        &self,
        notification_id: i64,
        status: NotificationStatus,
    ) -> Result<Option<Notification>, StoreError> {
        let mut notifications = self.notifications.lock().unwrap();
        match notifications
            .iter_mut()
            .find(|n| n.notification_id == notification_id)
        {
            Some(n) => {
                n.status = status;
                Ok(Some(n.clone()))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl super::DirectoryStore for MemoryStore {
    async fn list_patients(&self, query: Option<&str>) -> Result<Vec<Patient>, StoreError> {
        let patients = self.patients.lock().unwrap();
        let needle = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        Ok(patients
            .iter()
            .filter(|p| match &needle {
                Some(q) => {
                    p.first_name.to_lowercase().contains(q)
                        || p.last_name.to_lowercase().contains(q)
                }
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn get_patient(&self, patient_id: Uuid) -> Result<Option<Patient>, StoreError> {
        Ok(self
            .patients
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.patient_id == patient_id)
            .cloned())
    }

    async fn list_therapists(&self) -> Result<Vec<Therapist>, StoreError> {
        Ok(self.therapists.lock().unwrap().clone())
    }

    async fn get_therapist(&self, therapist_id: Uuid) -> Result<Option<Therapist>, StoreError> {
        Ok(self
            .therapists
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.therapist_id == therapist_id)
            .cloned())
    }

    async fn list_appointments(
        &self,
        on: Option<NaiveDate>,
    ) -> Result<Vec<AppointmentDetail>, StoreError> {
        let appointments = self.appointments.lock().unwrap().clone();
        Ok(appointments
            .iter()
            .filter(|a| on.is_none_or(|day| a.scheduled_at.date_naive() == day))
            .filter_map(|a| self.detail_for(a))
            .collect())
    }

    async fn get_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Option<AppointmentDetail>, StoreError> {
        let appointment = self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.appointment_id == appointment_id)
            .cloned();
        Ok(appointment.and_then(|a| self.detail_for(&a)))
    }
}
