//! Notification fan-out: derives one `booking_request` notification for every
//! booking that has none yet. Runs as an explicit pass (route or operator
//! tool), never as a side effect of intake, so a freshly created booking may
//! go unnotified until the next run.

use crate::error::StoreError;
use crate::models::NewNotification;
use crate::repo::NotificationStore;

pub fn booking_request_title(name: &str) -> String {
    format!("New Booking Request from {name}")
}

pub fn booking_request_message(service: &str, phone: &str) -> String {
    format!("Service: {service} - Phone: {phone}")
}

/// Scan for unnotified bookings and create their notifications. Idempotent:
/// a second run over an unchanged booking set creates nothing. Safe to race
/// with intake and with itself; a lost insert race is suppressed by the store
/// and simply not counted.
pub async fn run(notifications: &dyn NotificationStore) -> Result<u64, StoreError> {
    let missing = notifications.bookings_without_notification().await?;

    let mut created = 0u64;
    for booking in missing {
        let draft = NewNotification {
            booking_id: booking.booking_id,
            title: booking_request_title(&booking.name),
            message: booking_request_message(&booking.service, &booking.phone),
        };
        if notifications.create_booking_request(draft).await?.is_some() {
            created += 1;
        }
    }

    tracing::info!(created, "booking notification fan-out complete");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, NewBooking, NotificationStatus};
    use crate::repo::{BookingStore, NotificationStore, memory::MemoryStore};

    fn submission(name: &str, service: &str, phone: &str) -> NewBooking {
        NewBooking {
            name: name.to_string(),
            phone: phone.to_string(),
            service: service.to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2026, 9, 14).unwrap(),
            message: None,
            status: BookingStatus::Pending,
        }
    }

    #[test]
    fn derives_title_and_message_exactly() {
        assert_eq!(
            booking_request_title("Aisha"),
            "New Booking Request from Aisha"
        );
        assert_eq!(
            booking_request_message("General", "555-0101"),
            "Service: General - Phone: 555-0101"
        );
    }

    #[tokio::test]
    async fn second_run_creates_nothing() {
        let store = MemoryStore::new();
        store
            .create_booking(submission("Aisha", "General", "555-0101"))
            .await
            .unwrap();
        store
            .create_booking(submission("Tomas", "Physio", "555-0102"))
            .await
            .unwrap();

        assert_eq!(run(&store).await.unwrap(), 2);
        assert_eq!(run(&store).await.unwrap(), 0);
        assert_eq!(store.list_notifications(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn new_booking_is_picked_up_by_next_run() {
        let store = MemoryStore::new();
        store
            .create_booking(submission("Aisha", "General", "555-0101"))
            .await
            .unwrap();
        assert_eq!(run(&store).await.unwrap(), 1);

        let late = store
            .create_booking(submission("Tomas", "Physio", "555-0102"))
            .await
            .unwrap();
        assert_eq!(run(&store).await.unwrap(), 1);

        let pending = store
            .list_notifications(Some(NotificationStatus::Pending))
            .await
            .unwrap();
        assert!(pending.iter().any(|n| n.booking_id == late.booking_id));
    }
}
