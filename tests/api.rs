//! End-to-end tests over the router with the in-memory store injected behind
//! the repository seam, so no database is needed.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use clinic_booking_server::{
    models::{AppState, Appointment, AppointmentStatus, Patient, Therapist},
    repo::memory::MemoryStore,
    routes,
};

fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let router = routes::router(AppState::from_store(store.clone()));
    (router, store)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    let request = match body {
        Some(v) => builder.body(Body::from(v.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn booking_payload(name: &str, service: &str, phone: &str) -> Value {
    json!({
        "name": name,
        "phone": phone,
        "service": service,
        "date": "2026-09-14",
        "message": "please call after 5pm",
    })
}

#[tokio::test]
async fn health_is_alive() {
    let (app, _) = app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn valid_booking_returns_positive_id_and_roundtrips() {
    let (app, _) = app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/bookings",
        Some(booking_payload("Aisha", "General", "555-0101")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let id = body["bookingId"].as_i64().unwrap();
    assert!(id > 0);

    let (status, body) = send(&app, "GET", &format!("/api/bookings/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let booking = &body["booking"];
    assert_eq!(booking["name"], json!("Aisha"));
    assert_eq!(booking["phone"], json!("555-0101"));
    assert_eq!(booking["service"], json!("General"));
    assert_eq!(booking["date"], json!("2026-09-14"));
    assert_eq!(booking["status"], json!("pending"));
}

#[tokio::test]
async fn booking_ids_are_unique_across_duplicate_submissions() {
    let (app, _) = app();

    // Same person, same phone, twice. Duplicates are legal.
    let payload = booking_payload("Aisha", "General", "555-0101");
    let (_, first) = send(&app, "POST", "/api/bookings", Some(payload.clone())).await;
    let (_, second) = send(&app, "POST", "/api/bookings", Some(payload)).await;
    assert_ne!(first["bookingId"], second["bookingId"]);

    let (_, list) = send(&app, "GET", "/api/bookings", None).await;
    assert_eq!(list["count"], json!(2));
}

#[tokio::test]
async fn missing_required_field_yields_400_and_persists_nothing() {
    let (app, _) = app();

    for field in ["name", "phone", "service", "date"] {
        let mut payload = booking_payload("Aisha", "General", "555-0101");
        payload.as_object_mut().unwrap().remove(field);

        let (status, body) = send(&app, "POST", "/api/bookings", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "field: {field}");
        assert_eq!(body["success"], json!(false));
        assert!(body["message"].as_str().unwrap().contains(field));
    }

    let (status, list) = send(&app, "GET", "/api/bookings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["count"], json!(0));
}

#[tokio::test]
async fn booking_lookup_miss_is_404() {
    let (app, _) = app();
    let (status, body) = send(&app, "GET", "/api/bookings/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Booking not found"));
}

#[tokio::test]
async fn booking_status_is_the_only_mutable_field() {
    let (app, _) = app();
    let (_, created) = send(
        &app,
        "POST",
        "/api/bookings",
        Some(booking_payload("Aisha", "General", "555-0101")),
    )
    .await;
    let id = created["bookingId"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/bookings/{id}"),
        Some(json!({"status": "cancelled"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["status"], json!("cancelled"));
    assert_eq!(body["booking"]["name"], json!("Aisha"));

    let (_, filtered) = send(&app, "GET", "/api/bookings?status=cancelled", None).await;
    assert_eq!(filtered["count"], json!(1));
    let (_, filtered) = send(&app, "GET", "/api/bookings?status=pending", None).await;
    assert_eq!(filtered["count"], json!(0));
}

#[tokio::test]
async fn fanout_twice_creates_notifications_once() {
    let (app, _) = app();
    send(
        &app,
        "POST",
        "/api/bookings",
        Some(booking_payload("Aisha", "General", "555-0101")),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/bookings",
        Some(booking_payload("Tomas", "Physio", "555-0102")),
    )
    .await;

    let (status, body) = send(&app, "POST", "/api/notifications/fanout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], json!(2));

    let (_, body) = send(&app, "POST", "/api/notifications/fanout", None).await;
    assert_eq!(body["created"], json!(0));

    let (_, all) = send(&app, "GET", "/api/notifications", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn fanout_derives_title_and_message_from_booking() {
    let (app, _) = app();
    send(
        &app,
        "POST",
        "/api/bookings",
        Some(booking_payload("Aisha", "General", "555-0101")),
    )
    .await;
    send(&app, "POST", "/api/notifications/fanout", None).await;

    let (_, all) = send(&app, "GET", "/api/notifications", None).await;
    let notification = &all.as_array().unwrap()[0];
    assert_eq!(notification["title"], json!("New Booking Request from Aisha"));
    assert!(
        notification["message"]
            .as_str()
            .unwrap()
            .contains("Service: General")
    );
    assert_eq!(notification["type"], json!("booking_request"));
    assert_eq!(notification["read"], json!(false));
    assert_eq!(notification["status"], json!("pending"));
}

#[tokio::test]
async fn notifications_filter_by_status_and_empty_match_is_ok() {
    let (app, _) = app();
    send(
        &app,
        "POST",
        "/api/bookings",
        Some(booking_payload("Aisha", "General", "555-0101")),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/bookings",
        Some(booking_payload("Tomas", "Physio", "555-0102")),
    )
    .await;
    send(&app, "POST", "/api/notifications/fanout", None).await;

    // Empty filter match is 200 with an empty array, never an error.
    let (status, resolved) = send(&app, "GET", "/api/notifications?status=resolved", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved, json!([]));

    let (_, pending) = send(&app, "GET", "/api/notifications?status=pending", None).await;
    let pending = pending.as_array().unwrap().clone();
    assert_eq!(pending.len(), 2);
    let first_id = pending[0]["notificationId"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/notifications/{first_id}"),
        Some(json!({"status": "resolved"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notification"]["status"], json!("resolved"));

    let (_, pending) = send(&app, "GET", "/api/notifications?status=pending", None).await;
    let pending = pending.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert!(pending.iter().all(|n| n["status"] == json!("pending")));
}

#[tokio::test]
async fn marking_a_notification_read_sets_the_flag() {
    let (app, _) = app();
    send(
        &app,
        "POST",
        "/api/bookings",
        Some(booking_payload("Aisha", "General", "555-0101")),
    )
    .await;
    send(&app, "POST", "/api/notifications/fanout", None).await;

    let (_, all) = send(&app, "GET", "/api/notifications", None).await;
    let id = all.as_array().unwrap()[0]["notificationId"].as_i64().unwrap();

    let (status, body) = send(&app, "POST", &format!("/api/notifications/{id}/read"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notification"]["read"], json!(true));

    let (status, body) = send(&app, "POST", "/api/notifications/9999/read", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
}

fn seed_directory(store: &MemoryStore) -> (Uuid, Uuid, Uuid) {
    let patient_id = Uuid::new_v4();
    let therapist_id = Uuid::new_v4();
    let appointment_id = Uuid::new_v4();
    let now = Utc::now();

    store.add_patient(Patient {
        patient_id,
        first_name: "Aisha".into(),
        last_name: "Khan".into(),
        email: Some("aisha@example.com".into()),
        phone: Some("555-0101".into()),
        created_at: now,
    });
    store.add_therapist(Therapist {
        therapist_id,
        first_name: "Maya".into(),
        last_name: "Rivas".into(),
        specialty: Some("Physiotherapy".into()),
        email: None,
        created_at: now,
    });
    store.add_appointment(Appointment {
        appointment_id,
        patient_id,
        therapist_id,
        scheduled_at: Utc.with_ymd_and_hms(2026, 9, 14, 10, 0, 0).unwrap(),
        duration_min: 45,
        status: AppointmentStatus::Scheduled,
        notes: Some("first session".into()),
        created_at: now,
    });

    (patient_id, therapist_id, appointment_id)
}

#[tokio::test]
async fn appointments_are_served_with_their_relations() {
    let (app, store) = app();
    let (patient_id, therapist_id, appointment_id) = seed_directory(&store);

    let (status, body) = send(&app, "GET", "/api/appointments", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(1));
    let appt = &body["appointments"][0];
    assert_eq!(appt["patient"]["firstName"], json!("Aisha"));
    assert_eq!(appt["therapist"]["lastName"], json!("Rivas"));
    assert_eq!(appt["therapist"]["specialty"], json!("Physiotherapy"));

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/appointments/{appointment_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["appointment"]["patient"]["patientId"],
        json!(patient_id.to_string())
    );
    assert_eq!(
        body["appointment"]["therapist"]["therapistId"],
        json!(therapist_id.to_string())
    );

    // Day filter: match and miss.
    let (_, body) = send(&app, "GET", "/api/appointments?date=2026-09-14", None).await;
    assert_eq!(body["count"], json!(1));
    let (status, body) = send(&app, "GET", "/api/appointments?date=2026-09-15", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(0));
}

#[tokio::test]
async fn patient_and_therapist_lookups() {
    let (app, store) = app();
    let (patient_id, therapist_id, _) = seed_directory(&store);

    let (status, body) = send(&app, "GET", "/api/patients?query=khan", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["patients"][0]["firstName"], json!("Aisha"));

    let (_, body) = send(&app, "GET", "/api/patients?query=nomatch", None).await;
    assert_eq!(body["count"], json!(0));

    let (status, body) = send(&app, "GET", &format!("/api/patients/{patient_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patient"]["lastName"], json!("Khan"));

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/therapists/{therapist_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let missing = Uuid::new_v4();
    let (status, body) = send(&app, "GET", &format!("/api/patients/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Patient not found"));
}
