use crate::models::AppState;
use axum::Router;

pub mod appointment_routes;
pub mod booking_routes;
pub mod health_routes;
pub mod notification_routes;
pub mod patient_routes;
pub mod therapist_routes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api", booking_routes::router())
        .nest("/api", notification_routes::router())
        .nest("/api", patient_routes::router())
        .nest("/api", therapist_routes::router())
        .nest("/api", appointment_routes::router())
        .merge(health_routes::router())
        .with_state(state)
}
