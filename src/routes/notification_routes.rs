// src/routes/notification_routes.rs

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    fanout,
    models::{AppState, Notification, NotificationStatus},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/fanout", post(run_fanout))
        .route(
            "/notifications/{notification_id}",
            patch(update_notification_status),
        )
        .route("/notifications/{notification_id}/read", post(mark_read))
}

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    pub status: Option<NotificationStatus>,
}

/// The admin UI polls this; the body is the bare array it iterates over, and
/// an empty match is an empty array, not an error.
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(q): Query<ListNotificationsQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let notifications = state.notifications.list_notifications(q.status).await?;
    Ok(Json(notifications))
}

#[derive(Debug, Serialize)]
pub struct FanoutResponse {
    pub success: bool,
    pub created: u64,
}

pub async fn run_fanout(
    State(state): State<AppState>,
) -> Result<Json<FanoutResponse>, ApiError> {
    let created = fanout::run(state.notifications.as_ref()).await?;
    Ok(Json(FanoutResponse {
        success: true,
        created,
    }))
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub success: bool,
    pub notification: Notification,
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(notification_id): Path<i64>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let notification = state
        .notifications
        .mark_notification_read(notification_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification"))?;

    Ok(Json(NotificationResponse {
        success: true,
        notification,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateNotificationStatusRequest {
    pub status: NotificationStatus,
}

pub async fn update_notification_status(
    State(state): State<AppState>,
    Path(notification_id): Path<i64>,
    Json(req): Json<UpdateNotificationStatusRequest>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let notification = state
        .notifications
        .set_notification_status(notification_id, req.status)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification"))?;

    Ok(Json(NotificationResponse {
        success: true,
        notification,
    }))
}
