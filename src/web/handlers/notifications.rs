use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{Duration, Utc};

use crate::db::{CreateNotificationParams, NotificationChannel, NotificationStatus};
use crate::web::server::AppState;
use crate::web::types::{
    ApiError, CreateNotificationRequest, NotificationInfo, NotificationsListResponse,
    UpcomingSessionInfo, UpcomingSessionsResponse, internal_error, not_found,
};

use super::{field_datetime, field_enum, field_uuid, finish_validation, parse_path_id, require_non_empty};

/// Preview horizon for upcoming hearing sessions.
const PREVIEW_HOURS_AHEAD: i64 = 24;

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NotificationsListResponse>, ApiError> {
    let notifications = state
        .db
        .list_notifications()
        .await
        .map_err(internal_error)?;
    Ok(Json(NotificationsListResponse {
        notifications: notifications.iter().map(NotificationInfo::from).collect(),
    }))
}

pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<NotificationInfo>), ApiError> {
    let mut errors = Vec::new();
    let channel = field_enum(
        &req.channel,
        "channel",
        NotificationChannel::from_db_value,
        &mut errors,
    );
    let notification_type = require_non_empty(&req.notification_type, "notification_type", &mut errors);
    let status = match req.status.as_deref() {
        Some(raw) => field_enum(raw, "status", NotificationStatus::from_db_value, &mut errors),
        None => Some(NotificationStatus::Pending),
    };
    let scheduled_at = match req.scheduled_at.as_deref() {
        Some(raw) => field_datetime(raw, "scheduled_at", &mut errors).map(Some),
        None => Some(None),
    };
    let user_id = match req.user_id.as_deref() {
        Some(raw) => field_uuid(raw, "user_id", &mut errors).map(Some),
        None => Some(None),
    };
    let client_id = match req.client_id.as_deref() {
        Some(raw) => field_uuid(raw, "client_id", &mut errors).map(Some),
        None => Some(None),
    };
    let case_id = match req.case_id.as_deref() {
        Some(raw) => field_uuid(raw, "case_id", &mut errors).map(Some),
        None => Some(None),
    };
    finish_validation(errors)?;

    let notification = state
        .db
        .create_notification(&CreateNotificationParams {
            channel: channel.expect("validated"),
            notification_type,
            target_email: req.target_email,
            target_phone: req.target_phone,
            target_whatsapp: req.target_whatsapp,
            user_id: user_id.expect("validated"),
            client_id: client_id.expect("validated"),
            case_id: case_id.expect("validated"),
            payload: req.payload,
            scheduled_at: scheduled_at.expect("validated"),
            status: status.expect("validated"),
        })
        .await
        .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(NotificationInfo::from(&notification))))
}

pub async fn preview_case_sessions_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UpcomingSessionsResponse>, ApiError> {
    let now = Utc::now();
    let sessions = state
        .db
        .list_upcoming_case_sessions(now, now + Duration::hours(PREVIEW_HOURS_AHEAD))
        .await
        .map_err(internal_error)?;
    Ok(Json(UpcomingSessionsResponse {
        sessions: sessions.iter().map(UpcomingSessionInfo::from).collect(),
    }))
}

/// Flip the record to SENT without dispatching anything.
pub async fn simulate_send_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<NotificationInfo>, ApiError> {
    let id = parse_path_id(&id, "notification")?;
    let notification = state
        .db
        .mark_notification_sent(id, Utc::now())
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Notification not found"))?;
    Ok(Json(NotificationInfo::from(&notification)))
}
