use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{
    CalendarEventFilter, CalendarEventType, CreateCalendarEventParams, UpdateCalendarEventParams,
};
use crate::firm::scheduling;
use crate::web::server::AppState;
use crate::web::types::{
    ApiError, CalendarEventInfo, CalendarEventsListResponse, CreateCalendarEventRequest,
    DeleteResponse, SuggestedSlotInfo, SuggestedSlotsResponse, UpdateCalendarEventRequest,
    bad_request, internal_error, not_found,
};

use super::{field_datetime, field_enum, field_uuid, finish_validation, parse_path_id, require_non_empty};

#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub client_id: Option<String>,
    pub case_id: Option<String>,
    pub assigned_to_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestSlotsQuery {
    pub date: String,
    pub assigned_to_id: Option<String>,
}

/// Resolve an optional linked id to the record's id, dropping unknown links.
async fn resolve_client(state: &AppState, id: Option<Uuid>) -> Result<Option<Uuid>, ApiError> {
    match id {
        Some(id) => Ok(state
            .db
            .get_client(id)
            .await
            .map_err(internal_error)?
            .map(|c| c.id)),
        None => Ok(None),
    }
}

async fn resolve_case(state: &AppState, id: Option<Uuid>) -> Result<Option<Uuid>, ApiError> {
    match id {
        Some(id) => Ok(state
            .db
            .get_case(id)
            .await
            .map_err(internal_error)?
            .map(|c| c.id)),
        None => Ok(None),
    }
}

async fn resolve_user(state: &AppState, id: Option<Uuid>) -> Result<Option<Uuid>, ApiError> {
    match id {
        Some(id) => Ok(state
            .db
            .get_user(id)
            .await
            .map_err(internal_error)?
            .map(|u| u.id)),
        None => Ok(None),
    }
}

pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCalendarEventRequest>,
) -> Result<(StatusCode, Json<CalendarEventInfo>), ApiError> {
    let mut errors = Vec::new();
    let title = require_non_empty(&req.title, "title", &mut errors);
    let event_type = field_enum(
        &req.event_type,
        "event_type",
        CalendarEventType::from_db_value,
        &mut errors,
    );
    let start_at = field_datetime(&req.start_at, "start_at", &mut errors);
    let end_at = match req.end_at.as_deref() {
        Some(raw) => field_datetime(raw, "end_at", &mut errors).map(Some),
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
    let assigned_to_id = match req.assigned_to_id.as_deref() {
        Some(raw) => field_uuid(raw, "assigned_to_id", &mut errors).map(Some),
        None => Some(None),
    };
    finish_validation(errors)?;

    // Unknown links are dropped, not rejected; there is deliberately no
    // overlap check against existing bookings.
    let (client_id, case_id, assigned_to_id) = futures::try_join!(
        resolve_client(&state, client_id.flatten()),
        resolve_case(&state, case_id.flatten()),
        resolve_user(&state, assigned_to_id.flatten()),
    )?;

    let event = state
        .db
        .create_event(&CreateCalendarEventParams {
            title,
            event_type: event_type.expect("validated"),
            start_at: start_at.expect("validated"),
            end_at: end_at.expect("validated"),
            is_all_day: req.is_all_day.unwrap_or(false),
            location: req.location,
            description: req.description,
            client_id,
            case_id,
            assigned_to_id,
        })
        .await
        .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(CalendarEventInfo::from(&event))))
}

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<CalendarEventsListResponse>, ApiError> {
    let mut errors = Vec::new();
    let from = match query.from.as_deref() {
        Some(raw) => field_datetime(raw, "from", &mut errors),
        None => None,
    };
    let to = match query.to.as_deref() {
        Some(raw) => field_datetime(raw, "to", &mut errors),
        None => None,
    };
    let client_id = match query.client_id.as_deref() {
        Some(raw) => field_uuid(raw, "client_id", &mut errors),
        None => None,
    };
    let case_id = match query.case_id.as_deref() {
        Some(raw) => field_uuid(raw, "case_id", &mut errors),
        None => None,
    };
    let assigned_to_id = match query.assigned_to_id.as_deref() {
        Some(raw) => field_uuid(raw, "assigned_to_id", &mut errors),
        None => None,
    };
    finish_validation(errors)?;

    let events = state
        .db
        .list_events(&CalendarEventFilter {
            from,
            to,
            client_id,
            case_id,
            assigned_to_id,
        })
        .await
        .map_err(internal_error)?;

    Ok(Json(CalendarEventsListResponse {
        events: events.iter().map(CalendarEventInfo::from).collect(),
    }))
}

pub async fn get_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CalendarEventInfo>, ApiError> {
    let id = parse_path_id(&id, "calendar event")?;
    let event = state
        .db
        .get_event(id)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Calendar event not found"))?;
    Ok(Json(CalendarEventInfo::from(&event)))
}

pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCalendarEventRequest>,
) -> Result<Json<CalendarEventInfo>, ApiError> {
    let id = parse_path_id(&id, "calendar event")?;

    let mut errors = Vec::new();
    if let Some(title) = req.title.as_deref()
        && title.trim().is_empty()
    {
        errors.push("title must not be empty".to_string());
    }
    let event_type = match req.event_type.as_deref() {
        Some(raw) => field_enum(raw, "event_type", CalendarEventType::from_db_value, &mut errors),
        None => None,
    };
    let start_at = match req.start_at.as_deref() {
        Some(raw) => field_datetime(raw, "start_at", &mut errors),
        None => None,
    };
    let end_at = match &req.end_at {
        Some(Some(raw)) => field_datetime(raw, "end_at", &mut errors).map(Some),
        Some(None) => Some(None),
        None => None,
    };
    let client_id = match req.client_id.as_deref() {
        Some(raw) => field_uuid(raw, "client_id", &mut errors).map(Some),
        None => Some(None),
    };
    let case_id = match req.case_id.as_deref() {
        Some(raw) => field_uuid(raw, "case_id", &mut errors).map(Some),
        None => Some(None),
    };
    let assigned_to_id = match req.assigned_to_id.as_deref() {
        Some(raw) => field_uuid(raw, "assigned_to_id", &mut errors).map(Some),
        None => Some(None),
    };
    finish_validation(errors)?;

    // Providing a link re-resolves it; unknown targets clear the link.
    let client_id = match client_id.expect("validated") {
        Some(raw_id) => Some(resolve_client(&state, Some(raw_id)).await?),
        None => None,
    };
    let case_id = match case_id.expect("validated") {
        Some(raw_id) => Some(resolve_case(&state, Some(raw_id)).await?),
        None => None,
    };
    let assigned_to_id = match assigned_to_id.expect("validated") {
        Some(raw_id) => Some(resolve_user(&state, Some(raw_id)).await?),
        None => None,
    };

    let updated = state
        .db
        .update_event(
            id,
            &UpdateCalendarEventParams {
                title: req.title,
                event_type,
                start_at,
                end_at,
                is_all_day: req.is_all_day,
                location: req.location,
                description: req.description,
                client_id,
                case_id,
                assigned_to_id,
            },
        )
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Calendar event not found"))?;

    Ok(Json(CalendarEventInfo::from(&updated)))
}

pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_path_id(&id, "calendar event")?;
    let deleted = state.db.delete_event(id).await.map_err(internal_error)?;
    Ok(Json(DeleteResponse { deleted }))
}

pub async fn suggest_slots_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SuggestSlotsQuery>,
) -> Result<Json<SuggestedSlotsResponse>, ApiError> {
    let date = NaiveDate::parse_from_str(query.date.trim(), "%Y-%m-%d")
        .map_err(|_| bad_request(vec!["date must be formatted YYYY-MM-DD".to_string()]))?;

    let mut errors = Vec::new();
    let assigned_to_id = match query.assigned_to_id.as_deref() {
        Some(raw) => field_uuid(raw, "assigned_to_id", &mut errors),
        None => None,
    };
    finish_validation(errors)?;

    let slots = scheduling::suggest_slots(state.db.as_ref(), date, assigned_to_id)
        .await
        .map_err(internal_error)?;

    Ok(Json(SuggestedSlotsResponse {
        slots: slots.iter().map(SuggestedSlotInfo::from).collect(),
    }))
}
