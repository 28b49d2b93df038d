use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;

use crate::db::{CreateTaskParams, TaskFilter, TaskPriority, TaskStatus, UpdateTaskParams};
use crate::firm::reports::{self, UserTaskStats};
use crate::web::server::AppState;
use crate::web::types::{
    ApiError, CreateTaskRequest, DeleteResponse, TaskInfo, TasksListResponse, UpdateTaskRequest,
    internal_error, not_found,
};

use super::{field_datetime, field_enum, field_uuid, finish_validation, parse_path_id, require_non_empty};

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    pub assigned_to_id: Option<String>,
    pub case_id: Option<String>,
    pub client_id: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct TaskStatsResponse {
    pub stats: Vec<UserTaskStats>,
}

pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskInfo>), ApiError> {
    let mut errors = Vec::new();
    let title = require_non_empty(&req.title, "title", &mut errors);
    let status = match req.status.as_deref() {
        Some(raw) => field_enum(raw, "status", TaskStatus::from_db_value, &mut errors),
        None => Some(TaskStatus::Todo),
    };
    let priority = match req.priority.as_deref() {
        Some(raw) => field_enum(raw, "priority", TaskPriority::from_db_value, &mut errors),
        None => Some(TaskPriority::Medium),
    };
    let due_date = match req.due_date.as_deref() {
        Some(raw) => field_datetime(raw, "due_date", &mut errors).map(Some),
        None => Some(None),
    };
    let assigned_to_id = field_uuid(&req.assigned_to_id, "assigned_to_id", &mut errors);
    let created_by_id = field_uuid(&req.created_by_id, "created_by_id", &mut errors);
    let case_id = match req.case_id.as_deref() {
        Some(raw) => field_uuid(raw, "case_id", &mut errors).map(Some),
        None => Some(None),
    };
    let client_id = match req.client_id.as_deref() {
        Some(raw) => field_uuid(raw, "client_id", &mut errors).map(Some),
        None => Some(None),
    };
    finish_validation(errors)?;

    let assigned_to_id = assigned_to_id.expect("validated");
    let created_by_id = created_by_id.expect("validated");
    let (assigned_to, created_by) = futures::try_join!(
        state.db.get_user(assigned_to_id),
        state.db.get_user(created_by_id),
    )
    .map_err(internal_error)?;
    assigned_to.ok_or_else(|| not_found("Assigned user not found"))?;
    created_by.ok_or_else(|| not_found("Creator user not found"))?;

    // Optional links are dropped when the target is unknown.
    let case_id = match case_id.expect("validated") {
        Some(id) => state
            .db
            .get_case(id)
            .await
            .map_err(internal_error)?
            .map(|case| case.id),
        None => None,
    };
    let client_id = match client_id.expect("validated") {
        Some(id) => state
            .db
            .get_client(id)
            .await
            .map_err(internal_error)?
            .map(|client| client.id),
        None => None,
    };

    let task = state
        .db
        .create_task(&CreateTaskParams {
            title,
            description: req.description,
            status: status.expect("validated"),
            priority: priority.expect("validated"),
            due_date: due_date.expect("validated"),
            assigned_to_id,
            created_by_id,
            case_id,
            client_id,
        })
        .await
        .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(TaskInfo::from(&task))))
}

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<TasksListResponse>, ApiError> {
    let mut errors = Vec::new();
    let assigned_to_id = match query.assigned_to_id.as_deref() {
        Some(raw) => field_uuid(raw, "assigned_to_id", &mut errors),
        None => None,
    };
    let case_id = match query.case_id.as_deref() {
        Some(raw) => field_uuid(raw, "case_id", &mut errors),
        None => None,
    };
    let client_id = match query.client_id.as_deref() {
        Some(raw) => field_uuid(raw, "client_id", &mut errors),
        None => None,
    };
    let status = match query.status.as_deref() {
        Some(raw) => field_enum(raw, "status", TaskStatus::from_db_value, &mut errors),
        None => None,
    };
    let priority = match query.priority.as_deref() {
        Some(raw) => field_enum(raw, "priority", TaskPriority::from_db_value, &mut errors),
        None => None,
    };
    finish_validation(errors)?;

    let tasks = state
        .db
        .list_tasks(&TaskFilter {
            assigned_to_id,
            case_id,
            client_id,
            status,
            priority,
        })
        .await
        .map_err(internal_error)?;

    Ok(Json(TasksListResponse {
        tasks: tasks.iter().map(TaskInfo::from).collect(),
    }))
}

pub async fn get_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TaskInfo>, ApiError> {
    let id = parse_path_id(&id, "task")?;
    let task = state
        .db
        .get_task(id)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Task not found"))?;
    Ok(Json(TaskInfo::from(&task)))
}

pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<TaskInfo>, ApiError> {
    let id = parse_path_id(&id, "task")?;

    let mut errors = Vec::new();
    if let Some(title) = req.title.as_deref()
        && title.trim().is_empty()
    {
        errors.push("title must not be empty".to_string());
    }
    let status = match req.status.as_deref() {
        Some(raw) => field_enum(raw, "status", TaskStatus::from_db_value, &mut errors),
        None => None,
    };
    let priority = match req.priority.as_deref() {
        Some(raw) => field_enum(raw, "priority", TaskPriority::from_db_value, &mut errors),
        None => None,
    };
    let due_date = match &req.due_date {
        Some(Some(raw)) => field_datetime(raw, "due_date", &mut errors).map(Some),
        Some(None) => Some(None),
        None => None,
    };
    let assigned_to_id = match req.assigned_to_id.as_deref() {
        Some(raw) => field_uuid(raw, "assigned_to_id", &mut errors),
        None => None,
    };
    let case_id = match req.case_id.as_deref() {
        Some(raw) => field_uuid(raw, "case_id", &mut errors).map(Some),
        None => Some(None),
    };
    let client_id = match req.client_id.as_deref() {
        Some(raw) => field_uuid(raw, "client_id", &mut errors).map(Some),
        None => Some(None),
    };
    finish_validation(errors)?;

    let existing = state
        .db
        .get_task(id)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Task not found"))?;

    if let Some(assigned_to_id) = assigned_to_id {
        state
            .db
            .get_user(assigned_to_id)
            .await
            .map_err(internal_error)?
            .ok_or_else(|| not_found("Assigned user not found"))?;
    }
    let case_id = match case_id.expect("validated") {
        Some(raw_id) => Some(
            state
                .db
                .get_case(raw_id)
                .await
                .map_err(internal_error)?
                .map(|case| case.id),
        ),
        None => None,
    };
    let client_id = match client_id.expect("validated") {
        Some(raw_id) => Some(
            state
                .db
                .get_client(raw_id)
                .await
                .map_err(internal_error)?
                .map(|client| client.id),
        ),
        None => None,
    };

    // First transition into DONE stamps the completion time.
    let completed_at = match status {
        Some(TaskStatus::Done)
            if existing.status != TaskStatus::Done && existing.completed_at.is_none() =>
        {
            Some(Some(Utc::now()))
        }
        _ => None,
    };

    let updated = state
        .db
        .update_task(
            id,
            &UpdateTaskParams {
                title: req.title,
                description: req.description,
                status,
                priority,
                due_date,
                completed_at,
                assigned_to_id,
                case_id,
                client_id,
            },
        )
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Task not found"))?;

    Ok(Json(TaskInfo::from(&updated)))
}

pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_path_id(&id, "task")?;
    let deleted = state.db.delete_task(id).await.map_err(internal_error)?;
    Ok(Json(DeleteResponse { deleted }))
}

pub async fn user_stats_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TaskStatsResponse>, ApiError> {
    let stats = reports::get_team_performance(state.db.as_ref())
        .await
        .map_err(internal_error)?;
    Ok(Json(TaskStatsResponse { stats }))
}
