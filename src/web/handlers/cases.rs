use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::db::{
    CaseSessionRecord, CaseStage, CaseStatus, CaseType, CreateCaseParams,
    CreateCaseSessionParams, UpdateCaseParams,
};
use crate::web::server::AppState;
use crate::web::types::{
    ApiError, CaseInfo, CaseSessionInfo, CaseSessionsListResponse, CasesListResponse,
    CreateCaseRequest, CreateCaseSessionRequest, DeleteResponse, UpdateCaseRequest,
    internal_error, not_found,
};

use super::{
    field_datetime, field_enum, field_uuid, finish_validation, parse_path_id, require_non_empty,
};

pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCaseRequest>,
) -> Result<(StatusCode, Json<CaseInfo>), ApiError> {
    let mut errors = Vec::new();
    let case_number = require_non_empty(&req.case_number, "case_number", &mut errors);
    let client_id = field_uuid(&req.client_id, "client_id", &mut errors);
    let case_type = match req.case_type.as_deref() {
        Some(raw) => field_enum(raw, "case_type", CaseType::from_db_value, &mut errors),
        None => Some(CaseType::Other),
    };
    let stage = match req.stage.as_deref() {
        Some(raw) => field_enum(raw, "stage", CaseStage::from_db_value, &mut errors),
        None => Some(CaseStage::PreTrial),
    };
    let status = match req.status.as_deref() {
        Some(raw) => field_enum(raw, "status", CaseStatus::from_db_value, &mut errors),
        None => Some(CaseStatus::Open),
    };
    let lawyer_id = match req.responsible_lawyer_id.as_deref() {
        Some(raw) => field_uuid(raw, "responsible_lawyer_id", &mut errors).map(Some),
        None => Some(None),
    };
    finish_validation(errors)?;
    let client_id = client_id.expect("validated");

    state
        .db
        .get_client(client_id)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Client not found"))?;

    // An unknown lawyer id is dropped rather than rejected.
    let responsible_lawyer_id = match lawyer_id.flatten() {
        Some(id) => state
            .db
            .get_user(id)
            .await
            .map_err(internal_error)?
            .map(|user| user.id),
        None => None,
    };

    let case = state
        .db
        .create_case(&CreateCaseParams {
            case_number,
            title: req.title,
            case_type: case_type.expect("validated"),
            court: req.court,
            stage: stage.expect("validated"),
            status: status.expect("validated"),
            description: req.description,
            client_id,
            responsible_lawyer_id,
        })
        .await
        .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(CaseInfo::from_record(&case, &[]))))
}

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CasesListResponse>, ApiError> {
    let cases = state.db.list_cases().await.map_err(internal_error)?;
    let sessions = state
        .db
        .list_case_sessions_all()
        .await
        .map_err(internal_error)?;

    let mut by_case: HashMap<Uuid, Vec<CaseSessionRecord>> = HashMap::new();
    for session in sessions {
        by_case.entry(session.case_id).or_default().push(session);
    }

    Ok(Json(CasesListResponse {
        cases: cases
            .iter()
            .map(|case| {
                let sessions = by_case.get(&case.id).map(Vec::as_slice).unwrap_or(&[]);
                CaseInfo::from_record(case, sessions)
            })
            .collect(),
    }))
}

pub async fn get_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CaseInfo>, ApiError> {
    let id = parse_path_id(&id, "case")?;
    let case = state
        .db
        .get_case(id)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Case not found"))?;
    let sessions = state
        .db
        .list_case_sessions(id)
        .await
        .map_err(internal_error)?;
    Ok(Json(CaseInfo::from_record(&case, &sessions)))
}

pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCaseRequest>,
) -> Result<Json<CaseInfo>, ApiError> {
    let id = parse_path_id(&id, "case")?;

    let mut errors = Vec::new();
    if let Some(case_number) = req.case_number.as_deref()
        && case_number.trim().is_empty()
    {
        errors.push("case_number must not be empty".to_string());
    }
    let case_type = match req.case_type.as_deref() {
        Some(raw) => field_enum(raw, "case_type", CaseType::from_db_value, &mut errors),
        None => None,
    };
    let stage = match req.stage.as_deref() {
        Some(raw) => field_enum(raw, "stage", CaseStage::from_db_value, &mut errors),
        None => None,
    };
    let status = match req.status.as_deref() {
        Some(raw) => field_enum(raw, "status", CaseStatus::from_db_value, &mut errors),
        None => None,
    };
    let client_id = match req.client_id.as_deref() {
        Some(raw) => field_uuid(raw, "client_id", &mut errors),
        None => None,
    };
    let lawyer_id = match req.responsible_lawyer_id.as_deref() {
        Some(raw) => field_uuid(raw, "responsible_lawyer_id", &mut errors).map(Some),
        None => None,
    };
    finish_validation(errors)?;

    if let Some(client_id) = client_id {
        state
            .db
            .get_client(client_id)
            .await
            .map_err(internal_error)?
            .ok_or_else(|| not_found("Client not found"))?;
    }

    // Provided-but-unknown lawyer ids clear the assignment.
    let responsible_lawyer_id = match lawyer_id {
        Some(Some(raw_id)) => {
            let resolved = state
                .db
                .get_user(raw_id)
                .await
                .map_err(internal_error)?
                .map(|user| user.id);
            Some(resolved)
        }
        _ => None,
    };

    let updated = state
        .db
        .update_case(
            id,
            &UpdateCaseParams {
                case_number: req.case_number,
                title: req.title,
                case_type,
                court: req.court,
                stage,
                status,
                description: req.description,
                client_id,
                responsible_lawyer_id,
            },
        )
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Case not found"))?;

    let sessions = state
        .db
        .list_case_sessions(id)
        .await
        .map_err(internal_error)?;
    Ok(Json(CaseInfo::from_record(&updated, &sessions)))
}

pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_path_id(&id, "case")?;
    let deleted = state.db.delete_case(id).await.map_err(internal_error)?;
    Ok(Json(DeleteResponse { deleted }))
}

pub async fn list_sessions_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CaseSessionsListResponse>, ApiError> {
    let id = parse_path_id(&id, "case")?;
    state
        .db
        .get_case(id)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Case not found"))?;
    let sessions = state
        .db
        .list_case_sessions(id)
        .await
        .map_err(internal_error)?;
    Ok(Json(CaseSessionsListResponse {
        sessions: sessions.iter().map(CaseSessionInfo::from).collect(),
    }))
}

pub async fn add_session_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateCaseSessionRequest>,
) -> Result<(StatusCode, Json<CaseSessionInfo>), ApiError> {
    let id = parse_path_id(&id, "case")?;

    let mut errors = Vec::new();
    let session_date = field_datetime(&req.date, "date", &mut errors);
    finish_validation(errors)?;

    state
        .db
        .get_case(id)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Case not found"))?;

    let session = state
        .db
        .add_case_session(
            id,
            &CreateCaseSessionParams {
                session_date: session_date.expect("validated"),
                location: req.location,
                result: req.result,
                notes: req.notes,
            },
        )
        .await
        .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(CaseSessionInfo::from(&session))))
}
