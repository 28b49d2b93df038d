use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::db::{CreateDocumentParams, DocumentFilter, DocumentType, UpdateDocumentParams};
use crate::web::server::AppState;
use crate::web::types::{
    ApiError, CreateDocumentRequest, DeleteResponse, DocumentInfo, DocumentsListResponse,
    UpdateDocumentRequest, internal_error, not_found,
};

use super::{field_enum, field_uuid, finish_validation, parse_path_id, require_non_empty};

#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    pub client_id: Option<String>,
    pub case_id: Option<String>,
    pub search: Option<String>,
}

async fn resolve_client_link(
    state: &AppState,
    id: Option<uuid::Uuid>,
) -> Result<Option<uuid::Uuid>, ApiError> {
    match id {
        Some(id) => Ok(state
            .db
            .get_client(id)
            .await
            .map_err(internal_error)?
            .map(|client| client.id)),
        None => Ok(None),
    }
}

async fn resolve_case_link(
    state: &AppState,
    id: Option<uuid::Uuid>,
) -> Result<Option<uuid::Uuid>, ApiError> {
    match id {
        Some(id) => Ok(state
            .db
            .get_case(id)
            .await
            .map_err(internal_error)?
            .map(|case| case.id)),
        None => Ok(None),
    }
}

async fn resolve_user_link(
    state: &AppState,
    id: Option<uuid::Uuid>,
) -> Result<Option<uuid::Uuid>, ApiError> {
    match id {
        Some(id) => Ok(state
            .db
            .get_user(id)
            .await
            .map_err(internal_error)?
            .map(|user| user.id)),
        None => Ok(None),
    }
}

pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<DocumentInfo>), ApiError> {
    let mut errors = Vec::new();
    let title = require_non_empty(&req.title, "title", &mut errors);
    let doc_type = field_enum(&req.doc_type, "doc_type", DocumentType::from_db_value, &mut errors);
    let file_url = require_non_empty(&req.file_url, "file_url", &mut errors);
    let client_id = match req.client_id.as_deref() {
        Some(raw) => field_uuid(raw, "client_id", &mut errors).map(Some),
        None => Some(None),
    };
    let case_id = match req.case_id.as_deref() {
        Some(raw) => field_uuid(raw, "case_id", &mut errors).map(Some),
        None => Some(None),
    };
    let uploaded_by_id = match req.uploaded_by_id.as_deref() {
        Some(raw) => field_uuid(raw, "uploaded_by_id", &mut errors).map(Some),
        None => Some(None),
    };
    finish_validation(errors)?;

    // Unknown links are dropped, not rejected.
    let (client_id, case_id, uploaded_by_id) = futures::try_join!(
        resolve_client_link(&state, client_id.expect("validated")),
        resolve_case_link(&state, case_id.expect("validated")),
        resolve_user_link(&state, uploaded_by_id.expect("validated")),
    )?;

    let document = state
        .db
        .create_document(&CreateDocumentParams {
            title,
            doc_type: doc_type.expect("validated"),
            file_url,
            original_file_name: req.original_file_name,
            mime_type: req.mime_type,
            description: req.description,
            text_content: req.text_content,
            tags: req.tags.unwrap_or_default(),
            client_id,
            case_id,
            uploaded_by_id,
        })
        .await
        .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(DocumentInfo::from(&document))))
}

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListDocumentsQuery>,
) -> Result<Json<DocumentsListResponse>, ApiError> {
    let mut errors = Vec::new();
    let client_id = match query.client_id.as_deref() {
        Some(raw) => field_uuid(raw, "client_id", &mut errors),
        None => None,
    };
    let case_id = match query.case_id.as_deref() {
        Some(raw) => field_uuid(raw, "case_id", &mut errors),
        None => None,
    };
    finish_validation(errors)?;

    let documents = state
        .db
        .list_documents(&DocumentFilter {
            client_id,
            case_id,
            search: query.search,
        })
        .await
        .map_err(internal_error)?;

    Ok(Json(DocumentsListResponse {
        documents: documents.iter().map(DocumentInfo::from).collect(),
    }))
}

pub async fn get_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DocumentInfo>, ApiError> {
    let id = parse_path_id(&id, "document")?;
    let document = state
        .db
        .get_document(id)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Document not found"))?;
    Ok(Json(DocumentInfo::from(&document)))
}

pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDocumentRequest>,
) -> Result<Json<DocumentInfo>, ApiError> {
    let id = parse_path_id(&id, "document")?;

    let mut errors = Vec::new();
    if let Some(title) = req.title.as_deref()
        && title.trim().is_empty()
    {
        errors.push("title must not be empty".to_string());
    }
    if let Some(file_url) = req.file_url.as_deref()
        && file_url.trim().is_empty()
    {
        errors.push("file_url must not be empty".to_string());
    }
    let doc_type = match req.doc_type.as_deref() {
        Some(raw) => field_enum(raw, "doc_type", DocumentType::from_db_value, &mut errors),
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
    let uploaded_by_id = match req.uploaded_by_id.as_deref() {
        Some(raw) => field_uuid(raw, "uploaded_by_id", &mut errors).map(Some),
        None => Some(None),
    };
    finish_validation(errors)?;

    // Providing a link re-resolves it; unknown targets clear the link.
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
    let uploaded_by_id = match uploaded_by_id.expect("validated") {
        Some(raw_id) => Some(
            state
                .db
                .get_user(raw_id)
                .await
                .map_err(internal_error)?
                .map(|user| user.id),
        ),
        None => None,
    };

    let updated = state
        .db
        .update_document(
            id,
            &UpdateDocumentParams {
                title: req.title,
                doc_type,
                file_url: req.file_url,
                original_file_name: req.original_file_name,
                mime_type: req.mime_type,
                description: req.description,
                text_content: req.text_content,
                tags: req.tags,
                client_id,
                case_id,
                uploaded_by_id,
            },
        )
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Document not found"))?;

    Ok(Json(DocumentInfo::from(&updated)))
}

pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_path_id(&id, "document")?;
    let deleted = state.db.delete_document(id).await.map_err(internal_error)?;
    Ok(Json(DeleteResponse { deleted }))
}
