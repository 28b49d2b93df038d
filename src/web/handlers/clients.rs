use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::db::{ClientType, CreateClientParams, UpdateClientParams};
use crate::web::server::AppState;
use crate::web::types::{
    ApiError, ClientInfo, ClientsListResponse, CreateClientRequest, DeleteResponse,
    UpdateClientRequest, internal_error, not_found,
};

use super::{field_enum, finish_validation, parse_path_id, require_non_empty, valid_email};

pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientInfo>), ApiError> {
    let mut errors = Vec::new();
    let name = require_non_empty(&req.name, "name", &mut errors);
    let client_type = field_enum(
        &req.client_type,
        "client_type",
        ClientType::from_db_value,
        &mut errors,
    );
    if let Some(email) = req.email.as_deref()
        && !valid_email(email)
    {
        errors.push("email must be a valid email address".to_string());
    }
    finish_validation(errors)?;

    let client = state
        .db
        .create_client(&CreateClientParams {
            name,
            client_type: client_type.expect("validated"),
            national_id: req.national_id,
            commercial_registration: req.commercial_registration,
            email: req.email,
            phone: req.phone,
            notes: req.notes,
        })
        .await
        .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(ClientInfo::from(&client))))
}

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClientsListResponse>, ApiError> {
    let clients = state.db.list_clients().await.map_err(internal_error)?;
    Ok(Json(ClientsListResponse {
        clients: clients.iter().map(ClientInfo::from).collect(),
    }))
}

pub async fn get_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ClientInfo>, ApiError> {
    let id = parse_path_id(&id, "client")?;
    let client = state
        .db
        .get_client(id)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Client not found"))?;
    Ok(Json(ClientInfo::from(&client)))
}

pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateClientRequest>,
) -> Result<Json<ClientInfo>, ApiError> {
    let id = parse_path_id(&id, "client")?;

    let mut errors = Vec::new();
    let client_type = match req.client_type.as_deref() {
        Some(raw) => field_enum(raw, "client_type", ClientType::from_db_value, &mut errors),
        None => None,
    };
    if let Some(name) = req.name.as_deref()
        && name.trim().is_empty()
    {
        errors.push("name must not be empty".to_string());
    }
    if let Some(Some(email)) = &req.email
        && !valid_email(email)
    {
        errors.push("email must be a valid email address".to_string());
    }
    finish_validation(errors)?;

    let updated = state
        .db
        .update_client(
            id,
            &UpdateClientParams {
                name: req.name,
                client_type,
                national_id: req.national_id,
                commercial_registration: req.commercial_registration,
                email: req.email,
                phone: req.phone,
                notes: req.notes,
            },
        )
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Client not found"))?;

    Ok(Json(ClientInfo::from(&updated)))
}

pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_path_id(&id, "client")?;
    let deleted = state.db.delete_client(id).await.map_err(internal_error)?;
    Ok(Json(DeleteResponse { deleted }))
}
