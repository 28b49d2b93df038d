use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::db::{CreateUserParams, UserRole};
use crate::web::auth::{Claims, hash_password, issue_token, verify_password};
use crate::web::server::AppState;
use crate::web::types::{
    ApiError, LoginRequest, LoginResponse, MeResponse, RegisterLawyerRequest, UserInfo, conflict,
    internal_error, unauthorized,
};

use super::{finish_validation, require_non_empty, valid_email};

const MIN_PASSWORD_LEN: usize = 6;

pub async fn register_lawyer_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterLawyerRequest>,
) -> Result<(StatusCode, Json<UserInfo>), ApiError> {
    let mut errors = Vec::new();
    if !valid_email(&req.email) {
        errors.push("email must be a valid email address".to_string());
    }
    let full_name = require_non_empty(&req.full_name, "full_name", &mut errors);
    if req.password.len() < MIN_PASSWORD_LEN {
        errors.push(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    finish_validation(errors)?;

    if state
        .db
        .get_user_by_email(&req.email)
        .await
        .map_err(internal_error)?
        .is_some()
    {
        return Err(conflict("Email is already registered"));
    }

    let password_hash = hash_password(&req.password)?;
    let user = state
        .db
        .create_user(&CreateUserParams {
            email: req.email,
            full_name,
            phone: req.phone,
            password_hash,
            role: UserRole::Lawyer,
        })
        .await
        .map_err(|err| {
            // Two concurrent registrations can both pass the lookup; the
            // unique index decides the race.
            if err.to_string().to_ascii_lowercase().contains("unique") {
                conflict("Email is already registered")
            } else {
                internal_error(err)
            }
        })?;

    Ok((StatusCode::CREATED, Json(UserInfo::from(&user))))
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .db
        .get_user_by_email(&req.email)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| unauthorized("Invalid credentials"))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(unauthorized("Invalid credentials"));
    }

    let access_token = issue_token(&user, &state.auth)?;
    Ok(Json(LoginResponse {
        access_token,
        user: UserInfo::from(&user),
    }))
}

pub async fn me_handler(Extension(claims): Extension<Claims>) -> Json<MeResponse> {
    Json(MeResponse { user: claims })
}
