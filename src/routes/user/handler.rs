use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    database::StoreError,
    models::NewUser,
    utils::{
        error_codes, error_to_api_response, hash_password, new_id, success_to_api_response,
    },
};

use super::model::{RegisterRequest, RegisterResponse};

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    if let Err(errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response(error_codes::VALIDATION_ERROR, errors.summary()),
        );
    }

    // 先查重，避免对已存在的邮箱做一次 bcrypt
    match state.store.find_user_by_email(&req.email).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                error_to_api_response(error_codes::USER_EXISTS, "User already exists".to_string()),
            );
        }
        Ok(None) => {}
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response(error_codes::INTERNAL_ERROR, e.to_string()),
            );
        }
    }

    let password = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Failed to hash password: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response(
                    error_codes::INTERNAL_ERROR,
                    "Failed to hash password".to_string(),
                ),
            );
        }
    };

    let user = NewUser {
        id: new_id(),
        name: req.name,
        email: req.email,
        password,
        household_id: req.household_id,
    };

    match state.store.create_user(&user).await {
        Ok(user) => (
            StatusCode::CREATED,
            success_to_api_response(RegisterResponse::from(user)),
        ),
        Err(StoreError::Conflict(_)) => (
            StatusCode::CONFLICT,
            error_to_api_response(error_codes::USER_EXISTS, "User already exists".to_string()),
        ),
        Err(StoreError::MissingReference(_)) => (
            StatusCode::NOT_FOUND,
            error_to_api_response(error_codes::NOT_FOUND, "Household not found".to_string()),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_to_api_response(error_codes::INTERNAL_ERROR, e.to_string()),
        ),
    }
}
