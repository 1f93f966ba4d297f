use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    database::StoreError,
    models::NewArea,
    utils::{error_codes, error_to_api_response, new_id, success_to_api_response},
    validation::validate_name,
};

use super::model::{CreateAreaRequest, DeleteAreaRequest, DeleteAreaResponse};

#[axum::debug_handler]
pub async fn create_area(
    State(state): State<AppState>,
    Json(req): Json<CreateAreaRequest>,
) -> impl IntoResponse {
    if let Err(errors) = validate_name("name", &req.name) {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response(error_codes::VALIDATION_ERROR, errors.summary()),
        );
    }

    let area = NewArea {
        id: new_id(),
        name: req.name,
        household_id: req.household_id,
    };

    match state.store.create_area(&area).await {
        Ok(area) => (StatusCode::CREATED, success_to_api_response(area)),
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

/// 删除区域，同时删除它的家务关联
#[axum::debug_handler]
pub async fn delete_area(
    State(state): State<AppState>,
    Json(req): Json<DeleteAreaRequest>,
) -> impl IntoResponse {
    match state.store.delete_area(&req.area_id).await {
        Ok(removed_associations) => (
            StatusCode::OK,
            success_to_api_response(DeleteAreaResponse {
                area_id: req.area_id,
                removed_associations,
            }),
        ),
        Err(StoreError::NotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response(error_codes::NOT_FOUND, "Area not found".to_string()),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_to_api_response(error_codes::INTERNAL_ERROR, e.to_string()),
        ),
    }
}
