use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::database::StoreError;
use crate::onboarding::PersistenceError;

/// 请求边界上的错误，统一转换为 `{code, error_message}`
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: i32,
    pub error_message: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Persistence(PersistenceError::Store(StoreError::Conflict(_))) => {
                StatusCode::CONFLICT
            }
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            code: status.as_u16() as i32,
            error_message: self.to_string(),
        });

        (status, body).into_response()
    }
}
