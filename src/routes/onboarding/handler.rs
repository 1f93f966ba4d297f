use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    error::AppError,
    onboarding::{OnboardingForm, SubmittedFields, persist, validate},
    utils::new_id,
};

use super::model::{OnboardingFailure, OnboardingSuccess};

#[axum::debug_handler]
pub async fn submit(State(state): State<AppState>, Form(form): Form<OnboardingForm>) -> Response {
    let onboarding = match validate(&form) {
        Ok(onboarding) => onboarding,
        Err(errors) => {
            tracing::debug!("Rejected onboarding submission: {:?}", errors.issues());
            return (
                StatusCode::BAD_REQUEST,
                Json(OnboardingFailure {
                    error: errors.flatten(),
                    fields: SubmittedFields::from(&form),
                }),
            )
                .into_response();
        }
    };

    match persist(state.store.as_ref(), &onboarding, new_id).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(OnboardingSuccess {
                status: "ok",
                household_id: receipt.household_id,
            }),
        )
            .into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}
