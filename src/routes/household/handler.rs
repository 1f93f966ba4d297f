use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    database::StoreError,
    utils::{error_codes, error_to_api_response, success_to_api_response},
    validation::validate_name,
};

use super::model::{IdQuery, UpdateNameRequest};

/// 查询家庭及其区域和家务
#[axum::debug_handler]
pub async fn find_by_id(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> impl IntoResponse {
    match state.store.find_household_overview(&query.household_id).await {
        Ok(Some(overview)) => (StatusCode::OK, success_to_api_response(overview)),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            error_to_api_response(error_codes::NOT_FOUND, "Household not found".to_string()),
        ),
        Err(e) => {
            tracing::error!("Failed to load household {}: {:?}", query.household_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response(error_codes::INTERNAL_ERROR, e.to_string()),
            )
        }
    }
}

#[axum::debug_handler]
pub async fn update_name(
    State(state): State<AppState>,
    Json(req): Json<UpdateNameRequest>,
) -> impl IntoResponse {
    if let Err(errors) = validate_name("name", &req.name) {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response(error_codes::VALIDATION_ERROR, errors.summary()),
        );
    }

    match state.store.rename_household(&req.household_id, &req.name).await {
        Ok(household) => (StatusCode::OK, success_to_api_response(household)),
        Err(StoreError::NotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response(error_codes::NOT_FOUND, "Household not found".to_string()),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_to_api_response(error_codes::INTERNAL_ERROR, e.to_string()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::{
        AppState,
        config::Config,
        database::memory::MemoryStore,
        onboarding::{ValidatedOnboarding, persist},
        routes::create_router,
        utils::new_id,
    };

    fn app(store: &MemoryStore) -> Router {
        create_router(AppState {
            store: Arc::new(store.clone()),
            config: Config::for_tests(),
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn seeded(store: &MemoryStore) -> String {
        let onboarding = ValidatedOnboarding {
            household_name: "Casa".into(),
            areas: BTreeMap::from([
                ("Kitchen".to_string(), vec!["Mop floor".to_string(), "Dishes".to_string()]),
                ("Bathroom".to_string(), vec!["Dust".to_string()]),
            ]),
            chores: vec![],
        };
        persist(store, &onboarding, new_id).await.unwrap().household_id
    }

    fn rename(household_id: &str, name: &str) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri("/api/households/update-name")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "household_id": household_id, "name": name }).to_string(),
            ))
            .unwrap()
    }

    #[tokio::test]
    async fn returns_areas_with_their_chores() {
        let store = MemoryStore::new();
        let household_id = seeded(&store).await;

        let request = Request::builder()
            .uri(format!("/api/households/by-id?household_id={household_id}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(&store), request).await;

        assert_eq!(status, StatusCode::OK);
        let overview = &body["resp_data"];
        assert_eq!(overview["household"]["name"], "Casa");
        assert_eq!(overview["areas"][0]["area"]["name"], "Bathroom");
        assert_eq!(overview["areas"][1]["area"]["name"], "Kitchen");
        // 家务按录入顺序返回
        assert_eq!(overview["areas"][1]["chores"][0]["name"], "Mop floor");
        assert_eq!(overview["areas"][1]["chores"][1]["name"], "Dishes");
    }

    #[tokio::test]
    async fn unknown_household_is_not_found() {
        let store = MemoryStore::new();
        let request = Request::builder()
            .uri("/api/households/by-id?household_id=missing")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(&store), request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 1004);
    }

    #[tokio::test]
    async fn renames_household() {
        let store = MemoryStore::new();
        let household_id = seeded(&store).await;

        let (status, body) = send(app(&store), rename(&household_id, "Casa Nueva")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resp_data"]["name"], "Casa Nueva");
        assert_eq!(store.snapshot().households[0].name, "Casa Nueva");
    }

    #[tokio::test]
    async fn rename_keeps_name_rules() {
        let store = MemoryStore::new();
        let household_id = seeded(&store).await;

        let (status, _) = send(app(&store), rename(&household_id, "")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(app(&store), rename(&household_id, &"h".repeat(51))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(store.snapshot().households[0].name, "Casa");
    }
}
