use axum::{
    Router,
    routing::{get, post, put},
};
#[cfg(debug_assertions)]
use tower_http::cors::CorsLayer;

use crate::{AppState, middleware::log_errors};

pub mod area;
pub mod health;
pub mod household;
pub mod onboarding;
pub mod user;

// 创建主路由
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/ping", get(health::ping))
        // 引导表单提交
        .route("/onboarding", post(onboarding::submit))
        // 家庭
        .route("/households/by-id", get(household::find_by_id))
        .route("/households/update-name", put(household::update_name))
        // 区域
        .route("/areas/create", post(area::create_area))
        .route("/areas/delete", post(area::delete_area))
        // 用户
        .route("/users/register", post(user::register));

    let base_uri = state.config.api_base_uri.clone();
    let router = Router::new()
        .nest(&base_uri, api)
        .layer(axum::middleware::from_fn(log_errors));

    // 仅开发模式允许跨域
    #[cfg(debug_assertions)]
    let router = router.layer(CorsLayer::permissive());

    router.with_state(state)
}
