use config::Config;
use database::EntityStore;
use std::sync::Arc;

pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod onboarding;
pub mod utils;
pub mod validation;

pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    pub config: Config,
}
