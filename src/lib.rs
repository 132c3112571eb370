pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

use axum::{routing::get, Json, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use services::StudioClock;
use store::StudioStore;

// Shared state for every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StudioStore>,
    pub clock: StudioClock,
}

impl AppState {
    pub fn new(store: Arc<dyn StudioStore>, clock: StudioClock) -> Arc<Self> {
        Arc::new(Self { store, clock })
    }
}

/// The full HTTP application, ready to serve.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async {
            Json(serde_json::json!({ "message": "Fitness Studio Booking API is running" }))
        }))
        .route("/health", get(|| async { "OK" }))
        .merge(controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
