use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::ApiError;
use crate::services::schedule::{self, ClassView};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/classes", get(get_classes))
}

#[derive(Debug, Deserialize)]
struct ClassesQuery {
    timezone: Option<String>,
}

// GET /classes?timezone=America/New_York
async fn get_classes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ClassesQuery>,
) -> Result<Json<Vec<ClassView>>, ApiError> {
    let classes = schedule::list_classes(
        state.store.as_ref(),
        &state.clock,
        params.timezone.as_deref(),
    )
    .await?;
    Ok(Json(classes))
}
