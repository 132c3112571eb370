pub mod bookings;
pub mod classes;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use std::sync::Arc;

use crate::error::StudioError;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(classes::routes())
        .merge(bookings::routes())
}

/// An error as the client sees it: a status code and `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    pub fn bad_request(message: &'static str) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message }
    }
}

impl From<StudioError> for ApiError {
    fn from(err: StudioError) -> Self {
        let (status, message) = match &err {
            StudioError::Validation(_) => (StatusCode::BAD_REQUEST, "Missing required fields"),
            StudioError::NotFound(_) => (StatusCode::NOT_FOUND, "Fitness class not found"),
            StudioError::Capacity(_) => (StatusCode::BAD_REQUEST, "No available slots"),
            StudioError::UnknownZone(_) => (StatusCode::BAD_REQUEST, "Invalid timezone"),
            StudioError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error occurred"),
        };
        if status.is_server_error() {
            tracing::error!("request failed: {}", err);
        } else {
            tracing::debug!("request rejected: {}", err);
        }
        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}
