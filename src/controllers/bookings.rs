use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::ApiError;
use crate::error::StudioError;
use crate::services::reservation::{reserve_slot, ReservationRequest};
use crate::services::schedule::{self, BookingView};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/book", post(book_class))
        .route("/bookings", get(get_bookings))
}

/* ---------- BOOK ---------- */

// POST /book
async fn book_class(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!("book_class rejected body: {}", rejection);
        ApiError::bad_request("Missing JSON body")
    })?;
    if is_empty_body(&body) {
        return Err(ApiError::bad_request("Missing JSON body"));
    }
    let request: ReservationRequest = serde_json::from_value(body).map_err(|e| {
        tracing::debug!("book_class invalid fields: {}", e);
        ApiError::bad_request("Missing required fields")
    })?;

    let booking = reserve_slot(state.store.as_ref(), request).await?;
    tracing::info!(
        "Booking successful for class_id={} by {}",
        booking.class_id,
        booking.client_email
    );

    Ok((StatusCode::OK, Json(serde_json::json!({ "message": "Booking successful" }))))
}

// Anything that is not a non-empty JSON object carries no booking.
fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Object(fields) => fields.is_empty(),
        _ => true,
    }
}

/* ---------- BOOKINGS ---------- */

#[derive(Debug, Deserialize)]
struct BookingsQuery {
    email: Option<String>,
    timezone: Option<String>,
}

// GET /bookings?email=...
async fn get_bookings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingView>>, ApiError> {
    let bookings = schedule::list_bookings(
        state.store.as_ref(),
        &state.clock,
        params.email.as_deref(),
        params.timezone.as_deref(),
    )
    .await
    .map_err(|e| match e {
        StudioError::Validation(_) => ApiError::bad_request("Missing email query parameter"),
        other => other.into(),
    })?;

    Ok(Json(bookings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_bodies() {
        for body in [json!({}), json!(null), json!([]), json!(false), json!(""), json!([1]), json!(5)] {
            assert!(is_empty_body(&body), "{body}");
        }
        assert!(!is_empty_body(&json!({ "class_id": 1 })));
    }
}
