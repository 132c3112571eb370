use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::error::{Result, StudioError};
use crate::models::{BookingRecord, NewBooking};
use crate::store::{ReservationTx, StudioStore};

/// A reservation request as it arrives from a client; every field may be absent.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ReservationRequest {
    #[validate(required, custom(function = "not_zero"))]
    pub class_id: Option<i64>,
    #[validate(required, length(max = 100), custom(function = "not_blank"))]
    pub client_name: Option<String>,
    #[validate(required, length(max = 100), custom(function = "not_blank"))]
    pub client_email: Option<String>,
}

// Zero is never issued as an id and counts as absent; other unknown ids are
// left for the catalog lookup to reject.
fn not_zero(id: i64) -> std::result::Result<(), ValidationError> {
    if id == 0 {
        return Err(ValidationError::new("zero"));
    }
    Ok(())
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Books one slot in a class.
///
/// The capacity pre-check only produces a cheap early answer; the
/// authoritative check is the conditional decrement inside the transaction,
/// which is what keeps two racing requests from both taking the last slot.
pub async fn reserve_slot(store: &dyn StudioStore, request: ReservationRequest) -> Result<BookingRecord> {
    request.validate()?;
    let ReservationRequest {
        class_id: Some(class_id),
        client_name: Some(client_name),
        client_email: Some(client_email),
    } = request
    else {
        return Err(StudioError::Validation("missing required fields".to_string()));
    };

    let class = store
        .get_class(class_id)
        .await?
        .ok_or(StudioError::NotFound(class_id))?;
    if !class.has_capacity() {
        return Err(StudioError::Capacity(class_id));
    }

    let mut tx = store.begin().await?;

    if let Err(e) = tx.decrement_slot(class_id).await {
        return Err(abort(tx, e.into()).await);
    }
    let booking = NewBooking { class_id, client_name, client_email };
    let record = match tx.create_booking(booking).await {
        Ok(record) => record,
        Err(e) => return Err(abort(tx, e.into()).await),
    };

    tx.commit().await?;
    Ok(record)
}

async fn abort(tx: Box<dyn ReservationTx>, err: StudioError) -> StudioError {
    // rollback errors are dropped; `err` is what the caller acts on
    let _ = tx.rollback().await;
    err
}
