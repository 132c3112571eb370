use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::presenter::{parse_zone, StudioClock};
use crate::error::{Result, StudioError};
use crate::models::ClassRecord;
use crate::store::StudioStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassView {
    pub id: i64,
    pub name: String,
    pub datetime: String,
    pub instructor: String,
    pub available_slots: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingView {
    pub booking_id: i64,
    pub class_id: i64,
    pub class_name: String,
    pub datetime: String,
    pub instructor: String,
    pub client_name: String,
    pub client_email: String,
}

/// Every class, with its time rendered in `timezone` (studio zone if `None`).
/// The zone is resolved before the store is touched.
pub async fn list_classes(
    store: &dyn StudioStore,
    clock: &StudioClock,
    timezone: Option<&str>,
) -> Result<Vec<ClassView>> {
    let zone = match timezone {
        Some(name) => parse_zone(name)?,
        None => clock.zone(),
    };

    let classes = store.list_classes().await?;
    Ok(classes
        .into_iter()
        .map(|class| ClassView {
            datetime: clock.present_in(class.scheduled_at, zone),
            id: class.id,
            name: class.name,
            instructor: class.instructor,
            available_slots: class.available_slots,
        })
        .collect())
}

/// Bookings made under `email`, each joined with its class.
pub async fn list_bookings(
    store: &dyn StudioStore,
    clock: &StudioClock,
    email: Option<&str>,
    timezone: Option<&str>,
) -> Result<Vec<BookingView>> {
    let email = match email {
        Some(email) if !email.trim().is_empty() => email,
        _ => return Err(StudioError::Validation("email is required".to_string())),
    };
    let zone = match timezone {
        Some(name) => parse_zone(name)?,
        None => clock.zone(),
    };

    let bookings = store.list_bookings_by_email(email).await?;

    let mut classes: HashMap<i64, ClassRecord> = HashMap::new();
    let mut views = Vec::with_capacity(bookings.len());
    for booking in bookings {
        if !classes.contains_key(&booking.class_id) {
            let class = store
                .get_class(booking.class_id)
                .await?
                .ok_or(StudioError::NotFound(booking.class_id))?;
            classes.insert(class.id, class);
        }
        let class = &classes[&booking.class_id];
        views.push(BookingView {
            booking_id: booking.id,
            class_id: class.id,
            class_name: class.name.clone(),
            datetime: clock.present_in(class.scheduled_at, zone),
            instructor: class.instructor.clone(),
            client_name: booking.client_name,
            client_email: booking.client_email,
        });
    }
    Ok(views)
}
