use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A scheduled class. `scheduled_at` is studio-local wall-clock time with no
/// offset attached; see `services::presenter` for how it is rendered.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ClassRecord {
    pub id: i64,
    pub name: String,
    pub scheduled_at: NaiveDateTime,
    pub instructor: String,
    pub available_slots: i32,
}

impl ClassRecord {
    pub fn has_capacity(&self) -> bool {
        self.available_slots > 0
    }
}

#[derive(Debug, Clone)]
pub struct NewClass {
    pub name: String,
    pub scheduled_at: NaiveDateTime,
    pub instructor: String,
    pub available_slots: i32,
}
