use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Bookings are never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: i64,
    pub class_id: i64,
    pub client_name: String,
    pub client_email: String,
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub class_id: i64,
    pub client_name: String,
    pub client_email: String,
}
