//! Storage seam for the class catalog and the booking ledger.
//!
//! Reads go straight through [`StudioStore`]. The only write path that touches
//! both record sets, slot reservation, runs inside a [`ReservationTx`] obtained
//! from [`StudioStore::begin`]: its effects become visible on `commit` and are
//! discarded on `rollback` or drop.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::{BookingRecord, ClassRecord, NewBooking, NewClass};

pub use memory::MemoryStore;
pub use postgres::PgStudioStore;

#[async_trait]
pub trait StudioStore: Send + Sync {
    /// All classes ordered by id.
    async fn list_classes(&self) -> StoreResult<Vec<ClassRecord>>;

    async fn get_class(&self, id: i64) -> StoreResult<Option<ClassRecord>>;

    async fn count_classes(&self) -> StoreResult<i64>;

    /// Catalog seeding only; there is no public class-creation API.
    async fn insert_class(&self, class: NewClass) -> StoreResult<ClassRecord>;

    /// Bookings whose email matches exactly (case-sensitive), ordered by id.
    async fn list_bookings_by_email(&self, email: &str) -> StoreResult<Vec<BookingRecord>>;

    /// Opens a reservation unit of work.
    async fn begin(&self) -> StoreResult<Box<dyn ReservationTx>>;
}

#[async_trait]
pub trait ReservationTx: Send {
    /// Takes one slot from the class. Fails with `SlotsExhausted` when the class
    /// is missing or already at zero, leaving the counter untouched.
    async fn decrement_slot(&mut self, class_id: i64) -> StoreResult<()>;

    /// Appends a booking. Capacity is not re-checked here.
    async fn create_booking(&mut self, booking: NewBooking) -> StoreResult<BookingRecord>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;

    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}
