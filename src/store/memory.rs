use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{ReservationTx, StudioStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{BookingRecord, ClassRecord, NewBooking, NewClass};

#[derive(Debug, Default)]
struct MemoryState {
    classes: BTreeMap<i64, ClassRecord>,
    bookings: Vec<BookingRecord>,
    next_class_id: i64,
    next_booking_id: i64,
}

/// Process-local store. A reservation holds the state lock from `begin` until
/// it commits or is dropped, so reservations are fully serialized.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_next_commit: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next reservation commit fail with a backend error.
    #[cfg(any(test, feature = "test-util"))]
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    #[cfg(any(test, feature = "test-util"))]
    pub async fn booking_count(&self) -> usize {
        self.state.lock().await.bookings.len()
    }
}

#[async_trait]
impl StudioStore for MemoryStore {
    async fn list_classes(&self) -> StoreResult<Vec<ClassRecord>> {
        Ok(self.state.lock().await.classes.values().cloned().collect())
    }

    async fn get_class(&self, id: i64) -> StoreResult<Option<ClassRecord>> {
        Ok(self.state.lock().await.classes.get(&id).cloned())
    }

    async fn count_classes(&self) -> StoreResult<i64> {
        Ok(self.state.lock().await.classes.len() as i64)
    }

    async fn insert_class(&self, class: NewClass) -> StoreResult<ClassRecord> {
        if class.available_slots < 0 {
            return Err(StoreError::Backend("available_slots must not be negative".to_string()));
        }
        let mut state = self.state.lock().await;
        state.next_class_id += 1;
        let record = ClassRecord {
            id: state.next_class_id,
            name: class.name,
            scheduled_at: class.scheduled_at,
            instructor: class.instructor,
            available_slots: class.available_slots,
        };
        state.classes.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list_bookings_by_email(&self, email: &str) -> StoreResult<Vec<BookingRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .bookings
            .iter()
            .filter(|b| b.client_email == email)
            .cloned()
            .collect())
    }

    async fn begin(&self) -> StoreResult<Box<dyn ReservationTx>> {
        let guard = self.state.clone().lock_owned().await;
        Ok(Box::new(MemoryTx {
            guard,
            fail_commit: self.fail_next_commit.swap(false, Ordering::SeqCst),
            decrements: Vec::new(),
            bookings: Vec::new(),
        }))
    }
}

struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    fail_commit: bool,
    // staged until commit
    decrements: Vec<i64>,
    bookings: Vec<BookingRecord>,
}

impl MemoryTx {
    fn remaining(&self, class_id: i64) -> Option<i32> {
        let taken = self.decrements.iter().filter(|id| **id == class_id).count() as i32;
        self.guard
            .classes
            .get(&class_id)
            .map(|class| class.available_slots - taken)
    }
}

#[async_trait]
impl ReservationTx for MemoryTx {
    async fn decrement_slot(&mut self, class_id: i64) -> StoreResult<()> {
        match self.remaining(class_id) {
            Some(slots) if slots > 0 => {
                self.decrements.push(class_id);
                Ok(())
            }
            _ => Err(StoreError::SlotsExhausted(class_id)),
        }
    }

    async fn create_booking(&mut self, booking: NewBooking) -> StoreResult<BookingRecord> {
        if !self.guard.classes.contains_key(&booking.class_id) {
            return Err(StoreError::ClassNotFound(booking.class_id));
        }
        let record = BookingRecord {
            id: self.guard.next_booking_id + self.bookings.len() as i64 + 1,
            class_id: booking.class_id,
            client_name: booking.client_name,
            client_email: booking.client_email,
        };
        self.bookings.push(record.clone());
        Ok(record)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        if self.fail_commit {
            return Err(StoreError::Backend("simulated commit failure".to_string()));
        }
        let MemoryTx { mut guard, decrements, bookings, .. } = *self;
        for class_id in decrements {
            if let Some(class) = guard.classes.get_mut(&class_id) {
                class.available_slots -= 1;
            }
        }
        guard.next_booking_id += bookings.len() as i64;
        guard.bookings.extend(bookings);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn yoga(slots: i32) -> NewClass {
        NewClass {
            name: "Yoga".to_string(),
            scheduled_at: NaiveDate::from_ymd_opt(2025, 6, 10)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            instructor: "Alice".to_string(),
            available_slots: slots,
        }
    }

    fn booking(class_id: i64, email: &str) -> NewBooking {
        NewBooking {
            class_id,
            client_name: "Dana".to_string(),
            client_email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_committed_reservation_is_visible() {
        let store = MemoryStore::new();
        let class = store.insert_class(yoga(2)).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.decrement_slot(class.id).await.unwrap();
        let created = tx.create_booking(booking(class.id, "dana@example.com")).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(store.get_class(class.id).await.unwrap().unwrap().available_slots, 1);
        let listed = store.list_bookings_by_email("dana@example.com").await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_dropped_transaction_leaves_no_trace() {
        let store = MemoryStore::new();
        let class = store.insert_class(yoga(1)).await.unwrap();

        {
            let mut tx = store.begin().await.unwrap();
            tx.decrement_slot(class.id).await.unwrap();
            tx.create_booking(booking(class.id, "dana@example.com")).await.unwrap();
        }

        assert_eq!(store.get_class(class.id).await.unwrap().unwrap().available_slots, 1);
        assert_eq!(store.booking_count().await, 0);
    }

    #[tokio::test]
    async fn test_decrement_stops_at_zero_within_one_transaction() {
        let store = MemoryStore::new();
        let class = store.insert_class(yoga(1)).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.decrement_slot(class.id).await.unwrap();
        let second = tx.decrement_slot(class.id).await;
        assert!(matches!(second, Err(StoreError::SlotsExhausted(id)) if id == class.id));
    }

    #[tokio::test]
    async fn test_decrement_unknown_class_conflicts() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        assert!(matches!(tx.decrement_slot(42).await, Err(StoreError::SlotsExhausted(42))));
    }

    #[tokio::test]
    async fn test_failed_commit_discards_staged_work() {
        let store = MemoryStore::new();
        let class = store.insert_class(yoga(3)).await.unwrap();
        store.fail_next_commit();

        let mut tx = store.begin().await.unwrap();
        tx.decrement_slot(class.id).await.unwrap();
        tx.create_booking(booking(class.id, "dana@example.com")).await.unwrap();
        assert!(matches!(tx.commit().await, Err(StoreError::Backend(_))));

        assert_eq!(store.get_class(class.id).await.unwrap().unwrap().available_slots, 3);
        assert_eq!(store.booking_count().await, 0);
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let store = MemoryStore::new();
        let class = store.insert_class(yoga(5)).await.unwrap();
        let mut tx = store.begin().await.unwrap();
        tx.decrement_slot(class.id).await.unwrap();
        tx.create_booking(booking(class.id, "Dana@Example.com")).await.unwrap();
        tx.commit().await.unwrap();

        assert!(store.list_bookings_by_email("dana@example.com").await.unwrap().is_empty());
        assert_eq!(store.list_bookings_by_email("Dana@Example.com").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_negative_capacity_is_rejected() {
        let store = MemoryStore::new();
        assert!(store.insert_class(yoga(-1)).await.is_err());
        assert_eq!(store.count_classes().await.unwrap(), 0);
    }
}
