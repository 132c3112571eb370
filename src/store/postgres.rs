use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use super::{ReservationTx, StudioStore};
use crate::database::Database;
use crate::error::{StoreError, StoreResult};
use crate::models::{BookingRecord, ClassRecord, NewBooking, NewClass};

const CLASS_COLUMNS: &str = "id, name, scheduled_at, instructor, available_slots";

#[derive(Clone)]
pub struct PgStudioStore {
    db: Database,
    statement_timeout_ms: u64,
}

impl PgStudioStore {
    pub fn new(db: Database, statement_timeout_ms: u64) -> Self {
        Self { db, statement_timeout_ms }
    }
}

#[async_trait]
impl StudioStore for PgStudioStore {
    async fn list_classes(&self) -> StoreResult<Vec<ClassRecord>> {
        let classes = sqlx::query_as::<_, ClassRecord>(&format!(
            "SELECT {CLASS_COLUMNS} FROM fitness_classes ORDER BY id"
        ))
        .fetch_all(&self.db.pool)
        .await?;
        Ok(classes)
    }

    async fn get_class(&self, id: i64) -> StoreResult<Option<ClassRecord>> {
        let class = sqlx::query_as::<_, ClassRecord>(&format!(
            "SELECT {CLASS_COLUMNS} FROM fitness_classes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await?;
        Ok(class)
    }

    async fn count_classes(&self) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM fitness_classes")
            .fetch_one(&self.db.pool)
            .await?;
        Ok(count)
    }

    async fn insert_class(&self, class: NewClass) -> StoreResult<ClassRecord> {
        let record = sqlx::query_as::<_, ClassRecord>(&format!(
            "INSERT INTO fitness_classes (name, scheduled_at, instructor, available_slots)
             VALUES ($1, $2, $3, $4)
             RETURNING {CLASS_COLUMNS}"
        ))
        .bind(class.name)
        .bind(class.scheduled_at)
        .bind(class.instructor)
        .bind(class.available_slots)
        .fetch_one(&self.db.pool)
        .await?;
        Ok(record)
    }

    async fn list_bookings_by_email(&self, email: &str) -> StoreResult<Vec<BookingRecord>> {
        let bookings = sqlx::query_as::<_, BookingRecord>(
            "SELECT id, class_id, client_name, client_email
             FROM bookings
             WHERE client_email = $1
             ORDER BY id",
        )
        .bind(email)
        .fetch_all(&self.db.pool)
        .await?;
        Ok(bookings)
    }

    async fn begin(&self) -> StoreResult<Box<dyn ReservationTx>> {
        let mut tx = self.db.pool.begin().await?;

        // Bounds lock waits as well as execution; scoped to this transaction.
        sqlx::query("SELECT set_config('statement_timeout', $1, true)")
            .bind(self.statement_timeout_ms.to_string())
            .execute(&mut *tx)
            .await?;

        Ok(Box::new(PgReservationTx { tx }))
    }
}

struct PgReservationTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ReservationTx for PgReservationTx {
    async fn decrement_slot(&mut self, class_id: i64) -> StoreResult<()> {
        // The row lock taken here makes concurrent reservations on the same
        // class queue behind each other; a loser re-evaluates the predicate.
        let updated = sqlx::query_scalar::<_, i64>(
            "UPDATE fitness_classes
             SET available_slots = available_slots - 1
             WHERE id = $1 AND available_slots > 0
             RETURNING id",
        )
        .bind(class_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        match updated {
            Some(_) => Ok(()),
            None => Err(StoreError::SlotsExhausted(class_id)),
        }
    }

    async fn create_booking(&mut self, booking: NewBooking) -> StoreResult<BookingRecord> {
        let class_id = booking.class_id;
        sqlx::query_as::<_, BookingRecord>(
            "INSERT INTO bookings (class_id, client_name, client_email)
             VALUES ($1, $2, $3)
             RETURNING id, class_id, client_name, client_email",
        )
        .bind(booking.class_id)
        .bind(booking.client_name)
        .bind(booking.client_email)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                StoreError::ClassNotFound(class_id)
            }
            other => other.into(),
        })
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
