use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    booking::{event::CreateBooking, Booking, BookingHistory},
    id::SlotId,
};
use kernel::repository::booking::BookingRepository;
use shared::error::{AppError, AppResult};
use sqlx::PgConnection;

use crate::database::{
    model::booking::{BookingHistoryRow, BookingRow},
    ConnectionPool,
};
use crate::repository::catalog::{find_capacity_per_slot, slot_exists_in_event};

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    #[tracing::instrument(
        skip(self, event),
        fields(event_id = %event.event_id, slot_id = %event.slot_id)
    )]
    async fn admit(&self, event: CreateBooking) -> AppResult<Booking> {
        let mut tx = self.db.begin().await?;

        self.set_transaction_read_committed(&mut tx).await?;

        // Every early return below drops `tx`, which rolls the transaction
        // back, so a rejected request never leaves anything behind.
        {
            //
            // ① The event must exist; its capacity is fixed at creation.
            //
            let capacity = find_capacity_per_slot(&mut *tx, event.event_id)
                .await?
                .ok_or_else(|| {
                    AppError::EntityNotFound(format!("event {} not found", event.event_id))
                })?;

            //
            // ② The slot must belong to the event. The slot row stays locked
            //    until commit, so ③ to ⑤ run one admission at a time per slot.
            //
            if !slot_exists_in_event(&mut *tx, event.slot_id, event.event_id, true).await? {
                tracing::debug!("slot does not belong to event");
                return Err(AppError::SlotMismatch(format!(
                    "slot {} does not belong to event {}",
                    event.slot_id, event.event_id
                )));
            }

            //
            // ③ The same attendee may hold at most one booking per slot.
            //
            if find_booking(&mut *tx, event.slot_id, &event.email)
                .await?
                .is_some()
            {
                tracing::debug!("attendee already holds this slot");
                return Err(AppError::DuplicateBooking);
            }

            //
            // ④ The slot must still have room.
            //
            let booked = count_bookings(&mut *tx, event.slot_id).await?;
            if booked >= i64::from(capacity) {
                tracing::debug!(booked, capacity, "slot is full");
                return Err(AppError::CapacityExceeded);
            }
        }

        //
        // ⑤ Append to the ledger.
        //
        let booking = append_booking(&mut *tx, &event).await?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        tracing::info!(booking_id = %booking.booking_id, "booking admitted");
        Ok(booking)
    }

    async fn count_by_slot(&self, slot_id: SlotId) -> AppResult<i64> {
        let mut conn = self
            .db
            .inner_ref()
            .acquire()
            .await
            .map_err(AppError::SpecificOperationError)?;
        count_bookings(&mut *conn, slot_id).await
    }

    async fn find_by_slot_and_email(
        &self,
        slot_id: SlotId,
        email: &str,
    ) -> AppResult<Option<Booking>> {
        let mut conn = self
            .db
            .inner_ref()
            .acquire()
            .await
            .map_err(AppError::SpecificOperationError)?;
        find_booking(&mut *conn, slot_id, email).await
    }

    async fn find_history_by_email(&self, email: &str) -> AppResult<Vec<BookingHistory>> {
        sqlx::query_as::<_, BookingHistoryRow>(
            r#"
                SELECT
                b.booking_id,
                b.event_id,
                e.title AS event_title,
                e.description AS event_description,
                b.slot_id,
                s.slot_time,
                b.created_at
                FROM bookings AS b
                INNER JOIN event_slots AS s ON b.slot_id = s.slot_id
                INNER JOIN events AS e ON b.event_id = e.event_id
                WHERE b.email = $1
                ORDER BY b.created_at DESC, b.booking_id DESC
            "#,
        )
        .bind(email)
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(BookingHistory::from).collect())
        .map_err(AppError::SpecificOperationError)
    }
}

impl BookingRepositoryImpl {
    // The slot lock only orders admissions if each statement that follows it
    // takes a fresh snapshot. Under REPEATABLE READ or SERIALIZABLE the
    // snapshot predates the lock and the count would miss the bookings of
    // the previous lock holder.
    async fn set_transaction_read_committed(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL READ COMMITTED")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }
}

async fn count_bookings(conn: &mut PgConnection, slot_id: SlotId) -> AppResult<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE slot_id = $1")
        .bind(slot_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(AppError::SpecificOperationError)
}

async fn find_booking(
    conn: &mut PgConnection,
    slot_id: SlotId,
    email: &str,
) -> AppResult<Option<Booking>> {
    sqlx::query_as::<_, BookingRow>(
        r#"
            SELECT booking_id, event_id, slot_id, name, email, created_at
            FROM bookings
            WHERE slot_id = $1 AND email = $2
        "#,
    )
    .bind(slot_id)
    .bind(email)
    .fetch_optional(&mut *conn)
    .await
    .map(|row| row.map(Booking::from))
    .map_err(AppError::SpecificOperationError)
}

async fn append_booking(conn: &mut PgConnection, event: &CreateBooking) -> AppResult<Booking> {
    sqlx::query_as::<_, BookingRow>(
        r#"
            INSERT INTO bookings (event_id, slot_id, name, email)
            VALUES ($1, $2, $3, $4)
            RETURNING booking_id, event_id, slot_id, name, email, created_at
        "#,
    )
    .bind(event.event_id)
    .bind(event.slot_id)
    .bind(&event.name)
    .bind(&event.email)
    .fetch_one(&mut *conn)
    .await
    .map(Booking::from)
    .map_err(|e| match e {
        // Constraint backstops for writers that bypass the slot lock.
        sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::DuplicateBooking,
        sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
            AppError::SlotMismatch(format!(
                "slot {} does not belong to event {}",
                event.slot_id, event.event_id
            ))
        }
        e => AppError::SpecificOperationError(e),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use kernel::model::{
        catalog::event::CreateEvent,
        id::{EventId, SlotId},
    };
    use kernel::repository::catalog::CatalogRepository;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::repository::catalog::CatalogRepositoryImpl;

    async fn seed_event(
        db: &ConnectionPool,
        capacity: i32,
        slots: usize,
    ) -> anyhow::Result<(EventId, Vec<SlotId>)> {
        let catalog = CatalogRepositoryImpl::new(db.clone());
        let times = (0..slots)
            .map(|i| Utc.with_ymd_and_hms(2026, 12, 1, 9 + i as u32, 0, 0).unwrap())
            .collect();
        let event_id = catalog
            .create(CreateEvent::new("Workshop".into(), None, capacity, times))
            .await?;
        let slot_ids = catalog
            .find_by_id(event_id)
            .await?
            .unwrap()
            .slots
            .into_iter()
            .map(|s| s.slot_id)
            .collect();
        Ok((event_id, slot_ids))
    }

    fn request(event_id: EventId, slot_id: SlotId, who: &str) -> CreateBooking {
        CreateBooking::new(event_id, slot_id, who.to_uppercase(), format!("{who}@x.com"))
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_admit_records_booking(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = BookingRepositoryImpl::new(db.clone());
        let (event_id, slots) = seed_event(&db, 2, 1).await?;

        let booking = repo.admit(request(event_id, slots[0], "a")).await?;
        assert_eq!(booking.event_id, event_id);
        assert_eq!(booking.slot_id, slots[0]);
        assert_eq!(booking.name, "A");
        assert_eq!(booking.email, "a@x.com");

        assert_eq!(repo.count_by_slot(slots[0]).await?, 1);
        let found = repo.find_by_slot_and_email(slots[0], "a@x.com").await?;
        assert_eq!(found, Some(booking));
        assert!(repo
            .find_by_slot_and_email(slots[0], "b@x.com")
            .await?
            .is_none());
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_sequential_scenario(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = BookingRepositoryImpl::new(db.clone());
        let (event_id, slots) = seed_event(&db, 2, 1).await?;
        let s = slots[0];

        assert!(repo.admit(request(event_id, s, "a")).await.is_ok());
        assert!(matches!(
            repo.admit(request(event_id, s, "a")).await,
            Err(AppError::DuplicateBooking)
        ));
        assert!(repo.admit(request(event_id, s, "b")).await.is_ok());
        assert!(matches!(
            repo.admit(request(event_id, s, "c")).await,
            Err(AppError::CapacityExceeded)
        ));

        assert_eq!(repo.count_by_slot(s).await?, 2);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_is_reported_before_capacity(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = BookingRepositoryImpl::new(db.clone());
        let (event_id, slots) = seed_event(&db, 1, 1).await?;

        repo.admit(request(event_id, slots[0], "a")).await?;
        // the slot is now full too, but the attendee already holds it
        assert!(matches!(
            repo.admit(request(event_id, slots[0], "a")).await,
            Err(AppError::DuplicateBooking)
        ));
        assert_eq!(repo.count_by_slot(slots[0]).await?, 1);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_capacity_is_per_slot(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = BookingRepositoryImpl::new(db.clone());
        let (event_id, slots) = seed_event(&db, 1, 2).await?;

        repo.admit(request(event_id, slots[0], "a")).await?;
        repo.admit(request(event_id, slots[1], "a")).await?;
        repo.admit(request(event_id, slots[1], "b"))
            .await
            .expect_err("second slot is full");

        assert_eq!(repo.count_by_slot(slots[0]).await?, 1);
        assert_eq!(repo.count_by_slot(slots[1]).await?, 1);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_slot_of_other_event_is_rejected(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = BookingRepositoryImpl::new(db.clone());
        let (_e1, s1) = seed_event(&db, 5, 1).await?;
        let (e2, _s2) = seed_event(&db, 5, 1).await?;

        let res = repo.admit(request(e2, s1[0], "a")).await;
        assert!(matches!(res, Err(AppError::SlotMismatch(_))));

        let res = repo.admit(request(e2, SlotId::from(777_777), "a")).await;
        assert!(matches!(res, Err(AppError::SlotMismatch(_))));

        assert_eq!(repo.count_by_slot(s1[0]).await?, 0);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unknown_event_is_not_found(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = BookingRepositoryImpl::new(db.clone());
        let (_event_id, slots) = seed_event(&db, 5, 1).await?;

        let res = repo.admit(request(EventId::from(424_242), slots[0], "a")).await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_history_newest_first(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = BookingRepositoryImpl::new(db.clone());
        let (event_id, slots) = seed_event(&db, 3, 2).await?;

        let first = repo.admit(request(event_id, slots[0], "a")).await?;
        let second = repo.admit(request(event_id, slots[1], "a")).await?;
        repo.admit(request(event_id, slots[1], "b")).await?;

        let history = repo.find_history_by_email("a@x.com").await?;
        assert_eq!(
            history.iter().map(|h| h.booking_id).collect::<Vec<_>>(),
            vec![second.booking_id, first.booking_id]
        );
        assert_eq!(history[0].event_title, "Workshop");
        assert_eq!(history[0].slot_id, slots[1]);

        assert!(repo.find_history_by_email("nobody@x.com").await?.is_empty());
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_deleting_event_cascades(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool.clone());
        let repo = BookingRepositoryImpl::new(db.clone());
        let (event_id, slots) = seed_event(&db, 3, 1).await?;
        repo.admit(request(event_id, slots[0], "a")).await?;

        sqlx::query("DELETE FROM events WHERE event_id = $1")
            .bind(event_id)
            .execute(&pool)
            .await?;

        assert_eq!(repo.count_by_slot(slots[0]).await?, 0);
        let slots_left: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM event_slots")
            .fetch_one(&pool)
            .await?;
        assert_eq!(slots_left, 0);
        Ok(())
    }
}
