use std::collections::HashMap;

use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    catalog::{event::CreateEvent, Event, Slot},
    id::{EventId, SlotId},
};
use kernel::repository::catalog::CatalogRepository;
use shared::error::{AppError, AppResult};
use sqlx::PgConnection;

use crate::database::{
    model::catalog::{EventRow, SlotRow},
    ConnectionPool,
};

#[derive(new)]
pub struct CatalogRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl CatalogRepository for CatalogRepositoryImpl {
    async fn create(&self, event: CreateEvent) -> AppResult<EventId> {
        let mut tx = self.db.begin().await?;

        let event_id: EventId = sqlx::query_scalar(
            r#"
                INSERT INTO events (title, description, capacity_per_slot)
                VALUES ($1, $2, $3)
                RETURNING event_id
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.capacity_per_slot)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        // All slots go in with a single statement; the transaction keeps a
        // half-populated event from ever being visible.
        let res = sqlx::query(
            r#"
                INSERT INTO event_slots (event_id, slot_time)
                SELECT $1, slot_time FROM UNNEST($2::timestamptz[]) AS t (slot_time)
            "#,
        )
        .bind(event_id)
        .bind(&event.slot_times)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() != event.slot_times.len() as u64 {
            return Err(AppError::NoRowsAffectedError(format!(
                "expected {} slots for event {event_id}, inserted {}",
                event.slot_times.len(),
                res.rows_affected()
            )));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        tracing::info!(%event_id, slots = event.slot_times.len(), "event created");
        Ok(event_id)
    }

    async fn find_all(&self) -> AppResult<Vec<Event>> {
        let events: Vec<EventRow> = sqlx::query_as(
            r#"
                SELECT event_id, title, description, capacity_per_slot, created_at
                FROM events
                ORDER BY created_at ASC, event_id ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if events.is_empty() {
            return Ok(Vec::new());
        }

        let event_ids: Vec<EventId> = events.iter().map(|e| e.event_id).collect();
        let slots: Vec<SlotRow> = sqlx::query_as(
            r#"
                SELECT slot_id, event_id, slot_time
                FROM event_slots
                WHERE event_id = ANY($1)
                ORDER BY slot_time ASC, slot_id ASC
            "#,
        )
        .bind(event_ids.iter().map(|id| id.raw()).collect::<Vec<i64>>())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let mut slots_by_event: HashMap<EventId, Vec<Slot>> = HashMap::new();
        for row in slots {
            slots_by_event
                .entry(row.event_id)
                .or_default()
                .push(Slot::from(row));
        }

        Ok(events
            .into_iter()
            .map(|row| {
                let slots = slots_by_event.remove(&row.event_id).unwrap_or_default();
                row.into_event(slots)
            })
            .collect())
    }

    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>> {
        let row: Option<EventRow> = sqlx::query_as(
            r#"
                SELECT event_id, title, description, capacity_per_slot, created_at
                FROM events
                WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let slots: Vec<SlotRow> = sqlx::query_as(
            r#"
                SELECT slot_id, event_id, slot_time
                FROM event_slots
                WHERE event_id = $1
                ORDER BY slot_time ASC, slot_id ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(Some(
            row.into_event(slots.into_iter().map(Slot::from).collect()),
        ))
    }

    async fn slot_belongs_to_event(&self, slot_id: SlotId, event_id: EventId) -> AppResult<bool> {
        let mut conn = self
            .db
            .inner_ref()
            .acquire()
            .await
            .map_err(AppError::SpecificOperationError)?;
        slot_exists_in_event(&mut *conn, slot_id, event_id, false).await
    }
}

// Helpers shared with the admission path, which runs them on its own
// transaction.

pub(crate) async fn find_capacity_per_slot(
    conn: &mut PgConnection,
    event_id: EventId,
) -> AppResult<Option<i32>> {
    sqlx::query_scalar("SELECT capacity_per_slot FROM events WHERE event_id = $1")
        .bind(event_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(AppError::SpecificOperationError)
}

/// Checks that `slot_id` is one of `event_id`'s slots. With `lock` set the
/// slot row is locked `FOR UPDATE` until the surrounding transaction ends,
/// which serializes every admission targeting that slot and leaves other
/// slots untouched.
pub(crate) async fn slot_exists_in_event(
    conn: &mut PgConnection,
    slot_id: SlotId,
    event_id: EventId,
    lock: bool,
) -> AppResult<bool> {
    let sql = if lock {
        "SELECT slot_id FROM event_slots WHERE slot_id = $1 AND event_id = $2 FOR UPDATE"
    } else {
        "SELECT slot_id FROM event_slots WHERE slot_id = $1 AND event_id = $2"
    };

    let row: Option<SlotId> = sqlx::query_scalar(sql)
        .bind(slot_id)
        .bind(event_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(AppError::SpecificOperationError)?;

    Ok(row.is_some())
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 11, 2, hour, 0, 0).unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_event(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = CatalogRepositoryImpl::new(ConnectionPool::new(pool));

        let event = CreateEvent::new(
            "Rust meetup".into(),
            Some("Lightning talks".into()),
            3,
            // deliberately out of order
            vec![at(15), at(9), at(12)],
        );
        let event_id = repo.create(event).await?;

        let res = repo.find_by_id(event_id).await?;
        assert!(res.is_some());

        let Event {
            event_id: id,
            title,
            description,
            capacity_per_slot,
            slots,
            ..
        } = res.unwrap();
        assert_eq!(id, event_id);
        assert_eq!(title, "Rust meetup");
        assert_eq!(description.as_deref(), Some("Lightning talks"));
        assert_eq!(capacity_per_slot, 3);
        assert_eq!(
            slots.iter().map(|s| s.slot_time).collect::<Vec<_>>(),
            vec![at(9), at(12), at(15)]
        );
        assert!(slots.iter().all(|s| s.event_id == event_id));
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_find_all_in_creation_order(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = CatalogRepositoryImpl::new(ConnectionPool::new(pool));

        let first = repo
            .create(CreateEvent::new("first".into(), None, 1, vec![at(10)]))
            .await?;
        let second = repo
            .create(CreateEvent::new("second".into(), None, 2, vec![at(11), at(12)]))
            .await?;

        let events = repo.find_all().await?;
        assert_eq!(
            events.iter().map(|e| e.event_id).collect::<Vec<_>>(),
            vec![first, second]
        );
        assert_eq!(events[0].slots.len(), 1);
        assert_eq!(events[1].slots.len(), 2);
        assert_eq!(events[1].description, None);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_find_missing_event(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = CatalogRepositoryImpl::new(ConnectionPool::new(pool));

        assert!(repo.find_by_id(EventId::from(4242)).await?.is_none());
        assert!(repo.find_all().await?.is_empty());
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_slot_belongs_to_event(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = CatalogRepositoryImpl::new(ConnectionPool::new(pool));

        let e1 = repo
            .create(CreateEvent::new("e1".into(), None, 1, vec![at(9)]))
            .await?;
        let e2 = repo
            .create(CreateEvent::new("e2".into(), None, 1, vec![at(10)]))
            .await?;
        let s1 = repo.find_by_id(e1).await?.unwrap().slots[0].slot_id;

        assert!(repo.slot_belongs_to_event(s1, e1).await?);
        assert!(!repo.slot_belongs_to_event(s1, e2).await?);
        assert!(!repo.slot_belongs_to_event(SlotId::from(9999), e1).await?);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_invalid_event_leaves_nothing_behind(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = CatalogRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        // the capacity CHECK fails after nothing else has been written
        let res = repo
            .create(CreateEvent::new("broken".into(), None, 0, vec![at(9)]))
            .await;
        assert!(matches!(res, Err(AppError::SpecificOperationError(_))));

        let slots: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM event_slots")
            .fetch_one(&pool)
            .await?;
        assert_eq!(slots, 0);
        assert!(repo.find_all().await?.is_empty());
        Ok(())
    }
}
