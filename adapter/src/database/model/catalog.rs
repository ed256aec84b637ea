use kernel::model::{
    catalog::{Event, Slot},
    id::{EventId, SlotId},
};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct EventRow {
    pub event_id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub capacity_per_slot: i32,
    pub created_at: DateTime<Utc>,
}

impl EventRow {
    // Slots are fetched separately, so the conversion takes them as an argument.
    pub fn into_event(self, slots: Vec<Slot>) -> Event {
        let EventRow {
            event_id,
            title,
            description,
            capacity_per_slot,
            created_at,
        } = self;
        Event {
            event_id,
            title,
            description,
            capacity_per_slot,
            created_at,
            slots,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct SlotRow {
    pub slot_id: SlotId,
    pub event_id: EventId,
    pub slot_time: DateTime<Utc>,
}

impl From<SlotRow> for Slot {
    fn from(value: SlotRow) -> Self {
        let SlotRow {
            slot_id,
            event_id,
            slot_time,
        } = value;
        Slot {
            slot_id,
            event_id,
            slot_time,
        }
    }
}
