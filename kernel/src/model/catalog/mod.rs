use chrono::{DateTime, Utc};

use crate::model::id::{EventId, SlotId};

pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub event_id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub capacity_per_slot: i32,
    pub created_at: DateTime<Utc>,
    // Ordered by slot_time.
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub slot_id: SlotId,
    pub event_id: EventId,
    pub slot_time: DateTime<Utc>,
}
