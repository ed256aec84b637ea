use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    catalog::{event::CreateEvent, Event, Slot},
    id::{EventId, SlotId},
};
use serde::{Deserialize, Serialize};

use super::non_blank;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[serde(default)]
    #[garde(custom(non_blank))]
    pub title: String,
    #[garde(skip)]
    pub description: Option<String>,
    #[serde(default)]
    #[garde(length(min = 1))]
    pub time_slots: Vec<DateTime<Utc>>,
    // Absent counts as zero and fails the range check.
    #[serde(default)]
    #[garde(range(min = 1))]
    pub max_bookings_per_slot: i32,
}

impl From<CreateEventRequest> for CreateEvent {
    fn from(value: CreateEventRequest) -> Self {
        let CreateEventRequest {
            title,
            description,
            time_slots,
            max_bookings_per_slot,
        } = value;
        CreateEvent {
            title: title.trim().to_string(),
            description: description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            capacity_per_slot: max_bookings_per_slot,
            slot_times: time_slots,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEventResponse {
    pub event_id: EventId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub max_bookings_per_slot: i32,
    pub created_at: DateTime<Utc>,
    pub slots: Vec<SlotResponse>,
}

impl From<Event> for EventResponse {
    fn from(value: Event) -> Self {
        let Event {
            event_id,
            title,
            description,
            capacity_per_slot,
            created_at,
            slots,
        } = value;
        Self {
            id: event_id,
            title,
            description,
            max_bookings_per_slot: capacity_per_slot,
            created_at,
            slots: slots.into_iter().map(SlotResponse::from).collect(),
        }
    }
}

// Existing clients read `slot_time` in snake case.
#[derive(Debug, Serialize)]
pub struct SlotResponse {
    pub id: SlotId,
    pub slot_time: DateTime<Utc>,
}

impl From<Slot> for SlotResponse {
    fn from(value: Slot) -> Self {
        let Slot {
            slot_id,
            slot_time,
            ..
        } = value;
        Self {
            id: slot_id,
            slot_time,
        }
    }
}
