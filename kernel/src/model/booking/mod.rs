use chrono::{DateTime, Utc};

use crate::model::id::{BookingId, EventId, SlotId};

pub mod event;

/// A confirmed reservation. Rows are only written by the admission path and
/// are never updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub booking_id: BookingId,
    pub event_id: EventId,
    pub slot_id: SlotId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingHistory {
    pub booking_id: BookingId,
    pub event_id: EventId,
    pub event_title: String,
    pub event_description: Option<String>,
    pub slot_id: SlotId,
    pub slot_time: DateTime<Utc>,
    pub booked_at: DateTime<Utc>,
}
