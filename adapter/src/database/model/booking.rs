use kernel::model::{
    booking::{Booking, BookingHistory},
    id::{BookingId, EventId, SlotId},
};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub event_id: EventId,
    pub slot_id: SlotId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(value: BookingRow) -> Self {
        let BookingRow {
            booking_id,
            event_id,
            slot_id,
            name,
            email,
            created_at,
        } = value;
        Booking {
            booking_id,
            event_id,
            slot_id,
            name,
            email,
            created_at,
        }
    }
}

// Row shape of the per-attendee history, joined with the event and slot.
#[derive(sqlx::FromRow)]
pub struct BookingHistoryRow {
    pub booking_id: BookingId,
    pub event_id: EventId,
    pub event_title: String,
    pub event_description: Option<String>,
    pub slot_id: SlotId,
    pub slot_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<BookingHistoryRow> for BookingHistory {
    fn from(value: BookingHistoryRow) -> Self {
        let BookingHistoryRow {
            booking_id,
            event_id,
            event_title,
            event_description,
            slot_id,
            slot_time,
            created_at,
        } = value;
        BookingHistory {
            booking_id,
            event_id,
            event_title,
            event_description,
            slot_id,
            slot_time,
            booked_at: created_at,
        }
    }
}
