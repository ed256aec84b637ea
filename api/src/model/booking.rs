use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    booking::{event::CreateBooking, Booking, BookingHistory},
    id::{BookingId, EventId, SlotId},
};
use serde::{Deserialize, Serialize};

use super::non_blank;

/// Body of `POST /events/:id/bookings`. Missing fields deserialize to empty
/// values so that they are reported by validation rather than by the JSON
/// extractor.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(default)]
    #[garde(custom(non_blank))]
    pub name: String,
    #[serde(default)]
    #[garde(custom(non_blank))]
    pub email: String,
    #[serde(default)]
    #[garde(range(min = 1))]
    pub slot_id: i64,
}

#[derive(new)]
pub struct CreateBookingRequestWithEventId(EventId, CreateBookingRequest);

impl From<CreateBookingRequestWithEventId> for CreateBooking {
    fn from(value: CreateBookingRequestWithEventId) -> Self {
        let CreateBookingRequestWithEventId(
            event_id,
            CreateBookingRequest {
                name,
                email,
                slot_id,
            },
        ) = value;
        CreateBooking {
            event_id,
            slot_id: SlotId::from(slot_id),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreatedResponse {
    pub success: bool,
    pub message: String,
    pub booking_id: BookingId,
}

impl From<Booking> for BookingCreatedResponse {
    fn from(value: Booking) -> Self {
        Self {
            success: true,
            message: "Booking successful.".into(),
            booking_id: value.booking_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingHistoryResponse {
    pub booking_id: BookingId,
    pub event_id: EventId,
    pub event_title: String,
    pub event_description: Option<String>,
    pub slot_id: SlotId,
    pub slot: DateTime<Utc>,
    pub booking_created_at: DateTime<Utc>,
}

impl From<BookingHistory> for BookingHistoryResponse {
    fn from(value: BookingHistory) -> Self {
        let BookingHistory {
            booking_id,
            event_id,
            event_title,
            event_description,
            slot_id,
            slot_time,
            booked_at,
        } = value;
        Self {
            booking_id,
            event_id,
            event_title,
            event_description,
            slot_id,
            slot: slot_time,
            booking_created_at: booked_at,
        }
    }
}
