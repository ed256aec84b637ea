use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    booking::{event::CreateBooking, Booking, BookingHistory},
    id::SlotId,
};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Admits a booking request or rejects it without touching the ledger.
    ///
    /// The duplicate check, the capacity check and the insert run as one
    /// unit of work that is serialized against every other admission on the
    /// same slot. Rejections are reported as
    /// [`AppError::EntityNotFound`](shared::error::AppError::EntityNotFound),
    /// [`AppError::SlotMismatch`](shared::error::AppError::SlotMismatch),
    /// [`AppError::DuplicateBooking`](shared::error::AppError::DuplicateBooking) or
    /// [`AppError::CapacityExceeded`](shared::error::AppError::CapacityExceeded).
    async fn admit(&self, event: CreateBooking) -> AppResult<Booking>;
    async fn count_by_slot(&self, slot_id: SlotId) -> AppResult<i64>;
    async fn find_by_slot_and_email(
        &self,
        slot_id: SlotId,
        email: &str,
    ) -> AppResult<Option<Booking>>;
    // Newest booking first.
    async fn find_history_by_email(&self, email: &str) -> AppResult<Vec<BookingHistory>>;
}
