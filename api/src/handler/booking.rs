use axum::{extract::State, http::StatusCode, Json};
use garde::Validate;
use kernel::model::id::EventId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::extractor::{AppJson, AppPath};
use crate::model::booking::{
    BookingCreatedResponse, BookingHistoryResponse, CreateBookingRequest,
    CreateBookingRequestWithEventId,
};

pub async fn book_slot(
    AppPath(event_id): AppPath<EventId>,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingCreatedResponse>)> {
    // Malformed input is rejected before any storage access.
    req.validate(&())?;

    let create_booking = CreateBookingRequestWithEventId::new(event_id, req);
    registry
        .booking_repository()
        .admit(create_booking.into())
        .await
        .map(|booking| (StatusCode::CREATED, Json(booking.into())))
}

pub async fn show_user_bookings(
    AppPath(email): AppPath<String>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<BookingHistoryResponse>>> {
    let history = registry
        .booking_repository()
        .find_history_by_email(email.trim())
        .await?;

    if history.is_empty() {
        return Err(AppError::EntityNotFound(
            "No bookings found for this user.".into(),
        ));
    }

    Ok(Json(
        history
            .into_iter()
            .map(BookingHistoryResponse::from)
            .collect(),
    ))
}
