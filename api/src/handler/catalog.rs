use axum::{extract::State, http::StatusCode, Json};
use garde::Validate;
use kernel::model::id::EventId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::extractor::{AppJson, AppPath};
use crate::model::catalog::{CreateEventRequest, CreatedEventResponse, EventResponse};

pub async fn register_event(
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<CreatedEventResponse>)> {
    req.validate(&())?;

    registry
        .catalog_repository()
        .create(req.into())
        .await
        .map(|event_id| (StatusCode::CREATED, Json(CreatedEventResponse { event_id })))
}

pub async fn show_event_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<EventResponse>>> {
    registry
        .catalog_repository()
        .find_all()
        .await
        .map(|events| events.into_iter().map(EventResponse::from).collect())
        .map(Json)
}

pub async fn show_event(
    AppPath(event_id): AppPath<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventResponse>> {
    registry
        .catalog_repository()
        .find_by_id(event_id)
        .await
        .and_then(|event| match event {
            Some(event) => Ok(Json(event.into())),
            None => Err(AppError::EntityNotFound("Event not found".into())),
        })
}
