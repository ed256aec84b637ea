use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    booking::book_slot,
    catalog::{register_event, show_event, show_event_list},
};

pub fn build_event_routers() -> Router<AppRegistry> {
    let events_routers = Router::new()
        .route("/", post(register_event))
        .route("/", get(show_event_list))
        .route("/:event_id", get(show_event))
        .route("/:event_id/bookings", post(book_slot));

    Router::new().nest("/events", events_routers)
}
