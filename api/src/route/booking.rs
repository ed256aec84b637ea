use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::booking::show_user_bookings;

pub fn build_user_booking_routers() -> Router<AppRegistry> {
    Router::new().route("/users/:email/bookings", get(show_user_bookings))
}
