use axum::Router;
use registry::AppRegistry;

pub mod booking;
pub mod catalog;
pub mod health;

pub fn routes() -> Router<AppRegistry> {
    Router::new()
        .merge(health::build_health_check_routers())
        .merge(catalog::build_event_routers())
        .merge(booking::build_user_booking_routers())
}
