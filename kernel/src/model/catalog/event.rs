use chrono::{DateTime, Utc};
use derive_new::new;

/// Everything needed to publish an event together with its bookable slots.
///
/// Field-level rules (non-blank title, positive capacity, at least one slot)
/// are enforced at the HTTP boundary; the schema repeats them as CHECK
/// constraints.
#[derive(Debug, new)]
pub struct CreateEvent {
    pub title: String,
    pub description: Option<String>,
    pub capacity_per_slot: i32,
    pub slot_times: Vec<DateTime<Utc>>,
}
