use derive_new::new;

use crate::model::id::{EventId, SlotId};

#[derive(Debug, Clone, new)]
pub struct CreateBooking {
    pub event_id: EventId,
    pub slot_id: SlotId,
    pub name: String,
    pub email: String,
}
