use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    catalog::{event::CreateEvent, Event},
    id::{EventId, SlotId},
};

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // Inserts the event and all of its slots in one transaction.
    async fn create(&self, event: CreateEvent) -> AppResult<EventId>;
    // Events in creation order, each with its slots ordered by time.
    async fn find_all(&self) -> AppResult<Vec<Event>>;
    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>>;
    // Reads the latest committed state.
    async fn slot_belongs_to_event(&self, slot_id: SlotId, event_id: EventId) -> AppResult<bool>;
}
