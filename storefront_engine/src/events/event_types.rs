use serde::{Deserialize, Serialize};

use crate::db_types::{Order, TrackingEvent};

/// Emitted once an order has been committed. Replays of an idempotent request do not emit this event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlacedEvent {
    pub order: Order,
}

impl OrderPlacedEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

/// Emitted once a tracking event, and the status change it carries, has been committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangedEvent {
    pub event: TrackingEvent,
}

impl StatusChangedEvent {
    pub fn new(event: TrackingEvent) -> Self {
        Self { event }
    }
}
