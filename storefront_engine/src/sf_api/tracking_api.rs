use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewTrackingEvent, StatusId, TrackingEntry, TrackingEvent},
    events::{EventProducers, StatusChangedEvent},
    sf_api::{
        errors::{OrderFlowError, ValidationError},
        order_objects::OrderDetails,
    },
    traits::{OrderManagement, TrackingManagement},
    transitions::TransitionPolicy,
};

pub const MAX_COMMENT_LENGTH: usize = 500;

/// `TrackingApi` records delivery progress for orders and reads it back.
///
/// The order's current status is always the status of its most recent tracking event. Both are written together.
pub struct TrackingApi<B> {
    db: B,
    policy: TransitionPolicy,
    producers: EventProducers,
}

impl<B> Debug for TrackingApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TrackingApi ({} transitions)", self.policy)
    }
}

impl<B> TrackingApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, policy: TransitionPolicy::default(), producers }
    }

    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }
}

impl<B> TrackingApi<B>
where B: TrackingManagement
{
    /// Appends a status-change event to an order, and moves the order to that status.
    ///
    /// Blank comments are dropped. Unknown orders and statuses are reported by the store as invalid references. Under
    /// the strict policy, moves the policy forbids fail with [`OrderFlowError::IllegalTransition`].
    pub async fn add_tracking_event(&self, mut event: NewTrackingEvent) -> Result<TrackingEvent, OrderFlowError> {
        event.comment = event.comment.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        if event.comment.as_ref().map(|c| c.chars().count() > MAX_COMMENT_LENGTH).unwrap_or(false) {
            let msg = format!("Comments must be at most {MAX_COMMENT_LENGTH} characters");
            return Err(ValidationError::new("comment", msg).into());
        }
        let event = self.db.append_tracking_event(event, self.policy).await?;
        info!("🔄️🚚️ Order #{} moved to status {}", event.order_id, event.status_id);
        self.call_status_changed_hook(&event).await;
        Ok(event)
    }

    /// The order's tracking history in chronological order. Unknown orders have no history.
    pub async fn tracking_for_order(&self, order_id: i64) -> Result<Vec<TrackingEntry>, OrderFlowError> {
        let entries = self.db.fetch_tracking(order_id).await?;
        Ok(entries)
    }

    async fn call_status_changed_hook(&self, event: &TrackingEvent) {
        for emitter in &self.producers.status_changed_producer {
            debug!("🔄️🚚️ Notifying status changed hook subscribers");
            emitter.publish_event(StatusChangedEvent::new(event.clone())).await;
        }
    }
}

impl<B> TrackingApi<B>
where B: OrderManagement + TrackingManagement
{
    pub async fn current_status(&self, order_id: i64) -> Result<StatusId, OrderFlowError> {
        let order = self.db.fetch_order(order_id).await?.ok_or(OrderFlowError::OrderNotFound(order_id))?;
        Ok(order.order.status_id)
    }

    /// Fetches an order with its lines and tracking history.
    ///
    /// Failing to read the header or the lines is an error. Failing to read the tracking history is not: the details
    /// are returned with an empty history and `tracking_available` set to false.
    pub async fn order_details(&self, order_id: i64) -> Result<OrderDetails, OrderFlowError> {
        let order = self.db.fetch_order(order_id).await?.ok_or(OrderFlowError::OrderNotFound(order_id))?;
        let items = self.db.fetch_order_lines(order_id).await?;
        let (tracking, tracking_available) = match self.db.fetch_tracking(order_id).await {
            Ok(entries) => (entries, true),
            Err(e) => {
                warn!("🔄️🚚️ Tracking history for order #{order_id} is unavailable. Returning details without it. {e}");
                (Vec::new(), false)
            },
        };
        Ok(OrderDetails { order, items, tracking, tracking_available })
    }
}
