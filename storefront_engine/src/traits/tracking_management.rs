use crate::{
    db_types::{NewTrackingEvent, TrackingEntry, TrackingEvent},
    traits::StoreError,
    transitions::TransitionPolicy,
};

#[allow(async_fn_in_trait)]
pub trait TrackingManagement {
    /// Appends a tracking event to an order and sets the order's current status to the event's status. Both writes
    /// happen in one transaction.
    ///
    /// The event timestamp is the server clock at insert time, clamped so that it is never earlier than the latest
    /// event already recorded for the order.
    ///
    /// Under [`TransitionPolicy::Strict`], the move from the order's current status is checked first and rejected
    /// with [`StoreError::IllegalTransition`] if the policy forbids it.
    async fn append_tracking_event(
        &self,
        event: NewTrackingEvent,
        policy: TransitionPolicy,
    ) -> Result<TrackingEvent, StoreError>;

    /// The tracking history for an order, ascending by timestamp with ties broken by insertion order. An order with no
    /// events (or an unknown order) yields an empty list.
    async fn fetch_tracking(&self, order_id: i64) -> Result<Vec<TrackingEntry>, StoreError>;
}
