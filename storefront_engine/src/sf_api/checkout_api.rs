use std::fmt::Debug;

use chrono::Utc;
use log::*;

use crate::{
    db_types::{NewOrderLine, Order, OrderSummary},
    events::{EventProducers, OrderPlacedEvent},
    sf_api::{
        errors::{OrderFlowError, ValidationError},
        order_objects::{CheckoutRules, OrderRequest, PlacedOrder},
    },
    traits::{CartManagement, OrderManagement},
};

/// `CheckoutApi` turns a client's selection into an order.
///
/// Placing an order writes the order header, its lines and the initial tracking event, and empties the client's
/// cart, all in one transaction.
pub struct CheckoutApi<B> {
    db: B,
    rules: CheckoutRules,
    producers: EventProducers,
}

impl<B> Debug for CheckoutApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutApi ({:?})", self.rules)
    }
}

impl<B> CheckoutApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, rules: CheckoutRules::default(), producers }
    }

    pub fn with_rules(mut self, rules: CheckoutRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &CheckoutRules {
        &self.rules
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> CheckoutApi<B>
where B: OrderManagement
{
    /// Places an order using the prices supplied in the request as the snapshot prices.
    ///
    /// The request is validated before the store is touched. If it carries an idempotency key that the client already
    /// used inside the replay window, the earlier order is returned with `created: false` and nothing is written.
    pub async fn place_order(&self, request: OrderRequest) -> Result<PlacedOrder, OrderFlowError> {
        request.validate(&self.rules)?;
        let order = request.into_new_order(Utc::now(), &self.rules)?;
        let client_id = order.client_id;
        let (order, created) = self.db.place_order(order).await?;
        if created {
            info!("🔄️📦️ Order #{} placed for client #{client_id}. Total: {}", order.id, order.total);
            self.call_order_placed_hook(&order).await;
        } else {
            info!("🔄️📦️ Order #{} replayed for client #{client_id}", order.id);
        }
        Ok(PlacedOrder { order, created })
    }

    /// The client's orders, newest first.
    pub async fn orders_for_client(&self, client_id: i64) -> Result<Vec<OrderSummary>, OrderFlowError> {
        let orders = self.db.fetch_orders_for_client(client_id).await?;
        trace!("🔄️📦️ {} orders found for client #{client_id}", orders.len());
        Ok(orders)
    }

    async fn call_order_placed_hook(&self, order: &Order) {
        for emitter in &self.producers.order_placed_producer {
            debug!("🔄️📦️ Notifying order placed hook subscribers");
            emitter.publish_event(OrderPlacedEvent::new(order.clone())).await;
        }
    }
}

impl<B> CheckoutApi<B>
where B: OrderManagement + CartManagement
{
    /// Places an order for everything in the client's stored cart, snapshotting the current catalog prices.
    pub async fn checkout_cart(
        &self,
        client_id: i64,
        payment_method_id: i64,
        idempotency_key: Option<String>,
    ) -> Result<PlacedOrder, OrderFlowError> {
        let cart = self.db.fetch_cart(client_id).await?;
        if cart.is_empty() {
            return Err(ValidationError::new("items", "The cart is empty").into());
        }
        let items = cart
            .into_iter()
            .map(|item| NewOrderLine::new(item.line.product_id, item.line.quantity, item.product.price))
            .collect();
        let mut request = OrderRequest::new(client_id, payment_method_id, items);
        request.idempotency_key = idempotency_key;
        debug!("🔄️🛒️ Checking out {} cart lines for client #{client_id}", request.items.len());
        self.place_order(request).await
    }
}
