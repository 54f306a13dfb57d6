use crate::{
    db_types::{NewOrder, Order, OrderLineDetail, OrderSummary},
    traits::StoreError,
};

/// Behaviour that storefront backends expose for creating and reading orders.
#[allow(async_fn_in_trait)]
pub trait OrderManagement: Clone {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Takes a new order, and in a single atomic transaction:
    /// * inserts the order header with the computed total and the initial status,
    /// * inserts one order line per entry, using the supplied price as the historical price,
    /// * inserts the initial tracking event,
    /// * deletes every cart line belonging to the client.
    ///
    /// Any failure rolls the whole transaction back, leaving the cart untouched.
    ///
    /// If the order carries an idempotency key and the client already placed an order with that key inside the
    /// replay window, nothing is written and the existing order is returned along with `false`.
    async fn place_order(&self, order: NewOrder) -> Result<(Order, bool), StoreError>;

    /// Fetches the order with the given id, along with the display name of its current status.
    async fn fetch_order(&self, order_id: i64) -> Result<Option<OrderSummary>, StoreError>;

    /// Fetches the lines of an order, each annotated with the current catalog entry for its product.
    async fn fetch_order_lines(&self, order_id: i64) -> Result<Vec<OrderLineDetail>, StoreError>;

    /// Fetches all orders for the client, newest first.
    async fn fetch_orders_for_client(&self, client_id: i64) -> Result<Vec<OrderSummary>, StoreError>;
}
