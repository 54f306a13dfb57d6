use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Cents, NewOrder, NewOrderLine, Order, OrderLineDetail, OrderSummary, TrackingEntry},
    sf_api::errors::ValidationError,
};

pub const MAX_IDEMPOTENCY_KEY_LENGTH: usize = 128;
pub const DEFAULT_MAX_LINE_QUANTITY: i64 = 1000;
pub const DEFAULT_IDEMPOTENCY_WINDOW_HOURS: i64 = 24;

/// Limits applied to incoming orders before anything is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutRules {
    /// The highest unit price a line may carry.
    pub max_unit_price: Cents,
    pub max_line_quantity: i64,
    /// How long an idempotency key keeps returning the order it created.
    pub idempotency_window: Duration,
}

impl Default for CheckoutRules {
    fn default() -> Self {
        Self {
            max_unit_price: Cents::from_units(1_000_000),
            max_line_quantity: DEFAULT_MAX_LINE_QUANTITY,
            idempotency_window: Duration::hours(DEFAULT_IDEMPOTENCY_WINDOW_HOURS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub client_id: i64,
    pub payment_method_id: i64,
    pub items: Vec<NewOrderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

impl OrderRequest {
    pub fn new(client_id: i64, payment_method_id: i64, items: Vec<NewOrderLine>) -> Self {
        Self { client_id, payment_method_id, items, idempotency_key: None }
    }

    pub fn with_idempotency_key<S: Into<String>>(mut self, key: S) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Checks the request against the rules. Client, payment method and product references are left to the store's
    /// foreign keys.
    pub fn validate(&self, rules: &CheckoutRules) -> Result<(), ValidationError> {
        if self.items.is_empty() {
            return Err(ValidationError::new("items", "An order must contain at least one item"));
        }
        for (i, item) in self.items.iter().enumerate() {
            if item.quantity < 1 {
                return Err(ValidationError::new(format!("items[{i}].quantity"), "Quantity must be at least 1"));
            }
            if item.quantity > rules.max_line_quantity {
                let msg = format!("Quantity must not exceed {}", rules.max_line_quantity);
                return Err(ValidationError::new(format!("items[{i}].quantity"), msg));
            }
            if item.price.is_negative() {
                return Err(ValidationError::new(format!("items[{i}].price"), "Price must not be negative"));
            }
            if item.price > rules.max_unit_price {
                let msg = format!("Price must not exceed {}", rules.max_unit_price);
                return Err(ValidationError::new(format!("items[{i}].price"), msg));
            }
        }
        if let Some(key) = &self.idempotency_key {
            if key.trim().is_empty() {
                return Err(ValidationError::new("idempotencyKey", "Idempotency key must not be blank"));
            }
            if key.chars().count() > MAX_IDEMPOTENCY_KEY_LENGTH {
                let msg = format!("Idempotency key must be at most {MAX_IDEMPOTENCY_KEY_LENGTH} characters");
                return Err(ValidationError::new("idempotencyKey", msg));
            }
        }
        Ok(())
    }

    /// Converts a validated request into an order for the store. A key is only honoured for orders created at or
    /// after `now - rules.idempotency_window`.
    pub fn into_new_order(self, now: DateTime<Utc>, rules: &CheckoutRules) -> Result<NewOrder, ValidationError> {
        let order = NewOrder::new(self.client_id, self.payment_method_id, self.items);
        if order.total().is_none() {
            return Err(ValidationError::new("items", "The order total is too large"));
        }
        let order = match self.idempotency_key {
            Some(key) => order.with_idempotency(key.trim().to_string(), now - rules.idempotency_window),
            None => order,
        };
        Ok(order)
    }
}

/// The result of placing an order. `created` is false when an idempotent request replayed an existing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub order: Order,
    pub created: bool,
}

/// An order header with its lines and tracking history.
///
/// If the tracking history could not be read, `tracking` is empty and `tracking_available` is false. The header and
/// lines are still authoritative in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: OrderSummary,
    pub items: Vec<OrderLineDetail>,
    pub tracking: Vec<TrackingEntry>,
    pub tracking_available: bool,
}
