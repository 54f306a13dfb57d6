//! Record types shared by the storefront database backends and the public API.
//!
//! All entities use integer surrogate keys. Currency amounts are [`Cents`], so totals are exact.
use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
pub use storefront_common::Cents;

//--------------------------------------       StatusId        ---------------------------------------------------------
/// Reference to a row in the admin-managed `order_statuses` table.
///
/// The engine only ever needs to know the initial status by id. The remaining well-known ids match the seed data and
/// are used by the strict transition policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct StatusId(pub i64);

impl StatusId {
    pub const CANCELLED: StatusId = StatusId(5);
    pub const DELIVERED: StatusId = StatusId(4);
    /// Every order starts life in this status.
    pub const INITIAL: StatusId = StatusId::PENDING;
    pub const PAID: StatusId = StatusId(2);
    pub const PENDING: StatusId = StatusId(1);
    pub const SHIPPED: StatusId = StatusId(3);

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for StatusId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for StatusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//--------------------------------------     OrderStatus       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderStatus {
    pub id: StatusId,
    pub name: String,
}

//--------------------------------------    PaymentMethod      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: i64,
    pub name: String,
}

//--------------------------------------       Product         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Cents,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// The live catalog view of a product, attached to order lines when reading order details. The price here is the
/// current catalog price, not the price the customer paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: i64,
    pub name: String,
    pub price: Cents,
    pub image_url: Option<String>,
}

//--------------------------------------        Order          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub client_id: i64,
    pub payment_method_id: i64,
    pub status_id: StatusId,
    pub total: Cents,
    pub created_at: DateTime<Utc>,
}

/// An order header together with the display name of its current status.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: Order,
    pub status_name: Option<String>,
}

/// A caller-supplied idempotency key, and the earliest creation time of an order that may be replayed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Idempotency {
    pub key: String,
    pub not_before: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderLine {
    pub product_id: i64,
    pub quantity: i64,
    /// The snapshot unit price, as displayed to the customer.
    pub price: Cents,
}

impl NewOrderLine {
    pub fn new(product_id: i64, quantity: i64, price: Cents) -> Self {
        Self { product_id, quantity, price }
    }

    pub fn line_total(&self) -> Option<Cents> {
        self.price.checked_mul(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub client_id: i64,
    pub payment_method_id: i64,
    pub lines: Vec<NewOrderLine>,
    pub idempotency: Option<Idempotency>,
}

impl NewOrder {
    pub fn new(client_id: i64, payment_method_id: i64, lines: Vec<NewOrderLine>) -> Self {
        Self { client_id, payment_method_id, lines, idempotency: None }
    }

    pub fn with_idempotency(mut self, key: String, not_before: DateTime<Utc>) -> Self {
        self.idempotency = Some(Idempotency { key, not_before });
        self
    }

    /// The sum of `quantity * price` over all lines, or `None` if the sum overflows.
    pub fn total(&self) -> Option<Cents> {
        self.lines.iter().try_fold(Cents::default(), |acc, line| acc.checked_add(line.line_total()?))
    }
}

//--------------------------------------      OrderLine        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub historical_price: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineDetail {
    #[serde(flatten)]
    pub line: OrderLine,
    pub product: Option<ProductSnapshot>,
}

//--------------------------------------    TrackingEvent      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub id: i64,
    pub order_id: i64,
    pub status_id: StatusId,
    pub timestamp: DateTime<Utc>,
    pub comment: Option<String>,
}

/// A tracking event annotated with the display name of its status.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEntry {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub event: TrackingEvent,
    pub status_name: Option<String>,
}

pub const ORDER_CREATED_COMMENT: &str = "Order created";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrackingEvent {
    pub order_id: i64,
    pub status_id: StatusId,
    pub comment: Option<String>,
}

impl NewTrackingEvent {
    pub fn new(order_id: i64, status_id: StatusId) -> Self {
        Self { order_id, status_id, comment: None }
    }

    pub fn with_comment<S: Into<String>>(mut self, comment: S) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The event that is written alongside every new order.
    pub fn order_created(order_id: i64) -> Self {
        Self::new(order_id, StatusId::INITIAL).with_comment(ORDER_CREATED_COMMENT)
    }
}

//--------------------------------------      CartLine         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: i64,
    pub client_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartLine {
    pub client_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}

/// A cart line joined with the product it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(flatten)]
    pub line: CartLine,
    pub product: Product,
}
