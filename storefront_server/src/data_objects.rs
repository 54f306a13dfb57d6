//! Request and response bodies for the HTTP API.
//!
//! Request fields are optional at the serde level so that a missing or mistyped value is reported as a validation
//! error naming the field, rather than a generic deserialization failure.
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use storefront_engine::{
    db_types::{Cents, NewCartLine, NewOrderLine, NewTrackingEvent, StatusId},
    order_objects::OrderRequest,
    ValidationError,
};

fn required<T>(value: Option<T>, field: impl Display) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::new(field, "This field is required"))
}

fn parse_price(value: Option<Value>, field: String) -> Result<Cents, ValidationError> {
    let price = match required(value, &field)? {
        Value::Number(n) => n.as_f64().map(Cents::try_from_f64),
        Value::String(s) => Some(s.parse::<Cents>()),
        _ => None,
    };
    match price {
        Some(Ok(cents)) => Ok(cents),
        Some(Err(e)) => Err(ValidationError::new(field, e.to_string())),
        None => Err(ValidationError::new(field, "Price must be a number")),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemParams {
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
    pub price: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderParams {
    pub client_id: Option<i64>,
    pub payment_method_id: Option<i64>,
    pub items: Option<Vec<OrderItemParams>>,
    pub idempotency_key: Option<String>,
}

impl TryFrom<PlaceOrderParams> for OrderRequest {
    type Error = ValidationError;

    fn try_from(params: PlaceOrderParams) -> Result<Self, Self::Error> {
        let client_id = required(params.client_id, "clientId")?;
        let payment_method_id = required(params.payment_method_id, "paymentMethodId")?;
        let items = required(params.items, "items")?
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let product_id = required(item.product_id, format!("items[{i}].productId"))?;
                let quantity = required(item.quantity, format!("items[{i}].quantity"))?;
                let price = parse_price(item.price, format!("items[{i}].price"))?;
                Ok(NewOrderLine::new(product_id, quantity, price))
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;
        let mut request = OrderRequest::new(client_id, payment_method_id, items);
        request.idempotency_key = params.idempotency_key;
        Ok(request)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTrackingParams {
    pub order_id: Option<i64>,
    pub status_id: Option<i64>,
    pub comment: Option<String>,
}

impl TryFrom<AddTrackingParams> for NewTrackingEvent {
    type Error = ValidationError;

    fn try_from(params: AddTrackingParams) -> Result<Self, Self::Error> {
        let order_id = required(params.order_id, "orderId")?;
        let status_id = required(params.status_id, "statusId")?;
        let mut event = NewTrackingEvent::new(order_id, StatusId(status_id));
        event.comment = params.comment;
        Ok(event)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartParams {
    pub client_id: Option<i64>,
    pub product_id: Option<i64>,
    /// Defaults to 1.
    pub quantity: Option<i64>,
}

impl TryFrom<AddToCartParams> for NewCartLine {
    type Error = ValidationError;

    fn try_from(params: AddToCartParams) -> Result<Self, Self::Error> {
        let client_id = required(params.client_id, "clientId")?;
        let product_id = required(params.product_id, "productId")?;
        Ok(NewCartLine { client_id, product_id, quantity: params.quantity.unwrap_or(1) })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutParams {
    pub payment_method_id: Option<i64>,
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn new<S: Display>(message: S) -> Self {
        Self { message: message.to_string(), field: None, error: None }
    }

    pub fn with_field<S: Display>(mut self, field: S) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub fn with_error<S: Display>(mut self, error: S) -> Self {
        self.error = Some(error.to_string());
        self
    }
}
