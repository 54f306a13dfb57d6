use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{CartItem, CartLine, NewCartLine},
    sf_api::{
        errors::{OrderFlowError, ValidationError},
        order_objects::DEFAULT_MAX_LINE_QUANTITY,
    },
    traits::CartManagement,
};

/// `CartApi` manages the lines a client has selected but not yet ordered.
pub struct CartApi<B> {
    db: B,
    max_line_quantity: i64,
}

impl<B> Debug for CartApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CartApi")
    }
}

impl<B> CartApi<B> {
    pub fn new(db: B) -> Self {
        Self { db, max_line_quantity: DEFAULT_MAX_LINE_QUANTITY }
    }

    pub fn with_max_line_quantity(mut self, max: i64) -> Self {
        self.max_line_quantity = max;
        self
    }
}

impl<B> CartApi<B>
where B: CartManagement
{
    pub async fn cart_for_client(&self, client_id: i64) -> Result<Vec<CartItem>, OrderFlowError> {
        let cart = self.db.fetch_cart(client_id).await?;
        Ok(cart)
    }

    /// Adds a product to the cart. An existing line for the same product has the quantity added to it, up to the
    /// maximum line quantity.
    pub async fn add_to_cart(&self, line: NewCartLine) -> Result<CartLine, OrderFlowError> {
        if line.quantity < 1 {
            return Err(ValidationError::new("quantity", "Quantity must be at least 1").into());
        }
        if line.quantity > self.max_line_quantity {
            let msg = format!("Quantity must not exceed {}", self.max_line_quantity);
            return Err(ValidationError::new("quantity", msg).into());
        }
        let line = self.db.add_to_cart(line, self.max_line_quantity).await?;
        debug!("🔄️🛒️ Client #{} has {} of product #{} in their cart", line.client_id, line.quantity, line.product_id);
        Ok(line)
    }

    pub async fn remove_line(&self, line_id: i64) -> Result<CartLine, OrderFlowError> {
        let line = self
            .db
            .remove_cart_line(line_id)
            .await?
            .ok_or_else(|| OrderFlowError::RecordNotFound(format!("Cart line {line_id}")))?;
        debug!("🔄️🛒️ Cart line #{line_id} removed");
        Ok(line)
    }

    pub async fn clear_cart(&self, client_id: i64) -> Result<u64, OrderFlowError> {
        let removed = self.db.clear_cart(client_id).await?;
        Ok(removed)
    }
}
