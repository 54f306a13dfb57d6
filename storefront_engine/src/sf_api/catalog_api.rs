use std::fmt::Debug;

use crate::{
    db_types::{OrderStatus, PaymentMethod, Product},
    sf_api::errors::OrderFlowError,
    traits::CatalogManagement,
};

/// Read-only access to products and the reference tables.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub async fn product(&self, product_id: i64) -> Result<Product, OrderFlowError> {
        self.db
            .fetch_product(product_id)
            .await?
            .ok_or_else(|| OrderFlowError::RecordNotFound(format!("Product {product_id}")))
    }

    pub async fn order_statuses(&self) -> Result<Vec<OrderStatus>, OrderFlowError> {
        let statuses = self.db.fetch_order_statuses().await?;
        Ok(statuses)
    }

    pub async fn payment_methods(&self) -> Result<Vec<PaymentMethod>, OrderFlowError> {
        let methods = self.db.fetch_payment_methods().await?;
        Ok(methods)
    }
}
