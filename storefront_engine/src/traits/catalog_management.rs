use crate::{
    db_types::{OrderStatus, PaymentMethod, Product},
    traits::StoreError,
};

/// Read access to the catalog and the admin-managed reference tables.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, StoreError>;

    async fn fetch_order_statuses(&self) -> Result<Vec<OrderStatus>, StoreError>;

    async fn fetch_payment_methods(&self) -> Result<Vec<PaymentMethod>, StoreError>;
}
