use crate::{
    db_types::{CartItem, CartLine, NewCartLine},
    traits::StoreError,
};

#[allow(async_fn_in_trait)]
pub trait CartManagement {
    /// The client's cart lines, oldest first, each joined with its product.
    async fn fetch_cart(&self, client_id: i64) -> Result<Vec<CartItem>, StoreError>;

    /// Adds a product to the client's cart. If the client already has a line for the product, the quantities are
    /// merged into that line, capped at `max_quantity`.
    async fn add_to_cart(&self, line: NewCartLine, max_quantity: i64) -> Result<CartLine, StoreError>;

    /// Removes a single cart line, returning it. `None` if there is no such line.
    async fn remove_cart_line(&self, line_id: i64) -> Result<Option<CartLine>, StoreError>;

    /// Removes every line in the client's cart and returns the number of lines removed.
    async fn clear_cart(&self, client_id: i64) -> Result<u64, StoreError>;
}
