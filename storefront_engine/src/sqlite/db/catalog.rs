use sqlx::SqliteConnection;

use crate::db_types::{OrderStatus, PaymentMethod, Product};

pub async fn fetch_product(product_id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    let product = sqlx::query_as("SELECT id, name, price, description, image_url FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(conn)
        .await?;
    Ok(product)
}

pub async fn fetch_order_statuses(conn: &mut SqliteConnection) -> Result<Vec<OrderStatus>, sqlx::Error> {
    let statuses = sqlx::query_as("SELECT id, name FROM order_statuses ORDER BY id").fetch_all(conn).await?;
    Ok(statuses)
}

pub async fn fetch_payment_methods(conn: &mut SqliteConnection) -> Result<Vec<PaymentMethod>, sqlx::Error> {
    let methods = sqlx::query_as("SELECT id, name FROM payment_methods ORDER BY id").fetch_all(conn).await?;
    Ok(methods)
}
