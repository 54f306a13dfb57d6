use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::{FromRow, SqliteConnection};

use crate::db_types::{CartItem, CartLine, Cents, NewCartLine, Product};

#[derive(FromRow)]
struct CartRow {
    #[sqlx(flatten)]
    line: CartLine,
    product_name: String,
    product_price: Cents,
    product_description: Option<String>,
    product_image_url: Option<String>,
}

impl From<CartRow> for CartItem {
    fn from(row: CartRow) -> Self {
        let product = Product {
            id: row.line.product_id,
            name: row.product_name,
            price: row.product_price,
            description: row.product_description,
            image_url: row.product_image_url,
        };
        Self { line: row.line, product }
    }
}

pub async fn fetch_cart(client_id: i64, conn: &mut SqliteConnection) -> Result<Vec<CartItem>, sqlx::Error> {
    let rows: Vec<CartRow> = sqlx::query_as(
        r#"
            SELECT
                cart_items.*,
                products.name AS product_name,
                products.price AS product_price,
                products.description AS product_description,
                products.image_url AS product_image_url
            FROM cart_items JOIN products ON products.id = cart_items.product_id
            WHERE cart_items.client_id = $1
            ORDER BY cart_items.id
        "#,
    )
    .bind(client_id)
    .fetch_all(conn)
    .await?;
    trace!("🗃️ {} cart lines fetched for client #{client_id}", rows.len());
    Ok(rows.into_iter().map(CartItem::from).collect())
}

/// Adds a line to the client's cart, merging the quantity into an existing line for the same product.
///
/// A merged line never holds more than `max_quantity`.
pub async fn upsert_line(
    line: NewCartLine,
    max_quantity: i64,
    added_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<CartLine, sqlx::Error> {
    let line: CartLine = sqlx::query_as(
        r#"
            INSERT INTO cart_items (client_id, product_id, quantity, added_at) VALUES ($1, $2, $3, $4)
            ON CONFLICT (client_id, product_id) DO UPDATE SET quantity = MIN(quantity + excluded.quantity, $5)
            RETURNING *;
        "#,
    )
    .bind(line.client_id)
    .bind(line.product_id)
    .bind(line.quantity)
    .bind(added_at)
    .bind(max_quantity)
    .fetch_one(conn)
    .await?;
    debug!(
        "🗃️ Cart line #{} for client #{} now holds {} of product #{}",
        line.id, line.client_id, line.quantity, line.product_id
    );
    Ok(line)
}

pub async fn delete_line(line_id: i64, conn: &mut SqliteConnection) -> Result<Option<CartLine>, sqlx::Error> {
    let line = sqlx::query_as("DELETE FROM cart_items WHERE id = $1 RETURNING *")
        .bind(line_id)
        .fetch_optional(conn)
        .await?;
    Ok(line)
}

/// Deletes every line in the client's cart, returning the number of lines removed.
pub async fn clear_cart(client_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cart_items WHERE client_id = $1").bind(client_id).execute(conn).await?;
    let removed = result.rows_affected();
    trace!("🗃️ Cleared {removed} lines from the cart of client #{client_id}");
    Ok(removed)
}
