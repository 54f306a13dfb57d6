use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{Cents, NewOrder, Order, OrderSummary, StatusId},
    traits::StoreError,
};

/// Inserts the order header, returning `false` in the second parameter if an order with the same idempotency key
/// already exists for the client inside the replay window. In that case nothing is written and the existing order is
/// returned.
///
/// The existence check and the insert are a single statement, so there is no window between them for a concurrent
/// writer to slip into.
pub async fn idempotent_insert(
    order: &NewOrder,
    total: Cents,
    created_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<(Order, bool), StoreError> {
    let key = order.idempotency.as_ref().map(|i| i.key.as_str());
    let not_before = order.idempotency.as_ref().map(|i| i.not_before);
    let inserted: Option<Order> = sqlx::query_as(
        r#"
            INSERT INTO orders (client_id, payment_method_id, status_id, total, created_at, idempotency_key)
            SELECT $1, $2, $3, $4, $5, $6
            WHERE $6 IS NULL OR NOT EXISTS (
                SELECT 1 FROM orders WHERE client_id = $1 AND idempotency_key = $6 AND created_at >= $7
            )
            RETURNING *;
        "#,
    )
    .bind(order.client_id)
    .bind(order.payment_method_id)
    .bind(StatusId::INITIAL)
    .bind(total)
    .bind(created_at)
    .bind(key)
    .bind(not_before)
    .fetch_optional(&mut *conn)
    .await?;
    if let Some(order) = inserted {
        debug!("🗃️ Order #{} inserted for client #{} with total {}", order.id, order.client_id, order.total);
        return Ok((order, true));
    }
    let (Some(key), Some(not_before)) = (key, not_before) else {
        return Err(StoreError::DatabaseError("Order insert returned no row".into()));
    };
    let existing = fetch_order_by_idempotency_key(order.client_id, key, not_before, conn)
        .await?
        .ok_or_else(|| StoreError::DatabaseError(format!("Replayed order for key '{key}' has disappeared")))?;
    debug!("🗃️ Order #{} replayed for client #{} (key '{key}')", existing.id, existing.client_id);
    Ok((existing, false))
}

pub async fn fetch_order_by_idempotency_key(
    client_id: i64,
    key: &str,
    not_before: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            SELECT * FROM orders
            WHERE client_id = $1 AND idempotency_key = $2 AND created_at >= $3
            ORDER BY id DESC LIMIT 1
        "#,
    )
    .bind(client_id)
    .bind(key)
    .bind(not_before)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

pub async fn fetch_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id).fetch_optional(conn).await?;
    Ok(order)
}

/// Returns the order with its status display name. The name is `None` if the status row is missing.
pub async fn fetch_order_summary(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderSummary>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            SELECT orders.*, order_statuses.name AS status_name
            FROM orders LEFT JOIN order_statuses ON order_statuses.id = orders.status_id
            WHERE orders.id = $1
        "#,
    )
    .bind(order_id)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

/// Fetches a client's orders, newest first.
pub async fn fetch_orders_for_client(
    client_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderSummary>, sqlx::Error> {
    let orders: Vec<OrderSummary> = sqlx::query_as(
        r#"
            SELECT orders.*, order_statuses.name AS status_name
            FROM orders LEFT JOIN order_statuses ON order_statuses.id = orders.status_id
            WHERE orders.client_id = $1
            ORDER BY orders.created_at DESC, orders.id DESC
        "#,
    )
    .bind(client_id)
    .fetch_all(conn)
    .await?;
    trace!("🗃️ {} orders fetched for client #{client_id}", orders.len());
    Ok(orders)
}

/// Sets the denormalized current status of an order. Returns `false` if the order does not exist.
pub(crate) async fn update_order_status(
    order_id: i64,
    status_id: StatusId,
    conn: &mut SqliteConnection,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE orders SET status_id = $1 WHERE id = $2")
        .bind(status_id)
        .bind(order_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
