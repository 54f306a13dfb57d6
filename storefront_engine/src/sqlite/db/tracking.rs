use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::db_types::{NewTrackingEvent, TrackingEntry, TrackingEvent};

/// Appends a tracking event to an order.
///
/// The stored timestamp is `now`, unless an earlier event for the order already carries a later timestamp (clock
/// skew between connections, or a wall clock stepping backwards). In that case the latest existing timestamp is reused,
/// so timestamps never decrease in insertion order.
pub async fn insert_event(
    event: NewTrackingEvent,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<TrackingEvent, sqlx::Error> {
    let event: TrackingEvent = sqlx::query_as(
        r#"
            INSERT INTO tracking_events (order_id, status_id, timestamp, comment)
            VALUES (
                $1,
                $2,
                MAX($3, COALESCE((SELECT MAX(timestamp) FROM tracking_events WHERE order_id = $1), $3)),
                $4
            )
            RETURNING *;
        "#,
    )
    .bind(event.order_id)
    .bind(event.status_id)
    .bind(now)
    .bind(event.comment)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Tracking event #{} ({}) added to order #{}", event.id, event.status_id, event.order_id);
    Ok(event)
}

/// The order's tracking history, each event annotated with its status name, ascending by timestamp and then id.
pub async fn fetch_tracking(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<TrackingEntry>, sqlx::Error> {
    let mut entries: Vec<TrackingEntry> = sqlx::query_as(
        r#"
            SELECT tracking_events.*, order_statuses.name AS status_name
            FROM tracking_events LEFT JOIN order_statuses ON order_statuses.id = tracking_events.status_id
            WHERE tracking_events.order_id = $1
            ORDER BY tracking_events.timestamp ASC, tracking_events.id ASC
        "#,
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    // Text timestamps sort correctly only while every row shares one format, so don't rely on the store's ordering.
    entries.sort_by_key(|e| (e.event.timestamp, e.event.id));
    trace!("🗃️ {} tracking events fetched for order #{order_id}", entries.len());
    Ok(entries)
}
