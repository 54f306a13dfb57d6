//! `SqliteDatabase` is the concrete storefront backend.
//!
//! It implements all the traits defined in the [`crate::traits`] module on top of a SQLite connection pool.
use std::fmt::Debug;

use chrono::Utc;
use log::*;
use sqlx::SqlitePool;

use super::db::{cart, catalog, new_pool, order_lines, orders, tracking, DbSettings};
use crate::{
    db_types::{
        CartItem,
        CartLine,
        NewCartLine,
        NewOrder,
        NewTrackingEvent,
        Order,
        OrderLineDetail,
        OrderStatus,
        OrderSummary,
        PaymentMethod,
        Product,
        TrackingEntry,
        TrackingEvent,
    },
    traits::{CartManagement, CatalogManagement, OrderManagement, StoreError, TrackingManagement},
    transitions::TransitionPolicy,
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object with the default pool timeout.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        Self::new_with_settings(url, DbSettings { max_connections, ..DbSettings::default() }).await
    }

    pub async fn new_with_settings(url: &str, settings: DbSettings) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, settings).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    /// Brings the schema up to date and seeds the reference tables.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Migrations complete for {}", self.url);
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl OrderManagement for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn place_order(&self, order: NewOrder) -> Result<(Order, bool), StoreError> {
        if order.lines.is_empty() {
            return Err(StoreError::InvalidOrder("An order must have at least one line".into()));
        }
        let total = order.total().ok_or_else(|| StoreError::InvalidOrder("The order total is too large".into()))?;
        let mut tx = self.pool.begin().await?;
        let (placed, created) = orders::idempotent_insert(&order, total, Utc::now(), &mut tx).await?;
        if !created {
            tx.rollback().await?;
            return Ok((placed, false));
        }
        let lines = order_lines::insert_lines(placed.id, &order.lines, &mut tx).await?;
        trace!("🗃️ Order #{}: {} lines saved", placed.id, lines.len());
        tracking::insert_event(NewTrackingEvent::order_created(placed.id), placed.created_at, &mut tx).await?;
        let cleared = cart::clear_cart(order.client_id, &mut tx).await?;
        tx.commit().await?;
        debug!(
            "🗃️ Order #{} committed for client #{}. Total {}, {cleared} cart lines cleared",
            placed.id, placed.client_id, placed.total
        );
        Ok((placed, true))
    }

    async fn fetch_order(&self, order_id: i64) -> Result<Option<OrderSummary>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_summary(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_lines(&self, order_id: i64) -> Result<Vec<OrderLineDetail>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let lines = order_lines::fetch_lines_with_products(order_id, &mut conn).await?;
        Ok(lines)
    }

    async fn fetch_orders_for_client(&self, client_id: i64) -> Result<Vec<OrderSummary>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_for_client(client_id, &mut conn).await?;
        Ok(orders)
    }
}

impl TrackingManagement for SqliteDatabase {
    async fn append_tracking_event(
        &self,
        event: NewTrackingEvent,
        policy: TransitionPolicy,
    ) -> Result<TrackingEvent, StoreError> {
        let mut tx = self.pool.begin().await?;
        if policy == TransitionPolicy::Strict {
            let order = orders::fetch_order(event.order_id, &mut tx)
                .await?
                .ok_or_else(|| StoreError::ReferenceNotFound(format!("Order #{} does not exist", event.order_id)))?;
            if !policy.is_allowed(order.status_id, event.status_id) {
                debug!(
                    "🗃️ Order #{}: transition {} -> {} rejected by the {policy} policy",
                    order.id, order.status_id, event.status_id
                );
                return Err(StoreError::IllegalTransition { from: order.status_id, to: event.status_id });
            }
        }
        let inserted = tracking::insert_event(event, Utc::now(), &mut tx).await?;
        if !orders::update_order_status(inserted.order_id, inserted.status_id, &mut tx).await? {
            return Err(StoreError::OrderNotFound(inserted.order_id));
        }
        tx.commit().await?;
        debug!("🗃️ Order #{} is now in status {}", inserted.order_id, inserted.status_id);
        Ok(inserted)
    }

    async fn fetch_tracking(&self, order_id: i64) -> Result<Vec<TrackingEntry>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let entries = tracking::fetch_tracking(order_id, &mut conn).await?;
        Ok(entries)
    }
}

impl CartManagement for SqliteDatabase {
    async fn fetch_cart(&self, client_id: i64) -> Result<Vec<CartItem>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let items = cart::fetch_cart(client_id, &mut conn).await?;
        Ok(items)
    }

    async fn add_to_cart(&self, line: NewCartLine, max_quantity: i64) -> Result<CartLine, StoreError> {
        // `RETURNING` statements only finish when the transaction is committed.
        let mut tx = self.pool.begin().await?;
        let line = cart::upsert_line(line, max_quantity, Utc::now(), &mut tx).await?;
        tx.commit().await?;
        Ok(line)
    }

    async fn remove_cart_line(&self, line_id: i64) -> Result<Option<CartLine>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let line = cart::delete_line(line_id, &mut tx).await?;
        tx.commit().await?;
        Ok(line)
    }

    async fn clear_cart(&self, client_id: i64) -> Result<u64, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let removed = cart::clear_cart(client_id, &mut conn).await?;
        Ok(removed)
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let product = catalog::fetch_product(product_id, &mut conn).await?;
        Ok(product)
    }

    async fn fetch_order_statuses(&self) -> Result<Vec<OrderStatus>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let statuses = catalog::fetch_order_statuses(&mut conn).await?;
        Ok(statuses)
    }

    async fn fetch_payment_methods(&self) -> Result<Vec<PaymentMethod>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let methods = catalog::fetch_payment_methods(&mut conn).await?;
        Ok(methods)
    }
}
