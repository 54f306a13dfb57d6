//! # Storefront public API
//!
//! The `sf_api` module exposes the programmatic API of the storefront engine. Each API wraps a backend implementing
//! the traits it needs, so clients can pick the parts they want:
//!
//! * [`checkout_api`] places orders, either from an explicit list of lines or from the client's stored cart.
//! * [`tracking_api`] appends status changes to orders and serves the tracking history and order details.
//! * [`cart_api`] manages the lines a client has selected but not yet ordered.
//! * [`catalog_api`] reads products and the reference tables.
//!
//! ```rust,ignore
//! use storefront_engine::{CheckoutApi, SqliteDatabase, events::EventProducers};
//! let db = SqliteDatabase::new_with_url("sqlite://data/storefront.db", 10).await?;
//! let api = CheckoutApi::new(db, EventProducers::default());
//! let placed = api.place_order(request).await?;
//! ```
pub mod cart_api;
pub mod catalog_api;
pub mod checkout_api;
pub mod errors;
pub mod order_objects;
pub mod tracking_api;
