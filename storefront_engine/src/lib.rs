//! Storefront Engine
//!
//! The storefront engine holds the order-placement and order-tracking workflow of a small e-commerce store.
//!
//! The library is divided into these sections:
//! 1. Storage ([`mod@traits`] and the SQLite backend). The traits define what a backend must provide; [`SqliteDatabase`]
//!    implements them. The record types live in [`mod@db_types`] and are public.
//! 2. The public API ([`mod@sf_api`]). Clients should go through these APIs rather than the backend directly, since
//!    the APIs carry the validation rules and fire the lifecycle events.
//!
//! The engine also emits events when an order is placed and when an order changes status. See [`mod@events`].
pub mod db_types;
pub mod events;
pub mod sf_api;
pub mod traits;
pub mod transitions;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::{db::DbSettings, SqliteDatabase};
pub use sf_api::{
    cart_api::CartApi,
    catalog_api::CatalogApi,
    checkout_api::CheckoutApi,
    errors::{OrderFlowError, ValidationError},
    order_objects,
    tracking_api::TrackingApi,
};
pub use traits::{CartManagement, CatalogManagement, OrderManagement, StoreError, TrackingManagement};
pub use transitions::TransitionPolicy;
