//! # Storefront backend contracts
//!
//! This module defines the behaviour a database backend needs to expose in order to be used by the storefront APIs.
//!
//! * [`OrderManagement`] places orders atomically and reads them back.
//! * [`TrackingManagement`] appends status-change events to orders and reads the tracking history.
//! * [`CartManagement`] is the cart collaborator that checkout reads from and clears.
//! * [`CatalogManagement`] provides read access to products and the reference tables.
//!
//! All of them report failures with [`StoreError`].
mod cart_management;
mod catalog_management;
mod order_management;
mod store_error;
mod tracking_management;

pub use cart_management::CartManagement;
pub use catalog_management::CatalogManagement;
pub use order_management::OrderManagement;
pub use store_error::StoreError;
pub use tracking_management::TrackingManagement;
