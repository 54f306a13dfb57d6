//! # Storefront server
//! This crate hosts the HTTP API of the storefront. It is responsible for:
//! * Accepting orders from the storefront frontend and handing them to the checkout engine.
//! * Recording delivery progress and serving tracking history and order details.
//! * Serving the cart and the reference data the frontend needs to build an order.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! All API routes live under `/api`. See [routes](routes/index.html) for the full list. `/health` returns 200 OK.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
