//! Purchase service sitting between command handlers and the fulfillment engine.
//!
//! [`Storefront`] checks an order against the catalog, quotes its price, and
//! runs the delivery resolver. Callers deduct currency only after receiving a
//! [`Receipt`], and refund [`Receipt::refund_due`] for anything undelivered.
pub mod config;
pub mod error;
pub mod service;

pub use config::StorefrontConfig;
pub use error::PurchaseError;
pub use service::{Listing, Quote, Receipt, Storefront};
