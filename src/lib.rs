//! shipsplit - Order decomposition and shipment normalization for
//! subscription fulfillment
//!
//! Takes inbound marketplace orders, enriches their line items, packs units
//! into capacity-bounded shipments, resolves packaging presets and routing
//! tags, shops carrier rates concurrently, and submits parent and child
//! shipment records back to the fulfillment platform.

pub mod allocate;
pub mod classify;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod shipment;
pub mod types;

pub use error::{Error, Result};
