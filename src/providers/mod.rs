//! Carrier platform providers
//!
//! The engine's two external collaborators sit behind traits: rate quoting
//! and shipment submission. The production implementation talks to the
//! ShipStation v1 API; tests swap in mocks.

mod shipstation;

pub use shipstation::{SHIPSTATION_BASE_URL, ShipStationClient};

use crate::config::CarrierAccount;
use crate::error::Result;
use crate::types::{Dimensions, ShipmentRecord, Weight};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// One rate-quote request for a single carrier/service tuple
#[derive(Debug, Clone)]
pub struct RateRequest {
    /// Carrier to quote
    pub carrier_code: String,
    /// Service to quote
    pub service_code: String,
    /// Packaging selection
    pub package_code: Option<String>,
    /// Origin postal code
    pub from_postal_code: String,
    /// Destination state
    pub to_state: String,
    /// Destination country
    pub to_country: String,
    /// Destination postal code
    pub to_postal_code: String,
    /// Package weight
    pub weight: Weight,
    /// Package dimensions
    pub dimensions: Option<Dimensions>,
    /// Delivery confirmation level
    pub confirmation: Option<String>,
    /// Residential destination flag
    pub residential: bool,
}

impl RateRequest {
    /// Build the quote request for one shipment against one carrier tuple
    pub fn for_shipment(
        shipment: &ShipmentRecord,
        account: &CarrierAccount,
        origin_postal_code: &str,
    ) -> Self {
        Self {
            carrier_code: account.carrier_code.clone(),
            service_code: account.service_code.clone(),
            package_code: shipment.package_code.clone(),
            from_postal_code: origin_postal_code.to_string(),
            to_state: shipment.ship_to.state.clone(),
            to_country: shipment.ship_to.country.clone(),
            to_postal_code: shipment.ship_to.postal_code.clone(),
            weight: shipment.weight,
            dimensions: shipment.dimensions,
            confirmation: shipment.confirmation.clone(),
            residential: shipment.ship_to.residential.unwrap_or(false),
        }
    }
}

/// Receipt returned by a successful shipment submission
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    /// Platform identifier of the created shipment order
    pub order_id: Option<u64>,
    /// Order number echoed by the platform
    pub order_number: String,
}

/// Rate-quote provider for a single carrier tuple
///
/// A failed quote is an ordinary `Err`; the rate shop catches it locally and
/// treats the tuple as having no rate. `Error::RateLimited` is the one
/// variant callers inspect.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Total postage cost for the request, or an error for this tuple only
    async fn quote(&self, request: &RateRequest) -> Result<Decimal>;
}

/// Shipment submission provider
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    /// Create or update one shipment order on the platform
    async fn submit(&self, shipment: &ShipmentRecord) -> Result<SubmitReceipt>;
}
