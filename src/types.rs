//! Core types for shipsplit

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Category assigned to every line item exactly once, during classification,
/// and reused by all downstream stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemCategory {
    /// Recurring lawn subscription plan; enriched from plan-composition data
    LawnPlan,
    /// One-time purchase (OTP-prefixed SKUs and anything unmatched)
    OneTime,
    /// Seasonal bundle that expands into a fixed sub-box of components
    Bundle,
    /// Accessory apportioned across shipments after packing (reusable sprayer)
    Accessory,
    /// Soil test kit; rides in the parent shipment regardless of capacity
    TestKit,
    /// Bulky item that reserves one capacity unit in the parent shipment only
    Anchor,
}

/// Weight units accepted on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnits {
    /// Ounces (engine-internal canonical unit)
    Ounces,
    /// Pounds
    Pounds,
    /// Grams
    Grams,
}

/// A shipment weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    /// Magnitude in `units`
    pub value: f64,
    /// Unit of measure
    pub units: WeightUnits,
}

impl Weight {
    /// Weight expressed in ounces
    pub const fn ounces(value: f64) -> Self {
        Self {
            value,
            units: WeightUnits::Ounces,
        }
    }

    /// Convert to ounces regardless of the declared unit
    pub fn to_ounces(&self) -> f64 {
        match self.units {
            WeightUnits::Ounces => self.value,
            WeightUnits::Pounds => self.value * 16.0,
            WeightUnits::Grams => self.value / 28.349_5,
        }
    }
}

/// Dimension units accepted on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnits {
    /// Inches
    Inches,
    /// Centimeters
    Centimeters,
}

/// Package dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Unit of measure
    pub units: DimensionUnits,
    /// Longest side
    pub length: f64,
    /// Second side
    pub width: f64,
    /// Third side
    pub height: f64,
}

impl Dimensions {
    /// Dimensions expressed in inches
    pub const fn inches(length: f64, width: f64, height: f64) -> Self {
        Self {
            units: DimensionUnits::Inches,
            length,
            width,
            height,
        }
    }
}

/// A postal address as carried on orders and shipments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Recipient name
    pub name: String,
    /// Company line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Street line 1
    pub street1: String,
    /// Street line 2
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street2: Option<String>,
    /// City
    pub city: String,
    /// State or province code
    pub state: String,
    /// Postal code
    pub postal_code: String,
    /// Country code
    pub country: String,
    /// Phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Residential delivery flag; carriers price these differently
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residential: Option<bool>,
}

/// Carrier-facing extra fields on an order or shipment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedOptions {
    /// Warehouse the shipment leaves from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<u64>,
    /// Store the order originated from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<u64>,
    /// Originating sales channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Set on every shipment of an order that was split
    #[serde(default)]
    pub merged_or_split: bool,
    /// Identifier of the parent order; present on child shipments only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
    /// Account billed for postage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_to_party: Option<String>,
    /// Billing account number when `bill_to_party` needs one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_to_account: Option<String>,
    /// Textual attribution field (comma-joined tag labels)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_field1: Option<String>,
    /// Shipment sequence field ("Shipment i of N") on split orders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_field2: Option<String>,
    /// Spare custom field, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_field3: Option<String>,
    /// Non-machinable handling flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_machinable: Option<bool>,
    /// Saturday delivery flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday_delivery: Option<bool>,
}

/// A line item on an inbound order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Upstream line item identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_item_id: Option<u64>,
    /// Stock keeping unit
    pub sku: String,
    /// Display name; rewritten during enrichment
    pub name: String,
    /// Unit count
    pub quantity: u32,
    /// Per-unit price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,
    /// Per-unit weight as supplied upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
}

impl OrderItem {
    /// Bare item with just the fields the engine computes with
    pub fn new(sku: impl Into<String>, name: impl Into<String>, quantity: u32) -> Self {
        Self {
            order_item_id: None,
            sku: sku.into(),
            name: name.into(),
            quantity,
            unit_price: None,
            weight: None,
        }
    }
}

/// An inbound commerce order, one per unit of work
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Upstream numeric identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
    /// External order number; a `-N` suffix marks an already-split child
    pub order_number: String,
    /// Upstream idempotency key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_key: Option<String>,
    /// When the order was placed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<DateTime<Utc>>,
    /// When the order was paid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<DateTime<Utc>>,
    /// Upstream status string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_status: Option<String>,
    /// Customer contact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    /// Billing address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_to: Option<Address>,
    /// Destination address
    pub ship_to: Address,
    /// Ordered line items
    pub items: Vec<OrderItem>,
    /// Order total
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_total: Option<Decimal>,
    /// Amount already paid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<Decimal>,
    /// Tag identifiers already attached upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<i64>>,
    /// Declared weight, replaced by preset resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
    /// Declared dimensions, replaced by preset resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    /// Carrier selection, replaced by rate shopping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier_code: Option<String>,
    /// Service selection, replaced by rate shopping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_code: Option<String>,
    /// Packaging selection, replaced by preset resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_code: Option<String>,
    /// Delivery confirmation level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<String>,
    /// Whether the alternate preset table applies to this order
    #[serde(default)]
    pub use_alternate_presets: bool,
    /// Carrier-facing extras
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_options: Option<AdvancedOptions>,
}

/// A finalized, carrier-ready shipment. Built fresh per bucket and never
/// mutated after assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentRecord {
    /// External order number, suffixed `-N` on split orders
    pub order_number: String,
    /// Idempotency key for this shipment
    pub order_key: String,
    /// Order date carried from the parent order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<DateTime<Utc>>,
    /// Payment date; cleared on child shipments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<DateTime<Utc>>,
    /// Submission status for the carrier platform
    pub order_status: String,
    /// Customer contact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    /// Billing address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_to: Option<Address>,
    /// Destination address
    pub ship_to: Address,
    /// Items allocated to this shipment, names already enriched
    pub items: Vec<OrderItem>,
    /// Order total; zero on child shipments
    pub order_total: Decimal,
    /// Amount paid; cleared on child shipments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<Decimal>,
    /// Derived tag identifiers, duplicate-free, in append order
    pub tag_ids: Vec<i64>,
    /// Final weight: preset base plus accumulated item weight
    pub weight: Weight,
    /// Final package dimensions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    /// Selected carrier; `None` when every rate quote failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier_code: Option<String>,
    /// Selected service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_code: Option<String>,
    /// Selected packaging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_code: Option<String>,
    /// Delivery confirmation level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<String>,
    /// Carrier-facing extras including lineage markers
    pub advanced_options: AdvancedOptions,
}

/// One component of a subscription plan's composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanComponent {
    /// Component display name, also the key into the component weight table
    pub name: String,
    /// Units of this component in the plan
    pub count: u32,
}

/// Pre-fetched plan-composition data for one order. The engine performs no
/// network calls for this; the upstream collaborator supplies it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanComposition {
    /// Plan SKU to its component breakdown
    #[serde(default)]
    pub plans: HashMap<String, Vec<PlanComponent>>,
    /// Accessory SKU to the unit count to inject for this order
    #[serde(default)]
    pub accessories: HashMap<String, u32>,
}

impl PlanComposition {
    /// Composition with no plan entries and no accessories
    pub fn empty() -> Self {
        Self::default()
    }
}

/// A non-fatal data gap or degradation surfaced to the batch caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// A subscription plan SKU had no entry in the composition payload
    CompositionMissing {
        /// The plan SKU that missed
        sku: String,
    },
    /// A plan or bundle component had no entry in the weight table
    ComponentWeightMissing {
        /// The component name that missed
        component: String,
    },
    /// A bundle's display name carried no recognized sub-box marker
    UnknownBundleMarker {
        /// The bundle SKU
        sku: String,
    },
    /// Every carrier tuple failed to quote; the shipment has no carrier
    NoRate {
        /// Order number of the affected shipment
        order_number: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompositionMissing { sku } => {
                write!(f, "no plan composition supplied for subscription {sku}")
            }
            Self::ComponentWeightMissing { component } => {
                write!(f, "no weight configured for component {component:?}")
            }
            Self::UnknownBundleMarker { sku } => {
                write!(f, "bundle {sku} has no recognized sub-box marker in its name")
            }
            Self::NoRate { order_number } => {
                write!(f, "no carrier returned a rate for shipment {order_number}")
            }
        }
    }
}
