//! Static fulfillment configuration
//!
//! Every table the engine consults lives here: capacity costs, SKU
//! classification rules, display-name replacements, component weights, bundle
//! expansions, preset tables, tag rules, the rate-shop account list, and batch
//! tuning. `FulfillmentConfig::production()` returns the built-in tables;
//! deployments can load overrides from JSON.

mod defaults;

use crate::error::{Error, Result};
use crate::types::{AdvancedOptions, Dimensions, ItemCategory, Weight};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;

/// Capacity accounting and placement rules for the allocator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityRules {
    /// Capacity units one shipment can hold
    pub shipment_limit: u32,
    /// Per-unit capacity cost by SKU
    pub unit_costs: HashMap<String, u32>,
    /// SKUs forced into the parent shipment regardless of remaining capacity
    pub sticky_skus: HashSet<String>,
    /// SKU that reserves one capacity unit against the parent shipment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_sku: Option<String>,
    /// Unit count the anchor is re-appended with after packing
    pub anchor_count: u32,
    /// SKUs whose presence makes a bucket eligible to receive accessories
    pub accessory_eligible_skus: HashSet<String>,
}

impl CapacityRules {
    /// Capacity cost of one unit of `sku`; unmapped SKUs cost 1
    pub fn unit_cost(&self, sku: &str) -> u32 {
        self.unit_costs.get(sku).copied().unwrap_or(1)
    }

    /// Whether `sku` is forced into the parent shipment
    pub fn is_sticky(&self, sku: &str) -> bool {
        self.sticky_skus.contains(sku)
    }

    /// Whether `sku` is the anchor item
    pub fn is_anchor(&self, sku: &str) -> bool {
        self.anchor_sku.as_deref() == Some(sku)
    }
}

/// SKU-pattern classification tables: exact matches first, then prefixes,
/// then the default category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRules {
    /// Exact SKU to category
    pub exact: HashMap<String, ItemCategory>,
    /// SKU prefix to category, first match wins
    pub prefixes: Vec<(String, ItemCategory)>,
    /// Category for SKUs no rule matches
    pub default: ItemCategory,
    /// Subscription SKUs that never carry plan-composition data, so a
    /// composition miss for them is expected rather than a data gap
    pub standalone_subscriptions: HashSet<String>,
}

impl ClassificationRules {
    /// Classify a SKU against the tables
    pub fn classify(&self, sku: &str) -> ItemCategory {
        if let Some(category) = self.exact.get(sku) {
            return *category;
        }
        for (prefix, category) in &self.prefixes {
            if sku.starts_with(prefix.as_str()) {
                return *category;
            }
        }
        self.default
    }

    /// Whether a composition miss for `sku` is expected
    pub fn is_standalone_subscription(&self, sku: &str) -> bool {
        self.standalone_subscriptions.contains(sku)
    }
}

/// Display-name replacement table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingRules {
    /// SKU to replacement display name
    pub replacements: HashMap<String, String>,
}

impl NamingRules {
    /// Replacement display name for `sku`, if configured
    pub fn replacement(&self, sku: &str) -> Option<&str> {
        self.replacements.get(sku).map(String::as_str)
    }
}

/// Static per-component unit weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightTable {
    /// Component display name to weight in ounces
    pub ounces_by_component: HashMap<String, f64>,
}

impl WeightTable {
    /// Unit weight of a component in ounces, if configured
    pub fn component_ounces(&self, component: &str) -> Option<f64> {
        self.ounces_by_component.get(component).copied()
    }
}

/// One item injected by a bundle expansion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleItem {
    /// SKU of the injected item
    pub sku: String,
    /// Display name of the injected item
    pub name: String,
    /// Units injected per bundle unit
    pub count: u32,
}

/// One sub-box variant of a bundle, selected by a display-name marker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleVariant {
    /// Literal marker searched for in the bundle's display name
    pub marker: String,
    /// Items this variant expands into
    pub items: Vec<BundleItem>,
}

/// Bundle expansion table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleRules {
    /// Bundle SKU to its ordered variant list; the first marker found in the
    /// display name selects the variant
    pub bundles: HashMap<String, Vec<BundleVariant>>,
}

impl BundleRules {
    /// Variants configured for a bundle SKU
    pub fn variants(&self, sku: &str) -> Option<&[BundleVariant]> {
        self.bundles.get(sku).map(Vec::as_slice)
    }
}

/// Named-key overrides for a shipment's advanced options. Absent keys
/// preserve the shipment's existing values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedOptionsPatch {
    /// Warehouse override
    pub warehouse_id: Option<u64>,
    /// Billing party override
    pub bill_to_party: Option<String>,
    /// Non-machinable flag override
    pub non_machinable: Option<bool>,
    /// Saturday delivery flag override
    pub saturday_delivery: Option<bool>,
}

impl AdvancedOptionsPatch {
    /// Merge this patch into `options`: present keys override, absent keys
    /// are preserved.
    pub fn apply_to(&self, options: &mut AdvancedOptions) {
        if let Some(warehouse_id) = self.warehouse_id {
            options.warehouse_id = Some(warehouse_id);
        }
        if let Some(ref bill_to_party) = self.bill_to_party {
            options.bill_to_party = Some(bill_to_party.clone());
        }
        if let Some(non_machinable) = self.non_machinable {
            options.non_machinable = Some(non_machinable);
        }
        if let Some(saturday_delivery) = self.saturday_delivery {
            options.saturday_delivery = Some(saturday_delivery);
        }
    }
}

/// A configuration template merged into a bucket's working shipment.
/// Present fields override; absent fields preserve the bucket's values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    /// Declared base weight; accumulated item weight is added on top
    pub weight: Option<Weight>,
    /// Package dimensions
    pub dimensions: Option<Dimensions>,
    /// Packaging selection
    pub package_code: Option<String>,
    /// Default carrier (rate shopping may replace it)
    pub carrier_code: Option<String>,
    /// Default service
    pub service_code: Option<String>,
    /// Delivery confirmation level
    pub confirmation: Option<String>,
    /// Field-wise patch over advanced options
    pub advanced: AdvancedOptionsPatch,
}

/// A preset table keyed by the literal string form of capacity usage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetTable {
    /// Usage string (e.g. `"7"`) to preset
    pub by_usage: HashMap<String, Preset>,
}

impl PresetTable {
    /// Preset for a capacity usage value, if configured
    pub fn for_usage(&self, usage: u32) -> Option<&Preset> {
        self.by_usage.get(&usage.to_string())
    }
}

/// Preset resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetRules {
    /// Dedicated preset for zero-capacity-usage buckets
    pub zero_usage: Preset,
    /// Dedicated preset for single-purpose compositions
    pub single_purpose: Preset,
    /// SKUs forming a single-purpose composition
    pub single_purpose_skus: HashSet<String>,
    /// Standard usage-keyed table
    pub standard: PresetTable,
    /// Alternate usage-keyed table, selected per order
    pub alternate: PresetTable,
}

/// A platform tag: numeric identifier plus the label rendered into the
/// textual attribution field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTag {
    /// Numeric tag identifier on the carrier platform
    pub id: i64,
    /// Label as rendered in the textual field
    pub label: String,
}

impl OrderTag {
    /// Construct a tag
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// Tag derivation rule tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRules {
    /// Channel/marketing tags propagated from the lineage field
    pub channel_tags: Vec<OrderTag>,
    /// Status tag for first subscription orders
    pub first_order: OrderTag,
    /// Status tag for recurring subscription orders
    pub recurring: OrderTag,
    /// SKU substring markers applied to non-one-time items
    pub sku_markers: Vec<(String, OrderTag)>,
    /// Tag for buckets holding only one-time-purchase items
    pub otp_only: OrderTag,
    /// Inclusive capacity-usage threshold for usage tags
    pub single_shipment_threshold: u32,
    /// Capacity usage value to tag
    pub usage_tags: HashMap<u32, OrderTag>,
}

/// One carrier/service/billing tuple; rate-shopped in configured order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierAccount {
    /// Carrier code on the platform (e.g. `fedex`, `ups_walleted`)
    pub carrier_code: String,
    /// Service code to quote
    pub service_code: String,
    /// Billing party set on the shipment when this tuple wins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_to_party: Option<String>,
}

/// Rate shopping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateShopRules {
    /// Ordered carrier tuples; earlier entries win exact ties
    pub accounts: Vec<CarrierAccount>,
    /// Origin postal code of the warehouse
    pub origin_postal_code: String,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
}

impl RateShopRules {
    /// Per-call timeout
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Batch orchestration tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRules {
    /// Orders processed in parallel
    pub max_concurrent_orders: usize,
    /// Fixed backoff before the single rate-limited retry, in seconds
    pub retry_backoff_secs: u64,
    /// Billing party applied to every shipment of a split order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_bill_to_party: Option<String>,
}

impl BatchRules {
    /// Fixed backoff before the single rate-limited retry
    pub const fn retry_backoff(&self) -> Duration {
        Duration::from_secs(self.retry_backoff_secs)
    }
}

/// The full static configuration consumed by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FulfillmentConfig {
    /// Capacity and placement rules
    pub capacity: CapacityRules,
    /// SKU classification tables
    pub classification: ClassificationRules,
    /// Display-name replacements
    pub naming: NamingRules,
    /// Component weight table
    pub weights: WeightTable,
    /// Bundle expansion table
    pub bundles: BundleRules,
    /// Preset resolution tables
    pub presets: PresetRules,
    /// Tag derivation tables
    pub tags: TagRules,
    /// Rate shopping accounts and tuning
    pub rate_shop: RateShopRules,
    /// Batch orchestration tuning
    pub batch: BatchRules,
}

impl FulfillmentConfig {
    /// Built-in production tables
    pub fn production() -> Self {
        defaults::production()
    }

    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_cost_defaults_to_one() {
        let config = FulfillmentConfig::production();
        assert_eq!(config.capacity.unit_cost("NEVER-MAPPED"), 1);
    }

    #[test]
    fn test_classification_exact_beats_prefix() {
        let config = FulfillmentConfig::production();
        // "OTP - STK" matches the "OTP" prefix but the exact rule wins
        assert_eq!(
            config.classification.classify("OTP - STK"),
            ItemCategory::TestKit
        );
        assert_eq!(
            config.classification.classify("OTP - WCF"),
            ItemCategory::OneTime
        );
    }

    #[test]
    fn test_classification_default_is_one_time() {
        let config = FulfillmentConfig::production();
        assert_eq!(
            config.classification.classify("SOMETHING-ELSE"),
            ItemCategory::OneTime
        );
    }

    #[test]
    fn test_lawn_plan_rules_match_legacy_skus() {
        let config = FulfillmentConfig::production();
        for sku in ["05000", "10000", "15000", "SUB - LAWN - M"] {
            assert_eq!(config.classification.classify(sku), ItemCategory::LawnPlan);
        }
    }

    #[test]
    fn test_lawn_guard_is_standalone_subscription() {
        let config = FulfillmentConfig::production();
        assert_eq!(
            config.classification.classify("SUB - LG - D"),
            ItemCategory::LawnPlan
        );
        assert!(config.classification.is_standalone_subscription("SUB - LG - D"));
        assert!(!config.classification.is_standalone_subscription("05000"));
    }

    #[test]
    fn test_production_presets_cover_full_usage_range() {
        let config = FulfillmentConfig::production();
        for usage in 0..=config.capacity.shipment_limit {
            if usage == 0 {
                continue; // zero usage has its own dedicated preset
            }
            assert!(
                config.presets.standard.for_usage(usage).is_some(),
                "standard preset table missing usage {usage}"
            );
            assert!(
                config.presets.alternate.for_usage(usage).is_some(),
                "alternate preset table missing usage {usage}"
            );
        }
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = FulfillmentConfig::production();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = FulfillmentConfig::from_json(&json).unwrap();
        assert_eq!(
            parsed.capacity.shipment_limit,
            config.capacity.shipment_limit
        );
        assert_eq!(parsed.rate_shop.accounts.len(), config.rate_shop.accounts.len());
    }

    #[test]
    fn test_advanced_options_patch_preserves_absent_keys() {
        let mut options = AdvancedOptions {
            warehouse_id: Some(7),
            custom_field1: Some("Amazon".to_string()),
            ..AdvancedOptions::default()
        };
        let patch = AdvancedOptionsPatch {
            bill_to_party: Some("my_other_account".to_string()),
            ..AdvancedOptionsPatch::default()
        };
        patch.apply_to(&mut options);
        assert_eq!(options.warehouse_id, Some(7));
        assert_eq!(options.bill_to_party.as_deref(), Some("my_other_account"));
        assert_eq!(options.custom_field1.as_deref(), Some("Amazon"));
    }
}
