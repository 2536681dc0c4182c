//! Built-in production tables

use super::{
    AdvancedOptionsPatch, BatchRules, BundleItem, BundleRules, BundleVariant, CapacityRules,
    CarrierAccount, ClassificationRules, FulfillmentConfig, NamingRules, OrderTag, Preset,
    PresetRules, PresetTable, RateShopRules, TagRules, WeightTable,
};
use crate::types::{Dimensions, ItemCategory, Weight};
use std::collections::{HashMap, HashSet};

/// Capacity units one shipment can hold
pub const SHIPMENT_LIMIT: u32 = 9;

/// Soil test kit SKU, shipped with the parent box regardless of capacity
pub const TEST_KIT_SKU: &str = "OTP - STK";

/// Handheld spreader SKU, reserves one capacity unit in the parent box
pub const SPREADER_SKU: &str = "OTP - SPREADER";

/// Hose-end sprayer SKU, riding along with plan pouches
pub const SPRAYER_SKU: &str = "ACC - SPRAYER";

fn string_map<const N: usize>(entries: [(&str, &str); N]) -> HashMap<String, String> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn string_set<const N: usize>(entries: [&str; N]) -> HashSet<String> {
    entries.into_iter().map(str::to_string).collect()
}

fn capacity() -> CapacityRules {
    CapacityRules {
        shipment_limit: SHIPMENT_LIMIT,
        unit_costs: [
            ("05000", 2),
            ("10000", 4),
            ("15000", 6),
            ("SUB - LAWN - S", 2),
            ("SUB - LAWN - M", 4),
            ("SUB - LAWN - L", 6),
            ("SUB - LG - D", 1),
            ("SUB - LG - S", 1),
            ("SUB - LG - G", 1),
            (TEST_KIT_SKU, 0),
            (SPRAYER_SKU, 0),
            (SPREADER_SKU, 1),
        ]
        .into_iter()
        .map(|(sku, cost)| (sku.to_string(), cost))
        .collect(),
        sticky_skus: string_set([TEST_KIT_SKU]),
        anchor_sku: Some(SPREADER_SKU.to_string()),
        anchor_count: 1,
        accessory_eligible_skus: string_set([
            "05000",
            "10000",
            "15000",
            "SUB - LAWN - S",
            "SUB - LAWN - M",
            "SUB - LAWN - L",
            "SUB - LG - D",
            "SUB - LG - S",
            "SUB - LG - G",
        ]),
    }
}

fn classification() -> ClassificationRules {
    ClassificationRules {
        exact: [
            ("05000", ItemCategory::LawnPlan),
            ("10000", ItemCategory::LawnPlan),
            ("15000", ItemCategory::LawnPlan),
            (TEST_KIT_SKU, ItemCategory::TestKit),
            (SPREADER_SKU, ItemCategory::Anchor),
        ]
        .into_iter()
        .map(|(sku, category)| (sku.to_string(), category))
        .collect(),
        prefixes: vec![
            ("SUB".to_string(), ItemCategory::LawnPlan),
            ("BNDL".to_string(), ItemCategory::Bundle),
            ("ACC".to_string(), ItemCategory::Accessory),
            ("OTP".to_string(), ItemCategory::OneTime),
        ],
        default: ItemCategory::OneTime,
        standalone_subscriptions: string_set(["SUB - LG - D", "SUB - LG - S", "SUB - LG - G"]),
    }
}

fn naming() -> NamingRules {
    NamingRules {
        replacements: string_map([
            ("05000", "Annual Lawn Plan | 5,000 sq ft"),
            ("10000", "Annual Lawn Plan | 10,000 sq ft"),
            ("15000", "Annual Lawn Plan | 15,000 sq ft"),
            ("SUB - LAWN - S", "Custom Lawn Plan | Small Yard"),
            ("SUB - LAWN - M", "Custom Lawn Plan | Medium Yard"),
            ("SUB - LAWN - L", "Custom Lawn Plan | Large Yard"),
            ("SUB - LG - D", "Lawn Guard | Defense"),
            ("SUB - LG - S", "Lawn Guard | Shield"),
            ("SUB - LG - G", "Lawn Guard | Grub Stop"),
            (TEST_KIT_SKU, "Soil Test Kit"),
            (SPREADER_SKU, "Handheld Broadcast Spreader"),
            (SPRAYER_SKU, "Reusable Hose-End Sprayer"),
            ("OTP - LFF", "Lawn Food | Fast Green"),
            ("OTP - WCF", "Weed Control | Crabgrass Fighter"),
            ("OTP - SEED - S", "Southern Seed Mix"),
            ("OTP - SEED - N", "Northern Seed Mix"),
        ]),
    }
}

fn weights() -> WeightTable {
    WeightTable {
        ounces_by_component: [
            ("Lawn Food", 38.0),
            ("Weed Control", 34.0),
            ("Grub Guard", 30.0),
            ("Mosquito Deleter", 28.0),
            ("Soil Booster", 36.0),
            ("Lawn Guard | Defense", 32.0),
            ("Lawn Guard | Shield", 32.0),
            ("Lawn Guard | Grub Stop", 32.0),
            ("Southern Seed Mix", 48.0),
            ("Northern Seed Mix", 48.0),
            ("Soil Test Kit", 4.0),
            ("Reusable Hose-End Sprayer", 6.0),
            ("Handheld Broadcast Spreader", 24.0),
            ("Lawn Food | Fast Green", 38.0),
            ("Weed Control | Crabgrass Fighter", 34.0),
        ]
        .into_iter()
        .map(|(name, ounces)| (name.to_string(), ounces))
        .collect(),
    }
}

fn bundles() -> BundleRules {
    let starter = vec![
        BundleVariant {
            marker: "(South)".to_string(),
            items: vec![
                BundleItem {
                    sku: "OTP - SEED - S".to_string(),
                    name: "Southern Seed Mix".to_string(),
                    count: 1,
                },
                BundleItem {
                    sku: "OTP - LFF".to_string(),
                    name: "Lawn Food | Fast Green".to_string(),
                    count: 2,
                },
            ],
        },
        BundleVariant {
            marker: "(North)".to_string(),
            items: vec![
                BundleItem {
                    sku: "OTP - SEED - N".to_string(),
                    name: "Northern Seed Mix".to_string(),
                    count: 1,
                },
                BundleItem {
                    sku: "OTP - LFF".to_string(),
                    name: "Lawn Food | Fast Green".to_string(),
                    count: 2,
                },
            ],
        },
    ];
    BundleRules {
        bundles: [("BNDL - STARTER".to_string(), starter)]
            .into_iter()
            .collect(),
    }
}

fn box_preset(ounces: f64, length: f64, width: f64, height: f64, warehouse_id: u64) -> Preset {
    Preset {
        weight: Some(Weight::ounces(ounces)),
        dimensions: Some(Dimensions::inches(length, width, height)),
        package_code: Some("package".to_string()),
        carrier_code: None,
        service_code: None,
        confirmation: Some("delivery".to_string()),
        advanced: AdvancedOptionsPatch {
            warehouse_id: Some(warehouse_id),
            ..AdvancedOptionsPatch::default()
        },
    }
}

fn usage_keyed(warehouse_id: u64) -> PresetTable {
    // Box size steps up with pouch count; base weight covers box and dunnage.
    let by_usage = [
        ("1", box_preset(6.0, 8.0, 6.0, 4.0, warehouse_id)),
        ("2", box_preset(8.0, 10.0, 8.0, 4.0, warehouse_id)),
        ("3", box_preset(11.0, 12.0, 10.0, 6.0, warehouse_id)),
        ("4", box_preset(12.0, 12.0, 10.0, 6.0, warehouse_id)),
        ("5", box_preset(14.0, 14.0, 12.0, 6.0, warehouse_id)),
        ("6", box_preset(15.0, 14.0, 12.0, 6.0, warehouse_id)),
        ("7", box_preset(18.0, 16.0, 12.0, 8.0, warehouse_id)),
        ("8", box_preset(19.0, 16.0, 12.0, 8.0, warehouse_id)),
        ("9", box_preset(20.0, 16.0, 12.0, 8.0, warehouse_id)),
    ]
    .into_iter()
    .map(|(usage, preset)| (usage.to_string(), preset))
    .collect();
    PresetTable { by_usage }
}

fn presets() -> PresetRules {
    let zero_usage = Preset {
        weight: Some(Weight::ounces(8.0)),
        dimensions: Some(Dimensions::inches(12.5, 9.5, 1.0)),
        package_code: Some("package".to_string()),
        carrier_code: None,
        service_code: None,
        confirmation: Some("delivery".to_string()),
        advanced: AdvancedOptionsPatch {
            warehouse_id: Some(101),
            ..AdvancedOptionsPatch::default()
        },
    };
    let single_purpose = Preset {
        weight: Some(Weight::ounces(5.0)),
        dimensions: Some(Dimensions::inches(9.0, 7.0, 3.0)),
        package_code: Some("package".to_string()),
        carrier_code: None,
        service_code: None,
        confirmation: Some("delivery".to_string()),
        advanced: AdvancedOptionsPatch {
            warehouse_id: Some(101),
            ..AdvancedOptionsPatch::default()
        },
    };
    PresetRules {
        zero_usage,
        single_purpose,
        single_purpose_skus: string_set(["SUB - LG - D", "SUB - LG - S", "SUB - LG - G"]),
        standard: usage_keyed(101),
        alternate: usage_keyed(202),
    }
}

fn tags() -> TagRules {
    let usage_tags = (0..=SHIPMENT_LIMIT)
        .map(|usage| {
            let label = if usage == 1 {
                "1 Pouch".to_string()
            } else {
                format!("{usage} Pouches")
            };
            (usage, OrderTag::new(20900 + i64::from(usage), label))
        })
        .collect();
    TagRules {
        channel_tags: vec![
            OrderTag::new(20101, "Amazon"),
            OrderTag::new(20102, "Walmart"),
        ],
        first_order: OrderTag::new(20110, "Subscription First Order"),
        recurring: OrderTag::new(20111, "Subscription Recurring"),
        sku_markers: vec![
            (TEST_KIT_SKU.to_string(), OrderTag::new(20120, "STK-Order")),
            ("SUB - LG".to_string(), OrderTag::new(20121, "Lawn Guard")),
        ],
        otp_only: OrderTag::new(20130, "OTP Only"),
        single_shipment_threshold: SHIPMENT_LIMIT,
        usage_tags,
    }
}

fn rate_shop() -> RateShopRules {
    RateShopRules {
        accounts: vec![
            CarrierAccount {
                carrier_code: "fedex".to_string(),
                service_code: "fedex_home_delivery".to_string(),
                bill_to_party: None,
            },
            CarrierAccount {
                carrier_code: "ups_walleted".to_string(),
                service_code: "ups_ground".to_string(),
                bill_to_party: None,
            },
            CarrierAccount {
                carrier_code: "ups".to_string(),
                service_code: "ups_ground".to_string(),
                bill_to_party: Some("my_other_account".to_string()),
            },
        ],
        origin_postal_code: "30318".to_string(),
        timeout_secs: 30,
    }
}

fn batch() -> BatchRules {
    BatchRules {
        max_concurrent_orders: 9,
        retry_backoff_secs: 30,
        split_bill_to_party: Some("my_other_account".to_string()),
    }
}

pub fn production() -> FulfillmentConfig {
    FulfillmentConfig {
        capacity: capacity(),
        classification: classification(),
        naming: naming(),
        weights: weights(),
        bundles: bundles(),
        presets: presets(),
        tags: tags(),
        rate_shop: rate_shop(),
        batch: batch(),
    }
}
