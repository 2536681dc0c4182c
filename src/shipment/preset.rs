//! Preset resolution and merge

use crate::allocate::Bucket;
use crate::config::{Preset, PresetRules};
use crate::error::{Error, Result};
use crate::types::{ShipmentRecord, Weight};
use tracing::debug;

/// Resolve the preset for a bucket.
///
/// Resolution order: a dedicated preset for zero capacity usage, then a
/// dedicated preset when every non-accessory SKU falls inside the configured
/// single-purpose set, then a lookup keyed on the literal usage value in the
/// active table. An order can opt into the alternate table. A usage value
/// with no preset is a hard failure rather than a silent pass-through.
pub fn resolve_preset<'a>(
    presets: &'a PresetRules,
    bucket: &Bucket,
    is_parent: bool,
    use_alternate: bool,
) -> Result<&'a Preset> {
    let usage = bucket.usage();
    debug!(usage, is_parent, use_alternate, "resolving preset");

    if usage == 0 {
        return Ok(&presets.zero_usage);
    }
    if bucket.is_single_purpose(&presets.single_purpose_skus) {
        return Ok(&presets.single_purpose);
    }
    let table = if use_alternate {
        &presets.alternate
    } else {
        &presets.standard
    };
    table.for_usage(usage).ok_or_else(|| {
        Error::PresetNotFound(format!(
            "no {} preset configured for capacity usage {usage}",
            if use_alternate { "alternate" } else { "standard" }
        ))
    })
}

/// Merge a preset into a draft shipment.
///
/// Preset-specified keys override the draft; absent keys preserve the draft's
/// existing values, including inside the nested advanced options. The
/// accumulated item weight is added on top of the preset's declared base
/// weight, never replacing it. Called exactly once per bucket.
pub fn apply_preset(record: &mut ShipmentRecord, preset: &Preset, added_ounces: f64) {
    let base_ounces = preset
        .weight
        .as_ref()
        .map_or_else(|| record.weight.to_ounces(), Weight::to_ounces);
    record.weight = Weight::ounces((base_ounces + added_ounces).max(0.0));

    if let Some(dimensions) = preset.dimensions {
        record.dimensions = Some(dimensions);
    }
    if let Some(ref package_code) = preset.package_code {
        record.package_code = Some(package_code.clone());
    }
    if let Some(ref carrier_code) = preset.carrier_code {
        record.carrier_code = Some(carrier_code.clone());
    }
    if let Some(ref service_code) = preset.service_code {
        record.service_code = Some(service_code.clone());
    }
    if let Some(ref confirmation) = preset.confirmation {
        record.confirmation = Some(confirmation.clone());
    }
    preset.advanced.apply_to(&mut record.advanced_options);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocate::BucketItem;
    use crate::classify::EnrichedItem;
    use crate::config::{AdvancedOptionsPatch, FulfillmentConfig};
    use crate::types::{Address, AdvancedOptions, Dimensions, ItemCategory, OrderItem};
    use rust_decimal::Decimal;

    fn make_bucket(entries: &[(&str, u32, ItemCategory)], capacity_used: u32) -> Bucket {
        Bucket {
            items: entries
                .iter()
                .map(|(sku, units, category)| BucketItem {
                    line: EnrichedItem {
                        item: OrderItem::new(*sku, sku.to_lowercase(), *units),
                        category: *category,
                        unit_ounces: 0.0,
                    },
                    units: *units,
                })
                .collect(),
            capacity_used,
        }
    }

    fn make_record() -> ShipmentRecord {
        ShipmentRecord {
            order_number: "1001".to_string(),
            order_key: "key".to_string(),
            order_date: None,
            payment_date: None,
            order_status: "awaiting_shipment".to_string(),
            customer_email: None,
            bill_to: None,
            ship_to: Address {
                name: "Pat Doe".to_string(),
                company: None,
                street1: "1 Elm St".to_string(),
                street2: None,
                city: "Atlanta".to_string(),
                state: "GA".to_string(),
                postal_code: "30303".to_string(),
                country: "US".to_string(),
                phone: None,
                residential: Some(true),
            },
            items: Vec::new(),
            order_total: Decimal::ZERO,
            amount_paid: None,
            tag_ids: Vec::new(),
            weight: Weight::ounces(0.0),
            dimensions: None,
            carrier_code: None,
            service_code: None,
            package_code: None,
            confirmation: None,
            advanced_options: AdvancedOptions::default(),
        }
    }

    #[test]
    fn test_zero_usage_gets_the_dedicated_preset() {
        let config = FulfillmentConfig::production();
        let bucket = make_bucket(&[("OTP - STK", 1, ItemCategory::TestKit)], 0);

        let preset = resolve_preset(&config.presets, &bucket, true, false).unwrap();
        assert_eq!(preset.weight, config.presets.zero_usage.weight);
    }

    #[test]
    fn test_single_purpose_composition_gets_its_preset() {
        let config = FulfillmentConfig::production();
        let bucket = make_bucket(&[("SUB - LG - D", 2, ItemCategory::LawnPlan)], 2);

        let preset = resolve_preset(&config.presets, &bucket, true, false).unwrap();
        assert_eq!(preset.weight, config.presets.single_purpose.weight);
    }

    #[test]
    fn test_accessories_do_not_break_single_purpose() {
        let config = FulfillmentConfig::production();
        let bucket = make_bucket(
            &[
                ("SUB - LG - S", 1, ItemCategory::LawnPlan),
                ("ACC - SPRAYER", 1, ItemCategory::Accessory),
            ],
            1,
        );

        let preset = resolve_preset(&config.presets, &bucket, true, false).unwrap();
        assert_eq!(preset.weight, config.presets.single_purpose.weight);
    }

    #[test]
    fn test_usage_lookup_in_standard_table() {
        let config = FulfillmentConfig::production();
        let bucket = make_bucket(&[("05000", 2, ItemCategory::LawnPlan)], 4);

        let preset = resolve_preset(&config.presets, &bucket, true, false).unwrap();
        let expected = config.presets.standard.for_usage(4).unwrap();
        assert_eq!(preset.weight, expected.weight);
        assert_eq!(preset.dimensions, expected.dimensions);
    }

    #[test]
    fn test_alternate_table_is_honored() {
        let config = FulfillmentConfig::production();
        let bucket = make_bucket(&[("05000", 1, ItemCategory::LawnPlan)], 2);

        let preset = resolve_preset(&config.presets, &bucket, false, true).unwrap();
        let expected = config.presets.alternate.for_usage(2).unwrap();
        assert_eq!(preset.advanced.warehouse_id, expected.advanced.warehouse_id);
    }

    #[test]
    fn test_missing_usage_key_fails_loudly() {
        let config = FulfillmentConfig::production();
        let bucket = make_bucket(&[("05000", 1, ItemCategory::LawnPlan)], 99);

        let err = resolve_preset(&config.presets, &bucket, false, false).unwrap_err();
        assert!(matches!(err, Error::PresetNotFound(_)));
    }

    #[test]
    fn test_merge_overrides_named_keys_and_keeps_the_rest() {
        let mut record = make_record();
        record.confirmation = Some("signature".to_string());
        record.advanced_options.custom_field1 = Some("Amazon".to_string());
        record.advanced_options.warehouse_id = Some(7);

        let preset = Preset {
            weight: Some(Weight::ounces(11.0)),
            dimensions: Some(Dimensions::inches(12.0, 10.0, 6.0)),
            package_code: Some("package".to_string()),
            carrier_code: None,
            service_code: None,
            confirmation: None,
            advanced: AdvancedOptionsPatch {
                warehouse_id: Some(101),
                ..AdvancedOptionsPatch::default()
            },
        };
        apply_preset(&mut record, &preset, 76.0);

        // Preset keys override
        assert_eq!(record.weight, Weight::ounces(87.0));
        assert_eq!(record.dimensions, Some(Dimensions::inches(12.0, 10.0, 6.0)));
        assert_eq!(record.package_code.as_deref(), Some("package"));
        assert_eq!(record.advanced_options.warehouse_id, Some(101));
        // Absent keys preserved, including nested ones
        assert_eq!(record.confirmation.as_deref(), Some("signature"));
        assert_eq!(
            record.advanced_options.custom_field1.as_deref(),
            Some("Amazon")
        );
    }

    #[test]
    fn test_item_weight_adds_to_base_never_replaces() {
        let mut record = make_record();
        let preset = Preset {
            weight: Some(Weight::ounces(10.0)),
            ..Preset::default()
        };
        apply_preset(&mut record, &preset, 0.0);
        assert_eq!(record.weight, Weight::ounces(10.0));

        let mut record = make_record();
        apply_preset(&mut record, &preset, 32.0);
        assert_eq!(record.weight, Weight::ounces(42.0));
    }

    #[test]
    fn test_preset_without_weight_keeps_draft_weight_as_base() {
        let mut record = make_record();
        record.weight = Weight::ounces(5.0);
        apply_preset(&mut record, &Preset::default(), 3.0);
        assert_eq!(record.weight, Weight::ounces(8.0));
    }
}
