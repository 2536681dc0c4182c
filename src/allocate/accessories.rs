//! Post-packing accessory apportionment

use super::{Bucket, BucketItem};
use crate::classify::EnrichedItem;
use crate::config::CapacityRules;

/// Spread accessory units across the buckets eligible to receive them.
///
/// A bucket is eligible when its allocated SKUs intersect the configured
/// eligibility set. Each accessory line's units are divided evenly across
/// eligible buckets; remainder units go one each to the earliest eligible
/// buckets. When no bucket is eligible the units fall back to the parent
/// bucket so nothing is dropped. Accessory appends never consume capacity.
pub fn apportion_accessories(
    buckets: &mut [Bucket],
    accessories: &[EnrichedItem],
    capacity: &CapacityRules,
) {
    if buckets.is_empty() || accessories.is_empty() {
        return;
    }

    let mut eligible: Vec<usize> = (0..buckets.len())
        .filter(|&i| {
            buckets[i]
                .items
                .iter()
                .any(|b| capacity.accessory_eligible_skus.contains(&b.line.item.sku))
        })
        .collect();
    if eligible.is_empty() {
        eligible.push(0);
    }

    for line in accessories {
        if line.item.quantity == 0 {
            continue;
        }
        // Unit-at-a-time round robin lands on the same shares as integer
        // division with the remainder going to the earliest buckets.
        let mut allotments = vec![0_u32; eligible.len()];
        let mut position = 0;
        for _ in 0..line.item.quantity {
            allotments[position] += 1;
            position = (position + 1) % eligible.len();
        }
        for (&index, units) in eligible.iter().zip(allotments) {
            if units == 0 {
                continue;
            }
            buckets[index].items.push(BucketItem {
                line: line.clone(),
                units,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocate::pack;
    use crate::types::{ItemCategory, OrderItem};
    use std::collections::{HashMap, HashSet};

    fn make_line(sku: &str, quantity: u32, category: ItemCategory) -> EnrichedItem {
        EnrichedItem {
            item: OrderItem::new(sku, sku.to_lowercase(), quantity),
            category,
            unit_ounces: 6.0,
        }
    }

    fn make_capacity() -> CapacityRules {
        CapacityRules {
            shipment_limit: 9,
            unit_costs: HashMap::from([("PLAN".to_string(), 4), ("OTP".to_string(), 1)]),
            sticky_skus: HashSet::new(),
            anchor_sku: None,
            anchor_count: 1,
            accessory_eligible_skus: HashSet::from(["PLAN".to_string()]),
        }
    }

    fn units_of(bucket: &Bucket, sku: &str) -> u32 {
        bucket
            .items
            .iter()
            .filter(|b| b.line.item.sku == sku)
            .map(|b| b.units)
            .sum()
    }

    #[test]
    fn test_even_split_with_round_robin_remainder() {
        let capacity = make_capacity();
        // Five plan units at cost 4 spread over three buckets
        let items = vec![make_line("PLAN", 5, ItemCategory::LawnPlan)];
        let mut buckets = pack(&items, &capacity).unwrap();
        assert_eq!(buckets.len(), 3);

        let sprayers = vec![make_line("SPRAY", 5, ItemCategory::Accessory)];
        apportion_accessories(&mut buckets, &sprayers, &capacity);

        // 5 over 3 eligible buckets: 2, 2, 1
        assert_eq!(units_of(&buckets[0], "SPRAY"), 2);
        assert_eq!(units_of(&buckets[1], "SPRAY"), 2);
        assert_eq!(units_of(&buckets[2], "SPRAY"), 1);
    }

    #[test]
    fn test_only_eligible_buckets_receive_accessories() {
        let capacity = make_capacity();
        let items = vec![
            make_line("PLAN", 2, ItemCategory::LawnPlan),
            make_line("OTP", 4, ItemCategory::OneTime),
        ];
        let mut buckets = pack(&items, &capacity).unwrap();
        // Bucket 0 holds both plans (cost 8) plus one OTP unit; the rest of
        // the OTP units follow in bucket 1, which holds no eligible SKU
        assert_eq!(buckets.len(), 2);
        assert_eq!(units_of(&buckets[1], "PLAN"), 0);

        let sprayers = vec![make_line("SPRAY", 2, ItemCategory::Accessory)];
        apportion_accessories(&mut buckets, &sprayers, &capacity);

        assert_eq!(units_of(&buckets[0], "SPRAY"), 2);
        assert_eq!(units_of(&buckets[1], "SPRAY"), 0);
    }

    #[test]
    fn test_no_eligible_bucket_falls_back_to_parent() {
        let capacity = make_capacity();
        let items = vec![make_line("OTP", 3, ItemCategory::OneTime)];
        let mut buckets = pack(&items, &capacity).unwrap();

        let sprayers = vec![make_line("SPRAY", 1, ItemCategory::Accessory)];
        apportion_accessories(&mut buckets, &sprayers, &capacity);

        assert_eq!(units_of(&buckets[0], "SPRAY"), 1);
    }

    #[test]
    fn test_accessories_consume_no_capacity() {
        let capacity = make_capacity();
        let items = vec![make_line("PLAN", 2, ItemCategory::LawnPlan)];
        let mut buckets = pack(&items, &capacity).unwrap();
        let before = buckets[0].usage();

        let sprayers = vec![make_line("SPRAY", 4, ItemCategory::Accessory)];
        apportion_accessories(&mut buckets, &sprayers, &capacity);

        assert_eq!(buckets[0].usage(), before);
    }
}
