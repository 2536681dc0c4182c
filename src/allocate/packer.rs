//! Constrained first-fit-decreasing packing

use super::{Bucket, BucketItem};
use crate::classify::EnrichedItem;
use crate::config::CapacityRules;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Pack enriched item units into capacity-bounded buckets.
///
/// Sticky and anchor SKUs sit out the packing pass. The remaining lines are
/// sorted by per-unit capacity cost descending (stable, so input order breaks
/// ties) and placed one unit at a time into the first bucket, in creation
/// order, with enough remaining capacity; a new bucket opens when none fits.
/// An anchor, when present, lowers bucket 0's effective capacity by exactly
/// one unit during the pass and is re-inserted into bucket 0 afterward with
/// its configured fixed count. Sticky units are then appended to bucket 0
/// uncapacitated.
///
/// Returns the ordered bucket list: bucket 0 is the parent shipment, every
/// later bucket a child. Fails loudly if the allocation does not conserve
/// input units or a unit can never fit.
pub fn pack(items: &[EnrichedItem], capacity: &CapacityRules) -> Result<Vec<Bucket>> {
    let mut sticky: Vec<&EnrichedItem> = Vec::new();
    let mut anchor: Option<&EnrichedItem> = None;
    let mut packable: Vec<&EnrichedItem> = Vec::new();

    for line in items {
        if capacity.is_sticky(&line.item.sku) {
            sticky.push(line);
        } else if capacity.is_anchor(&line.item.sku) {
            // At most one anchor line participates; duplicates would double
            // the reserved unit.
            if anchor.is_none() {
                anchor = Some(line);
            }
        } else {
            packable.push(line);
        }
    }

    // Stable sort keeps input order among equal-cost groups.
    packable.sort_by(|a, b| {
        capacity
            .unit_cost(&b.item.sku)
            .cmp(&capacity.unit_cost(&a.item.sku))
    });

    let parent_limit = if anchor.is_some() {
        capacity.shipment_limit.saturating_sub(1)
    } else {
        capacity.shipment_limit
    };

    // bucket index -> (group index, units), in placement order
    let mut placements: Vec<Vec<(usize, u32)>> = Vec::new();
    let mut used: Vec<u32> = Vec::new();

    for (group, line) in packable.iter().enumerate() {
        let cost = capacity.unit_cost(&line.item.sku);
        if cost > capacity.shipment_limit {
            return Err(Error::Invariant(format!(
                "unit capacity cost {cost} for {} exceeds the shipment limit {}",
                line.item.sku, capacity.shipment_limit
            )));
        }
        for _ in 0..line.item.quantity {
            let target = (0..placements.len()).find(|&i| {
                let limit = if i == 0 {
                    parent_limit
                } else {
                    capacity.shipment_limit
                };
                used[i] + cost <= limit
            });
            let index = match target {
                Some(index) => index,
                None => {
                    placements.push(Vec::new());
                    used.push(0);
                    placements.len() - 1
                }
            };
            match placements[index].iter_mut().find(|(g, _)| *g == group) {
                Some((_, units)) => *units += 1,
                None => placements[index].push((group, 1)),
            }
            used[index] += cost;
        }
    }

    // Anchor and sticky appends need a parent bucket even when nothing packed.
    if placements.is_empty() {
        placements.push(Vec::new());
        used.push(0);
    }

    let mut buckets: Vec<Bucket> = placements
        .into_iter()
        .zip(used)
        .map(|(bucket_placements, capacity_used)| Bucket {
            items: bucket_placements
                .into_iter()
                .map(|(group, units)| BucketItem {
                    line: packable[group].clone(),
                    units,
                })
                .collect(),
            capacity_used,
        })
        .collect();

    if let Some(line) = anchor {
        let cost = capacity.unit_cost(&line.item.sku);
        buckets[0].items.push(BucketItem {
            line: line.clone(),
            units: capacity.anchor_count,
        });
        buckets[0].capacity_used += cost * capacity.anchor_count;
    }
    for line in sticky {
        buckets[0].items.push(BucketItem {
            line: line.clone(),
            units: line.item.quantity,
        });
    }

    check_conservation(items, &buckets, capacity)?;
    Ok(buckets)
}

/// Every unit of every input SKU must land in exactly one bucket. The anchor
/// is the one deliberate exception: it is re-inserted with its configured
/// fixed count rather than its input quantity.
fn check_conservation(
    items: &[EnrichedItem],
    buckets: &[Bucket],
    capacity: &CapacityRules,
) -> Result<()> {
    let mut expected: HashMap<&str, u32> = HashMap::new();
    let mut anchor_seen = false;
    for line in items {
        if capacity.is_anchor(&line.item.sku) {
            if !anchor_seen {
                *expected.entry(line.item.sku.as_str()).or_insert(0) += capacity.anchor_count;
                anchor_seen = true;
            }
        } else {
            *expected.entry(line.item.sku.as_str()).or_insert(0) += line.item.quantity;
        }
    }

    let mut allocated: HashMap<&str, u32> = HashMap::new();
    for bucket in buckets {
        for bucket_item in &bucket.items {
            *allocated
                .entry(bucket_item.line.item.sku.as_str())
                .or_insert(0) += bucket_item.units;
        }
    }

    for (sku, expected_units) in &expected {
        let got = allocated.get(sku).copied().unwrap_or(0);
        if got != *expected_units {
            return Err(Error::Invariant(format!(
                "allocation lost units of {sku}: expected {expected_units}, allocated {got}"
            )));
        }
    }
    for sku in allocated.keys() {
        if !expected.contains_key(sku) {
            return Err(Error::Invariant(format!(
                "allocation invented units of {sku}"
            )));
        }
    }
    Ok(())
}
