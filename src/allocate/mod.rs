//! Capacity-bounded allocation of item units into shipment buckets
//!
//! The packer partitions enriched item units into buckets under the
//! configured capacity limit, honoring sticky and anchor placement rules.
//! Bucket 0 becomes the parent shipment; every later bucket becomes a child.
//! Accessories never participate in packing and are apportioned across
//! eligible buckets afterward.

mod accessories;
mod packer;

pub use accessories::apportion_accessories;
pub use packer::pack;

use crate::classify::EnrichedItem;
use crate::types::{ItemCategory, OrderItem};
use std::collections::HashSet;

/// Units of one enriched line allocated to one bucket
#[derive(Debug, Clone)]
pub struct BucketItem {
    /// The enriched line this allocation came from
    pub line: EnrichedItem,
    /// Units allocated to this bucket
    pub units: u32,
}

impl BucketItem {
    /// Category of the underlying line
    pub fn category(&self) -> ItemCategory {
        self.line.category
    }

    /// Line item carrying exactly this bucket's allocated units
    pub fn to_order_item(&self) -> OrderItem {
        let mut item = self.line.item.clone();
        item.quantity = self.units;
        item
    }

    /// Weight this allocation adds to its shipment, in ounces
    pub fn added_ounces(&self) -> f64 {
        self.line.added_ounces(self.units)
    }
}

/// One in-progress shipment allocation. Mutated only inside this pipeline
/// and discarded once the shipment record is built.
#[derive(Debug, Clone, Default)]
pub struct Bucket {
    /// Allocated items in placement order
    pub items: Vec<BucketItem>,
    /// Capacity units consumed by packed placements and the anchor.
    /// Sticky and accessory appends are uncapacitated and do not count.
    pub capacity_used: u32,
}

impl Bucket {
    /// Resolved capacity usage, the key for preset and tag lookups
    pub fn usage(&self) -> u32 {
        self.capacity_used
    }

    /// Total weight the allocated items add on top of a preset's base weight
    pub fn added_ounces(&self) -> f64 {
        self.items.iter().map(BucketItem::added_ounces).sum()
    }

    /// Whether any allocated item carries the given category
    pub fn has_category(&self, category: ItemCategory) -> bool {
        self.items.iter().any(|b| b.category() == category)
    }

    /// Whether every allocated item is a one-time purchase
    pub fn all_one_time(&self) -> bool {
        !self.items.is_empty()
            && self
                .items
                .iter()
                .all(|b| b.category() == ItemCategory::OneTime)
    }

    /// Whether every non-accessory item's SKU falls inside `skus`
    pub fn is_single_purpose(&self, skus: &HashSet<String>) -> bool {
        let mut saw_any = false;
        for bucket_item in &self.items {
            if bucket_item.category() == ItemCategory::Accessory {
                continue;
            }
            if !skus.contains(&bucket_item.line.item.sku) {
                return false;
            }
            saw_any = true;
        }
        saw_any
    }

    /// Line items for the shipment this bucket becomes
    pub fn to_order_items(&self) -> Vec<OrderItem> {
        self.items.iter().map(BucketItem::to_order_item).collect()
    }
}
