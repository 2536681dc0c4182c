//! Tag derivation

use crate::allocate::Bucket;
use crate::config::{OrderTag, TagRules};
use crate::types::{ItemCategory, ShipmentRecord};

/// What the tag rules read from the shipment's lineage: the inbound order for
/// the parent bucket, the already-resolved parent record for child buckets.
#[derive(Debug, Clone, Copy)]
pub struct Lineage<'a> {
    /// The lineage's textual attribution field
    pub field: &'a str,
    /// Whether the lineage carries a lawn-plan item
    pub has_lawn_plan: bool,
}

/// Duplicate-free tag accumulator. Appends are guarded by membership in both
/// the id set and the label list.
#[derive(Debug, Default)]
struct TagSet {
    ids: Vec<i64>,
    labels: Vec<String>,
}

impl TagSet {
    fn append(&mut self, tag: &OrderTag) {
        if self.ids.contains(&tag.id) || self.labels.iter().any(|label| label == &tag.label) {
            return;
        }
        self.ids.push(tag.id);
        self.labels.push(tag.label.clone());
    }
}

/// Derive the tag-id set and textual attribution field for one shipment.
///
/// Recomputes both from scratch on every call, so repeated invocation on the
/// same (bucket, lineage) input never grows the result. Rules run in fixed
/// order: channel markers propagated from the lineage field, the subscription
/// status pair, SKU/name markers on non-one-time items, the all-one-time tag,
/// and the usage-keyed tag.
pub fn derive_tags(
    record: &mut ShipmentRecord,
    bucket: &Bucket,
    lineage: Lineage<'_>,
    rules: &TagRules,
) {
    let mut tags = TagSet::default();

    for tag in &rules.channel_tags {
        if lineage.field.contains(&tag.label) {
            tags.append(tag);
        }
    }

    if lineage.has_lawn_plan && bucket.has_category(ItemCategory::LawnPlan) {
        if lineage.field.contains(&rules.first_order.label) {
            tags.append(&rules.first_order);
        } else if lineage.field.contains(&rules.recurring.label) {
            tags.append(&rules.recurring);
        }
    }

    for (marker, tag) in &rules.sku_markers {
        let matched = bucket.items.iter().any(|bucket_item| {
            bucket_item.category() != ItemCategory::OneTime
                && (bucket_item.line.item.sku.contains(marker)
                    || bucket_item.line.item.name.contains(marker))
        });
        if matched {
            tags.append(tag);
        }
    }

    if bucket.all_one_time() {
        tags.append(&rules.otp_only);
    }

    let usage = bucket.usage();
    if usage <= rules.single_shipment_threshold {
        if let Some(tag) = rules.usage_tags.get(&usage) {
            tags.append(tag);
        }
    }

    record.tag_ids = tags.ids;
    record.advanced_options.custom_field1 = if tags.labels.is_empty() {
        None
    } else {
        Some(tags.labels.join(", "))
    };
}
