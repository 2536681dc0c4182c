//! Offline planning: classify, pack, resolve, tag

use crate::allocate::{apportion_accessories, pack};
use crate::classify::enrich_order;
use crate::config::FulfillmentConfig;
use crate::error::Result;
use crate::shipment::{Lineage, apply_preset, derive_tags, draft_shipment, resolve_preset};
use crate::types::{Diagnostic, ItemCategory, Order, PlanComposition, ShipmentRecord};
use tracing::info;

/// A fully planned order: finished shipment drafts, parent first, missing
/// only the carrier selection that rate shopping adds.
#[derive(Debug, Clone)]
pub struct OrderPlan {
    /// The inbound order's number
    pub order_number: String,
    /// Shipment records in submission order, parent first
    pub shipments: Vec<ShipmentRecord>,
    /// Data gaps observed while planning
    pub diagnostics: Vec<Diagnostic>,
}

impl OrderPlan {
    /// Whether planning split the order into more than one shipment
    pub fn is_split(&self) -> bool {
        self.shipments.len() > 1
    }
}

/// Run the pure pipeline stages for one order.
///
/// Classification, packing, preset resolution, and tag derivation are all
/// deterministic and make no network calls, so a plan can be previewed
/// without side effects. The parent shipment is resolved first because it is
/// the tag lineage for every child.
pub fn plan_order(
    order: &Order,
    composition: &PlanComposition,
    config: &FulfillmentConfig,
) -> Result<OrderPlan> {
    let enriched = enrich_order(&order.items, composition, config);
    let mut buckets = pack(&enriched.items, &config.capacity)?;
    apportion_accessories(&mut buckets, &enriched.accessories, &config.capacity);
    let total = buckets.len();

    let order_field = order
        .advanced_options
        .as_ref()
        .and_then(|advanced| advanced.custom_field1.clone())
        .unwrap_or_default();
    let order_has_plan = enriched
        .items
        .iter()
        .any(|line| line.category == ItemCategory::LawnPlan);

    let parent_bucket = &buckets[0];
    let mut parent = draft_shipment(order, parent_bucket, 0, total, config);
    let preset = resolve_preset(
        &config.presets,
        parent_bucket,
        true,
        order.use_alternate_presets,
    )?;
    apply_preset(&mut parent, preset, parent_bucket.added_ounces());
    derive_tags(
        &mut parent,
        parent_bucket,
        Lineage {
            field: &order_field,
            has_lawn_plan: order_has_plan,
        },
        &config.tags,
    );

    // Children read their lineage from the resolved parent, not the order
    let parent_field = parent
        .advanced_options
        .custom_field1
        .clone()
        .unwrap_or_default();
    let parent_has_plan = parent_bucket.has_category(ItemCategory::LawnPlan);

    let mut shipments = vec![parent];
    for (index, bucket) in buckets.iter().enumerate().skip(1) {
        let mut record = draft_shipment(order, bucket, index, total, config);
        let preset = resolve_preset(&config.presets, bucket, false, order.use_alternate_presets)?;
        apply_preset(&mut record, preset, bucket.added_ounces());
        derive_tags(
            &mut record,
            bucket,
            Lineage {
                field: &parent_field,
                has_lawn_plan: parent_has_plan,
            },
            &config.tags,
        );
        shipments.push(record);
    }

    info!(
        order = %order.order_number,
        shipments = shipments.len(),
        diagnostics = enriched.diagnostics.len(),
        "order planned"
    );
    Ok(OrderPlan {
        order_number: order.order_number.clone(),
        shipments,
        diagnostics: enriched.diagnostics,
    })
}
