//! Enrichment pass over an order's line items

use crate::config::FulfillmentConfig;
use crate::types::{Diagnostic, ItemCategory, OrderItem, PlanComposition, Weight};

/// Non-breaking-space indent for breakdown bullets, matching the rendering
/// the warehouse pick screens expect.
const BREAKDOWN_INDENT: &str = "\u{a0}\u{a0}\u{a0}\u{a0}";

/// A line item with its canonical category and per-unit weight contribution
#[derive(Debug, Clone)]
pub struct EnrichedItem {
    /// The line item, display name already rewritten
    pub item: OrderItem,
    /// Category resolved once from the classification tables
    pub category: ItemCategory,
    /// Weight one unit of this item adds to its shipment, in ounces
    pub unit_ounces: f64,
}

impl EnrichedItem {
    /// Total weight this line adds to a shipment holding `units` of it
    pub fn added_ounces(&self, units: u32) -> f64 {
        self.unit_ounces * f64::from(units)
    }
}

/// Result of the enrichment pass
#[derive(Debug, Clone, Default)]
pub struct EnrichedOrder {
    /// Items that participate in capacity packing
    pub items: Vec<EnrichedItem>,
    /// Accessory items apportioned across shipments after packing
    pub accessories: Vec<EnrichedItem>,
    /// Data gaps observed while enriching
    pub diagnostics: Vec<Diagnostic>,
}

/// Classify and enrich every line item of an order.
///
/// Plan items gain an itemized breakdown appended to their display name and a
/// weight contribution summed from the plan composition. Bundle items are
/// replaced by the sub-items their display-name marker selects. Accessory
/// items, both from order lines and from the composition's accessory counts,
/// are split out for post-packing apportionment. Data gaps (a subscription
/// plan with no composition, a component with no table weight) are collected
/// as diagnostics rather than dropped.
pub fn enrich_order(
    items: &[OrderItem],
    composition: &PlanComposition,
    config: &FulfillmentConfig,
) -> EnrichedOrder {
    let mut enriched = EnrichedOrder::default();

    for line in items {
        let mut item = line.clone();
        if let Some(replacement) = config.naming.replacement(&item.sku) {
            item.name = replacement.to_string();
        }
        let category = config.classification.classify(&item.sku);

        match category {
            ItemCategory::LawnPlan => {
                enriched.push_plan(item, composition, config);
            }
            ItemCategory::Bundle => {
                enriched.push_bundle(item, config);
            }
            ItemCategory::Accessory => {
                let unit_ounces = fallback_ounces(config, &item.name, item.weight.as_ref());
                enriched.accessories.push(EnrichedItem {
                    item,
                    category,
                    unit_ounces,
                });
            }
            ItemCategory::OneTime | ItemCategory::TestKit | ItemCategory::Anchor => {
                let unit_ounces = fallback_ounces(config, &item.name, item.weight.as_ref());
                enriched.items.push(EnrichedItem {
                    item,
                    category,
                    unit_ounces,
                });
            }
        }
    }

    // Accessory counts supplied alongside the plan composition are injected
    // as fresh items, but only for orders that actually hold a plan; they
    // were never order lines, so conservation checks exclude them.
    let has_plan = enriched
        .items
        .iter()
        .any(|line| line.category == ItemCategory::LawnPlan);
    if has_plan {
        // Sorted so the injection order never depends on map iteration order
        let mut injected: Vec<(&String, &u32)> = composition.accessories.iter().collect();
        injected.sort_by(|a, b| a.0.cmp(b.0));
        for (sku, count) in injected {
            if *count == 0 {
                continue;
            }
            let name = config
                .naming
                .replacement(sku)
                .unwrap_or(sku.as_str())
                .to_string();
            let unit_ounces = fallback_ounces(config, &name, None);
            enriched.accessories.push(EnrichedItem {
                item: OrderItem::new(sku.clone(), name, *count),
                category: ItemCategory::Accessory,
                unit_ounces,
            });
        }
    }

    enriched
}

impl EnrichedOrder {
    fn push_plan(&mut self, mut item: OrderItem, composition: &PlanComposition, config: &FulfillmentConfig) {
        match composition.plans.get(&item.sku) {
            Some(components) => {
                let mut unit_ounces = 0.0;
                for component in components {
                    item.name
                        .push_str(&format!("\n{BREAKDOWN_INDENT}\u{2022} {} {}", component.count, component.name));
                    match config.weights.component_ounces(&component.name) {
                        Some(ounces) => unit_ounces += ounces * f64::from(component.count),
                        None => self.diagnostics.push(Diagnostic::ComponentWeightMissing {
                            component: component.name.clone(),
                        }),
                    }
                }
                self.items.push(EnrichedItem {
                    item,
                    category: ItemCategory::LawnPlan,
                    unit_ounces,
                });
            }
            None => {
                // Standalone subscriptions never carry composition data, so a
                // miss for them is ordinary; for anything else it is a data gap.
                if !config.classification.is_standalone_subscription(&item.sku) {
                    self.diagnostics.push(Diagnostic::CompositionMissing {
                        sku: item.sku.clone(),
                    });
                }
                let unit_ounces = fallback_ounces(config, &item.name, item.weight.as_ref());
                self.items.push(EnrichedItem {
                    item,
                    category: ItemCategory::LawnPlan,
                    unit_ounces,
                });
            }
        }
    }

    fn push_bundle(&mut self, item: OrderItem, config: &FulfillmentConfig) {
        let variant = config
            .bundles
            .variants(&item.sku)
            .and_then(|variants| variants.iter().find(|v| item.name.contains(&v.marker)));
        match variant {
            Some(variant) => {
                for sub in &variant.items {
                    let quantity = sub.count * item.quantity;
                    let unit_ounces = fallback_ounces(config, &sub.name, None);
                    self.items.push(EnrichedItem {
                        item: OrderItem::new(sub.sku.clone(), sub.name.clone(), quantity),
                        category: config.classification.classify(&sub.sku),
                        unit_ounces,
                    });
                }
            }
            None => {
                self.diagnostics.push(Diagnostic::UnknownBundleMarker {
                    sku: item.sku.clone(),
                });
                let unit_ounces = fallback_ounces(config, &item.name, item.weight.as_ref());
                self.items.push(EnrichedItem {
                    item,
                    category: ItemCategory::Bundle,
                    unit_ounces,
                });
            }
        }
    }
}

/// Per-unit weight for items without composition data: the component table
/// first, then the weight the store supplied on the line, then zero.
fn fallback_ounces(config: &FulfillmentConfig, name: &str, weight: Option<&Weight>) -> f64 {
    config
        .weights
        .component_ounces(name)
        .or_else(|| weight.map(Weight::to_ounces))
        .unwrap_or(0.0)
}
