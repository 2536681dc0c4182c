//! Line-item classification and enrichment
//!
//! The first pipeline stage. Each line item is classified once against the
//! configured SKU tables and the resulting category rides along with the item
//! for every later stage. Subscription plans gain an itemized breakdown in
//! their display name and a weight contribution computed from the plan
//! composition; bundles expand into their marker-selected sub-items.

mod enrich;

pub use enrich::{EnrichedItem, EnrichedOrder, enrich_order};
