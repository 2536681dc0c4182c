//! Order pipeline
//!
//! Three layers, each building on the previous:
//! - `plan_order` runs the pure stages (classify, pack, presets, tags) and
//!   yields the finished shipment drafts without touching the network.
//! - `execute_order` rate-shops and submits one planned order, fanning out
//!   per shipment and per carrier tuple.
//! - `process_batch` runs many orders in parallel under a worker bound and
//!   owns the single deferred retry for rate-limited submissions.

mod batch;
mod execute;
mod plan;

pub use batch::{BatchReport, OrderFailure, is_child_number, process_batch};
pub use execute::{
    OrderOutcome, RateSelection, ShipmentOutcome, SubmissionStatus, execute_order, shop_rate,
};
pub use plan::{OrderPlan, plan_order};
