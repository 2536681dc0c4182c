//! Bounded-concurrency batch orchestration with a single deferred retry

use crate::config::FulfillmentConfig;
use crate::error::Error;
use crate::pipeline::execute::{OrderOutcome, SubmissionStatus, execute_order};
use crate::providers::{OrderSubmitter, RateProvider};
use crate::types::{Order, PlanComposition};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// An order that never produced an outcome
#[derive(Debug, Clone)]
pub struct OrderFailure {
    /// The inbound order's number
    pub order_number: String,
    /// Why planning or execution aborted
    pub reason: String,
}

/// Merged results of one batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Per-order results in input order
    pub outcomes: Vec<OrderOutcome>,
    /// Orders that aborted before producing shipment outcomes
    pub failures: Vec<OrderFailure>,
    /// Order numbers skipped as records generated by a previous run
    pub skipped: Vec<String>,
}

impl BatchReport {
    /// Whether every order produced an outcome and every shipment was accepted
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.outcomes.iter().all(OrderOutcome::fully_submitted)
    }

    /// Count of shipments accepted by the platform
    pub fn submitted_shipments(&self) -> usize {
        self.outcomes
            .iter()
            .flat_map(|o| &o.shipments)
            .filter(|s| matches!(s.status, SubmissionStatus::Submitted { .. }))
            .count()
    }

    /// Outcomes with at least one shipment left unsubmitted
    pub fn incomplete(&self) -> Vec<&OrderOutcome> {
        self.outcomes
            .iter()
            .filter(|o| !o.fully_submitted())
            .collect()
    }
}

/// Whether an order number names a record generated by a previous split.
///
/// A split renames every record `{number}-{i}`, parent included, so only a
/// trailing all-digit segment marks one; inbound numbers that merely contain
/// a dash pass through.
pub fn is_child_number(order_number: &str) -> bool {
    order_number
        .rsplit_once('-')
        .is_some_and(|(_, suffix)| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
}

/// Process a batch of inbound orders with bounded concurrency.
///
/// Records generated by an earlier run are skipped up front. Compositions
/// are keyed by order number because plan components and accessory counts
/// are customer-specific; an order without an entry plans against an empty
/// composition. Each remaining order runs in its own task behind a semaphore
/// sized by the configured worker limit; every task returns its own result
/// and the report is merged here after joining in input order, so outcomes
/// stay deterministic regardless of completion order. Shipments rejected for
/// rate limiting are resubmitted exactly once after a fixed backoff; a
/// second rejection stands.
pub async fn process_batch(
    orders: Vec<Order>,
    compositions: HashMap<String, PlanComposition>,
    config: FulfillmentConfig,
    rates: Arc<dyn RateProvider>,
    submitter: Arc<dyn OrderSubmitter>,
) -> BatchReport {
    let mut report = BatchReport::default();
    let config = Arc::new(config);
    let semaphore = Arc::new(Semaphore::new(config.batch.max_concurrent_orders.max(1)));

    let mut handles = Vec::new();
    for order in orders {
        if is_child_number(&order.order_number) {
            report.skipped.push(order.order_number);
            continue;
        }
        let composition = compositions
            .get(&order.order_number)
            .cloned()
            .unwrap_or_else(PlanComposition::empty);
        let semaphore = Arc::clone(&semaphore);
        let config = Arc::clone(&config);
        let rates = Arc::clone(&rates);
        let submitter = Arc::clone(&submitter);
        let order_number = order.order_number.clone();
        handles.push((
            order_number,
            tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| Error::Internal(e.to_string()))?;
                execute_order(&order, &composition, &config, &rates, &submitter).await
            }),
        ));
    }
    info!(
        orders = handles.len(),
        skipped = report.skipped.len(),
        workers = config.batch.max_concurrent_orders,
        "processing batch"
    );

    for (order_number, handle) in handles {
        match handle.await {
            Ok(Ok(outcome)) => report.outcomes.push(outcome),
            Ok(Err(e)) => {
                warn!(order = %order_number, error = %e, "order aborted");
                report.failures.push(OrderFailure {
                    order_number,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                warn!(order = %order_number, error = %e, "order task panicked");
                report.failures.push(OrderFailure {
                    order_number,
                    reason: e.to_string(),
                });
            }
        }
    }

    retry_rate_limited(&mut report, &config, &submitter).await;

    info!(
        submitted = report.submitted_shipments(),
        failures = report.failures.len(),
        "batch complete"
    );
    report
}

/// Resubmit every rate-limited shipment once after the configured backoff.
///
/// Resubmission reuses the already-finalized records and runs sequentially;
/// the platform just told us to slow down. Statuses are rewritten in place,
/// and a shipment rejected a second time keeps its rate-limited status.
async fn retry_rate_limited(
    report: &mut BatchReport,
    config: &FulfillmentConfig,
    submitter: &Arc<dyn OrderSubmitter>,
) {
    let targets: Vec<(usize, usize)> = report
        .outcomes
        .iter()
        .enumerate()
        .flat_map(|(order_index, outcome)| {
            outcome
                .shipments
                .iter()
                .enumerate()
                .filter(|(_, s)| matches!(s.status, SubmissionStatus::RateLimited))
                .map(move |(shipment_index, _)| (order_index, shipment_index))
        })
        .collect();
    if targets.is_empty() {
        return;
    }

    info!(
        shipments = targets.len(),
        backoff_secs = config.batch.retry_backoff_secs,
        "rate limited; retrying once after backoff"
    );
    tokio::time::sleep(config.batch.retry_backoff()).await;

    for (order_index, shipment_index) in targets {
        let outcome = &mut report.outcomes[order_index];
        let status = match submitter.submit(&outcome.shipments[shipment_index].shipment).await {
            Ok(receipt) => SubmissionStatus::Submitted {
                order_id: receipt.order_id,
            },
            Err(Error::RateLimited) => SubmissionStatus::RateLimited,
            Err(e) => SubmissionStatus::Failed {
                reason: e.to_string(),
            },
        };
        outcome.shipments[shipment_index].status = status;
    }
}
