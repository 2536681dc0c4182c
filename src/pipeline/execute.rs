//! Rate shopping and submission for one planned order

use crate::config::{CarrierAccount, FulfillmentConfig, RateShopRules};
use crate::error::{Error, Result};
use crate::pipeline::plan_order;
use crate::providers::{OrderSubmitter, RateProvider, RateRequest};
use crate::types::{Diagnostic, Order, PlanComposition, ShipmentRecord};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};

/// The winning carrier tuple for one shipment
#[derive(Debug, Clone)]
pub struct RateSelection {
    /// The tuple that quoted the minimum
    pub account: CarrierAccount,
    /// The quoted total
    pub rate: Decimal,
}

/// Terminal submission state of one shipment
#[derive(Debug, Clone)]
pub enum SubmissionStatus {
    /// Accepted by the platform
    Submitted {
        /// Platform identifier of the created order
        order_id: Option<u64>,
    },
    /// Rejected for rate limiting; eligible for the single batch-level retry
    RateLimited,
    /// Any other failure; siblings are unaffected
    Failed {
        /// What went wrong
        reason: String,
    },
}

/// One shipment with its submission state
#[derive(Debug, Clone)]
pub struct ShipmentOutcome {
    /// The finalized record as submitted
    pub shipment: ShipmentRecord,
    /// How submission ended
    pub status: SubmissionStatus,
}

/// Everything that happened to one order
#[derive(Debug, Clone)]
pub struct OrderOutcome {
    /// The inbound order's number
    pub order_number: String,
    /// Per-shipment results in submission order, parent first
    pub shipments: Vec<ShipmentOutcome>,
    /// Data gaps from planning plus no-rate conditions from execution
    pub diagnostics: Vec<Diagnostic>,
}

impl OrderOutcome {
    /// Whether every shipment was accepted
    pub fn fully_submitted(&self) -> bool {
        self.shipments
            .iter()
            .all(|s| matches!(s.status, SubmissionStatus::Submitted { .. }))
    }

    /// Whether any shipment was rejected for rate limiting
    pub fn any_rate_limited(&self) -> bool {
        self.shipments
            .iter()
            .any(|s| matches!(s.status, SubmissionStatus::RateLimited))
    }
}

/// Quote every configured carrier tuple concurrently and pick the minimum.
///
/// One task per tuple; a tuple's failure is caught inside its task and never
/// aborts the siblings. Selection compares strictly less-than against the
/// running minimum, so an exact tie goes to the tuple configured earliest.
/// Returns `None` when every tuple failed.
pub async fn shop_rate(
    shipment: &ShipmentRecord,
    provider: Arc<dyn RateProvider>,
    rules: &RateShopRules,
) -> Option<RateSelection> {
    let mut handles = Vec::with_capacity(rules.accounts.len());
    for account in &rules.accounts {
        let request = RateRequest::for_shipment(shipment, account, &rules.origin_postal_code);
        let account = account.clone();
        let provider = Arc::clone(&provider);
        handles.push(tokio::spawn(async move {
            match provider.quote(&request).await {
                Ok(rate) => Some((account, rate)),
                Err(e) => {
                    warn!(
                        carrier = %account.carrier_code,
                        service = %account.service_code,
                        error = %e,
                        "rate quote failed"
                    );
                    None
                }
            }
        }));
    }

    let mut best: Option<RateSelection> = None;
    for handle in handles {
        let Ok(Some((account, rate))) = handle.await else {
            continue;
        };
        if best.as_ref().is_none_or(|current| rate < current.rate) {
            best = Some(RateSelection { account, rate });
        }
    }
    best
}

/// Write the winning tuple onto the shipment. Billing only moves when the
/// tuple names a billing party; otherwise the shipment keeps its own.
fn apply_rate(shipment: &mut ShipmentRecord, selection: &RateSelection) {
    shipment.carrier_code = Some(selection.account.carrier_code.clone());
    shipment.service_code = Some(selection.account.service_code.clone());
    if let Some(ref bill_to_party) = selection.account.bill_to_party {
        shipment.advanced_options.bill_to_party = Some(bill_to_party.clone());
    }
}

/// Plan, rate-shop, and submit one order.
///
/// Each shipment runs in its own task: rate shopping fans out per carrier
/// tuple, then the shipment is submitted. A shipment that ends with no rate
/// is still submitted, carrier-less, and surfaced as a diagnostic so the
/// warehouse can assign one by hand. Submission failures are isolated per
/// shipment and reported as statuses, never as errors that cancel siblings.
pub async fn execute_order(
    order: &Order,
    composition: &PlanComposition,
    config: &FulfillmentConfig,
    rates: &Arc<dyn RateProvider>,
    submitter: &Arc<dyn OrderSubmitter>,
) -> Result<OrderOutcome> {
    let plan = plan_order(order, composition, config)?;
    let rate_rules = config.rate_shop.clone();

    let mut handles = Vec::with_capacity(plan.shipments.len());
    for mut shipment in plan.shipments {
        let rates = Arc::clone(rates);
        let submitter = Arc::clone(submitter);
        let rate_rules = rate_rules.clone();
        handles.push(tokio::spawn(async move {
            let mut diagnostic = None;
            match shop_rate(&shipment, rates, &rate_rules).await {
                Some(selection) => {
                    info!(
                        shipment = %shipment.order_number,
                        carrier = %selection.account.carrier_code,
                        rate = %selection.rate,
                        "rate selected"
                    );
                    apply_rate(&mut shipment, &selection);
                }
                None => {
                    shipment.carrier_code = None;
                    shipment.service_code = None;
                    diagnostic = Some(Diagnostic::NoRate {
                        order_number: shipment.order_number.clone(),
                    });
                }
            }

            let status = match submitter.submit(&shipment).await {
                Ok(receipt) => SubmissionStatus::Submitted {
                    order_id: receipt.order_id,
                },
                Err(Error::RateLimited) => SubmissionStatus::RateLimited,
                Err(e) => SubmissionStatus::Failed {
                    reason: e.to_string(),
                },
            };
            (ShipmentOutcome { shipment, status }, diagnostic)
        }));
    }

    let mut outcome = OrderOutcome {
        order_number: plan.order_number,
        shipments: Vec::with_capacity(handles.len()),
        diagnostics: plan.diagnostics,
    };
    for handle in handles {
        let (shipment_outcome, diagnostic) = handle.await?;
        outcome.shipments.push(shipment_outcome);
        outcome.diagnostics.extend(diagnostic);
    }
    Ok(outcome)
}
