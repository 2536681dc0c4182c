//! Process command - plan, rate-shop, and submit a batch

use crate::cli::input::{load_compositions, load_config, load_orders};
use crate::cli::plan::{finish_preview, preview};
use crate::cli::style::{Stylize, check, cross, gap_mark};
use anstream::{eprintln, println};
use shipsplit::error::{Error, Result};
use shipsplit::pipeline::{BatchReport, SubmissionStatus, process_batch};
use shipsplit::providers::{OrderSubmitter, RateProvider, SHIPSTATION_BASE_URL, ShipStationClient};
use std::path::Path;
use std::sync::Arc;
use url::Url;

/// Arguments for the process command
pub struct ProcessArgs<'a> {
    /// Already-fetched orders JSON
    pub orders: &'a Path,
    /// Pre-fetched plan compositions JSON, keyed by order number
    pub compositions: Option<&'a Path>,
    /// Fulfillment rules JSON, replacing the built-in production rules
    pub config: Option<&'a Path>,
    /// Worker bound override
    pub workers: Option<usize>,
    /// Stop after planning
    pub dry_run: bool,
    /// ShipStation API base URL override
    pub base_url: Option<&'a str>,
}

/// Run the process command
pub async fn run_process(args: &ProcessArgs<'_>) -> Result<()> {
    let mut config = load_config(args.config)?;
    if let Some(workers) = args.workers {
        config.batch.max_concurrent_orders = workers;
    }
    let compositions = load_compositions(args.compositions)?;
    let orders = load_orders(args.orders)?;

    if args.dry_run {
        println!(
            "{}\n",
            "Dry run: planning only, nothing will be submitted".muted()
        );
        let summary = preview(&orders, &compositions, &config);
        return finish_preview(&summary);
    }

    let base_url = match args.base_url {
        Some(raw) => {
            Url::parse(raw).map_err(|e| Error::Config(format!("invalid base url {raw}: {e}")))?;
            raw.trim_end_matches('/').to_string()
        }
        None => SHIPSTATION_BASE_URL.to_string(),
    };
    let client = Arc::new(ShipStationClient::from_env(
        &base_url,
        config.rate_shop.timeout(),
    )?);
    let rates = Arc::clone(&client) as Arc<dyn RateProvider>;
    let submitter = client as Arc<dyn OrderSubmitter>;

    println!(
        "Processing {} order{}\n",
        orders.len(),
        if orders.len() == 1 { "" } else { "s" }
    );

    let report = process_batch(orders, compositions, config, rates, submitter).await;
    print_report(&report);

    let total = report.outcomes.len() + report.failures.len();
    let incomplete = report.incomplete().len() + report.failures.len();
    if incomplete > 0 {
        return Err(Error::Incomplete(format!(
            "{incomplete} of {total} orders did not fully submit"
        )));
    }
    Ok(())
}

fn print_report(report: &BatchReport) {
    for outcome in &report.outcomes {
        let count = outcome.shipments.len();
        println!(
            "{} ({count} shipment{})",
            outcome.order_number.emphasis(),
            if count == 1 { "" } else { "s" }
        );
        for shipment_outcome in &outcome.shipments {
            let number = &shipment_outcome.shipment.order_number;
            match &shipment_outcome.status {
                SubmissionStatus::Submitted { order_id } => {
                    let id = order_id.map_or_else(String::new, |id| format!(" #{id}"));
                    println!("  {} {}{}", check(), number.accent(), id.muted());
                }
                SubmissionStatus::RateLimited => {
                    println!(
                        "  {} {} {}",
                        gap_mark(),
                        number.accent(),
                        "still rate limited".warn().for_stdout()
                    );
                }
                SubmissionStatus::Failed { reason } => {
                    println!("  {} {} {reason}", cross().for_stdout(), number.accent());
                }
            }
        }
        for diagnostic in &outcome.diagnostics {
            println!("  {} {diagnostic}", gap_mark());
        }
    }
    if !report.skipped.is_empty() {
        let note = format!(
            "Skipped {} split record{}",
            report.skipped.len(),
            if report.skipped.len() == 1 { "" } else { "s" }
        );
        println!("{}", note.muted());
    }
    for failure in &report.failures {
        eprintln!(
            "{} {}: {}",
            cross(),
            failure.order_number.error(),
            failure.reason
        );
    }

    println!();
    let submitted = report.submitted_shipments();
    if report.is_clean() {
        let note = format!(
            "Submitted {submitted} shipment{}",
            if submitted == 1 { "" } else { "s" }
        );
        println!("{} {}", check(), note.success());
    } else {
        println!(
            "Submitted {submitted} shipment{}; see failures above",
            if submitted == 1 { "" } else { "s" }
        );
    }
}
