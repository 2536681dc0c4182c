//! Plan command - offline decomposition preview

use crate::cli::input::{load_compositions, load_config, load_orders};
use crate::cli::style::{Stylize, bullet, cross, gap_mark};
use anstream::{eprintln, println};
use shipsplit::config::FulfillmentConfig;
use shipsplit::error::{Error, Result};
use shipsplit::pipeline::{is_child_number, plan_order};
use shipsplit::types::{Order, PlanComposition};
use std::collections::HashMap;
use std::path::Path;

/// Counts accumulated while previewing a batch
#[derive(Default)]
pub(crate) struct PlanSummary {
    /// Orders that planned cleanly
    pub planned: usize,
    /// Shipments those orders decomposed into
    pub shipments: usize,
    /// Data gaps surfaced while planning
    pub diagnostics: usize,
    /// Records from an earlier split, not planned
    pub skipped: usize,
    /// Orders that failed to plan
    pub failed: usize,
}

/// Print each order's decomposition without touching the network
pub(crate) fn preview(
    orders: &[Order],
    compositions: &HashMap<String, PlanComposition>,
    config: &FulfillmentConfig,
) -> PlanSummary {
    let empty = PlanComposition::empty();
    let mut summary = PlanSummary::default();
    for order in orders {
        if is_child_number(&order.order_number) {
            let note = format!("{} skipped (split record)", order.order_number);
            println!("{}", note.muted());
            summary.skipped += 1;
            continue;
        }
        let composition = compositions.get(&order.order_number).unwrap_or(&empty);
        match plan_order(order, composition, config) {
            Ok(plan) => {
                let count = plan.shipments.len();
                println!(
                    "{} ({count} shipment{})",
                    plan.order_number.emphasis(),
                    if count == 1 { "" } else { "s" }
                );
                for shipment in &plan.shipments {
                    let items = shipment.items.len();
                    let package = shipment
                        .package_code
                        .as_deref()
                        .map_or_else(String::new, |p| format!(", {p}"));
                    println!(
                        "  {} {}  {items} item{}, {:.1} oz{package}",
                        bullet(),
                        shipment.order_number.accent(),
                        if items == 1 { "" } else { "s" },
                        shipment.weight.to_ounces(),
                    );
                    if let Some(labels) = &shipment.advanced_options.custom_field1 {
                        println!("      {}", labels.muted());
                    }
                }
                for diagnostic in &plan.diagnostics {
                    println!("  {} {diagnostic}", gap_mark());
                }
                summary.planned += 1;
                summary.shipments += count;
                summary.diagnostics += plan.diagnostics.len();
            }
            Err(e) => {
                eprintln!("{} {}: {e}", cross(), order.order_number.error());
                summary.failed += 1;
            }
        }
    }
    summary
}

/// Run the plan command
pub fn run_plan(
    orders_path: &Path,
    compositions: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let compositions = load_compositions(compositions)?;
    let orders = load_orders(orders_path)?;

    println!(
        "Planning {} order{}\n",
        orders.len(),
        if orders.len() == 1 { "" } else { "s" }
    );

    let summary = preview(&orders, &compositions, &config);
    finish_preview(&summary)
}

/// Print the preview summary; errors when any order failed to plan
pub(crate) fn finish_preview(summary: &PlanSummary) -> Result<()> {
    println!();
    println!(
        "Planned {} shipment{} across {} order{}",
        summary.shipments,
        if summary.shipments == 1 { "" } else { "s" },
        summary.planned,
        if summary.planned == 1 { "" } else { "s" }
    );
    if summary.skipped > 0 {
        let note = format!(
            "Skipped {} split record{}",
            summary.skipped,
            if summary.skipped == 1 { "" } else { "s" }
        );
        println!("{}", note.muted());
    }
    if summary.diagnostics > 0 {
        let note = format!(
            "{} diagnostic{} to review",
            summary.diagnostics,
            if summary.diagnostics == 1 { "" } else { "s" }
        );
        println!("{}", note.warn().for_stdout());
    }
    if summary.failed > 0 {
        return Err(Error::Incomplete(format!(
            "{} of {} orders failed to plan",
            summary.failed,
            summary.planned + summary.failed
        )));
    }
    Ok(())
}
