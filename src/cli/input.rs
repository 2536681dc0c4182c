//! Input file loading shared by the CLI commands

use serde::Deserialize;
use shipsplit::config::FulfillmentConfig;
use shipsplit::error::{Error, Result};
use shipsplit::types::{Order, PlanComposition};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Accepts either a bare order array or the platform's listing envelope
#[derive(Deserialize)]
#[serde(untagged)]
enum OrdersFile {
    Listing { orders: Vec<Order> },
    Bare(Vec<Order>),
}

/// Load inbound orders from already-fetched JSON
pub fn load_orders(path: &Path) -> Result<Vec<Order>> {
    let raw = read(path)?;
    let parsed: OrdersFile = serde_json::from_str(&raw)?;
    Ok(match parsed {
        OrdersFile::Listing { orders } | OrdersFile::Bare(orders) => orders,
    })
}

/// Load the pre-fetched plan compositions keyed by order number, or an empty
/// table when no file is given
pub fn load_compositions(path: Option<&Path>) -> Result<HashMap<String, PlanComposition>> {
    match path {
        Some(path) => {
            let raw = read(path)?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(HashMap::new()),
    }
}

/// Load fulfillment rules, or the built-in production rules when no file is
/// given
pub fn load_config(path: Option<&Path>) -> Result<FulfillmentConfig> {
    path.map_or_else(
        || Ok(FulfillmentConfig::production()),
        FulfillmentConfig::from_file,
    )
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))
}
