//! Test data factories for shipsplit types
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use shipsplit::config::FulfillmentConfig;
use shipsplit::types::{
    Address, AdvancedOptions, Order, OrderItem, PlanComponent, PlanComposition,
};
use std::collections::HashMap;

/// Create a residential Georgia destination
pub fn make_address() -> Address {
    Address {
        name: "Pat Doe".to_string(),
        company: None,
        street1: "1 Elm St".to_string(),
        street2: None,
        city: "Atlanta".to_string(),
        state: "GA".to_string(),
        postal_code: "30303".to_string(),
        country: "US".to_string(),
        phone: None,
        residential: Some(true),
    }
}

/// Create an inbound order with empty advanced options
pub fn make_order(number: &str, items: Vec<OrderItem>) -> Order {
    Order {
        order_id: Some(555_001),
        order_number: number.to_string(),
        order_key: Some(format!("key-{number}")),
        order_date: None,
        payment_date: None,
        order_status: Some("awaiting_shipment".to_string()),
        customer_email: None,
        bill_to: None,
        ship_to: make_address(),
        items,
        order_total: None,
        amount_paid: None,
        tag_ids: None,
        weight: None,
        dimensions: None,
        carrier_code: None,
        service_code: None,
        package_code: None,
        confirmation: None,
        use_alternate_presets: false,
        advanced_options: Some(AdvancedOptions::default()),
    }
}

/// Create an order whose attribution field carries the given text
pub fn make_order_with_field(number: &str, items: Vec<OrderItem>, field: &str) -> Order {
    let mut order = make_order(number, items);
    order.advanced_options = Some(AdvancedOptions {
        custom_field1: Some(field.to_string()),
        ..AdvancedOptions::default()
    });
    order
}

/// Create a line item
pub fn make_item(sku: &str, name: &str, quantity: u32) -> OrderItem {
    OrderItem::new(sku, name, quantity)
}

fn components(pairs: &[(&str, u32)]) -> Vec<PlanComponent> {
    pairs
        .iter()
        .map(|(name, count)| PlanComponent {
            name: (*name).to_string(),
            count: *count,
        })
        .collect()
}

/// Composition catalog covering the three custom plan sizes
pub fn make_composition() -> PlanComposition {
    let mut plans = HashMap::new();
    plans.insert(
        "SUB - LAWN - S".to_string(),
        components(&[("Lawn Food", 1), ("Weed Control", 1)]),
    );
    plans.insert(
        "SUB - LAWN - M".to_string(),
        components(&[("Lawn Food", 2), ("Weed Control", 2)]),
    );
    plans.insert(
        "SUB - LAWN - L".to_string(),
        components(&[("Lawn Food", 3), ("Weed Control", 3)]),
    );
    PlanComposition {
        plans,
        accessories: HashMap::new(),
    }
}

/// Production rules with a zero retry backoff so tests never sleep
pub fn fast_config() -> FulfillmentConfig {
    let mut config = FulfillmentConfig::production();
    config.batch.retry_backoff_secs = 0;
    config
}
