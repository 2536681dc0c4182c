//! Draft shipment construction with parent/child lineage

use crate::allocate::Bucket;
use crate::config::FulfillmentConfig;
use crate::types::{AdvancedOptions, Order, ShipmentRecord, Weight};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Platform status every assembled shipment is submitted with
const SUBMIT_STATUS: &str = "awaiting_shipment";

/// Build the draft shipment record for one bucket.
///
/// Records are constructed fresh from the order's fields rather than by
/// cloning and patching a sibling record. Bucket 0 keeps the order's key,
/// payment date, and totals; child buckets get a fresh idempotency key, a
/// zeroed total, and no payment date. A split renames every record to
/// `{number}-{i}` in sequence order, parent included, so a later run can
/// recognize all generated records by their suffix; each is marked split,
/// numbered "Shipment i of N", and billed to the configured split party.
/// Children additionally carry the parent linkage. An unsplit order keeps
/// its bare number.
pub fn draft_shipment(
    order: &Order,
    bucket: &Bucket,
    index: usize,
    total: usize,
    config: &FulfillmentConfig,
) -> ShipmentRecord {
    let is_parent = index == 0;
    let split = total > 1;

    let order_number = if split {
        format!("{}-{}", order.order_number, index + 1)
    } else {
        order.order_number.clone()
    };
    let order_key = if is_parent {
        order
            .order_key
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    } else {
        Uuid::new_v4().to_string()
    };

    let mut advanced_options = order.advanced_options.clone().unwrap_or_default();
    if split {
        advanced_options.merged_or_split = true;
        advanced_options.custom_field2 = Some(format!("Shipment {} of {total}", index + 1));
        advanced_options.parent_id = if is_parent { None } else { order.order_id };
        if let Some(ref bill_to_party) = config.batch.split_bill_to_party {
            advanced_options.bill_to_party = Some(bill_to_party.clone());
        }
    } else {
        advanced_options.merged_or_split = false;
    }

    ShipmentRecord {
        order_number,
        order_key,
        order_date: order.order_date,
        payment_date: if is_parent { order.payment_date } else { None },
        order_status: order
            .order_status
            .clone()
            .unwrap_or_else(|| SUBMIT_STATUS.to_string()),
        customer_email: order.customer_email.clone(),
        bill_to: order.bill_to.clone(),
        ship_to: order.ship_to.clone(),
        items: bucket.to_order_items(),
        order_total: if is_parent {
            order.order_total.unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        },
        amount_paid: if is_parent { order.amount_paid } else { None },
        tag_ids: Vec::new(),
        weight: order.weight.unwrap_or(Weight::ounces(0.0)),
        dimensions: order.dimensions,
        carrier_code: order.carrier_code.clone(),
        service_code: order.service_code.clone(),
        package_code: order.package_code.clone(),
        confirmation: order.confirmation.clone(),
        advanced_options,
    }
}
