//! Mock rate and submission providers for pipeline tests
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use rust_decimal::Decimal;
use shipsplit::error::{Error, Result};
use shipsplit::providers::{OrderSubmitter, RateProvider, RateRequest, SubmitReceipt};
use shipsplit::types::ShipmentRecord;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `quote`
#[derive(Debug, Clone)]
pub struct QuoteCall {
    pub carrier_code: String,
    pub service_code: String,
    pub to_postal_code: String,
    pub weight_ounces: f64,
}

/// Call record for `submit`
#[derive(Debug, Clone)]
pub struct SubmitCall {
    pub order_number: String,
    pub carrier_code: Option<String>,
    pub bill_to_party: Option<String>,
    pub tag_ids: Vec<i64>,
}

/// Mock rate provider with per-carrier quotes and error injection
pub struct MockRateProvider {
    quotes: Mutex<HashMap<String, Decimal>>,
    quote_calls: Mutex<Vec<QuoteCall>>,
    fail_all: Mutex<bool>,
}

impl MockRateProvider {
    /// Mock with no scripted quotes; every quote fails until some are set
    pub fn new() -> Self {
        Self {
            quotes: Mutex::new(HashMap::new()),
            quote_calls: Mutex::new(Vec::new()),
            fail_all: Mutex::new(false),
        }
    }

    /// Mock quoting the given rate per carrier code
    pub fn with_quotes(pairs: &[(&str, Decimal)]) -> Self {
        let mock = Self::new();
        for (carrier, rate) in pairs {
            mock.set_quote(carrier, *rate);
        }
        mock
    }

    /// Script one carrier's quote
    pub fn set_quote(&self, carrier_code: &str, rate: Decimal) {
        self.quotes
            .lock()
            .unwrap()
            .insert(carrier_code.to_string(), rate);
    }

    /// Make every subsequent quote fail
    pub fn fail_all_quotes(&self) {
        *self.fail_all.lock().unwrap() = true;
    }

    /// Snapshot of every quote call made
    pub fn quote_calls(&self) -> Vec<QuoteCall> {
        self.quote_calls.lock().unwrap().clone()
    }
}

impl Default for MockRateProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for MockRateProvider {
    async fn quote(&self, request: &RateRequest) -> Result<Decimal> {
        self.quote_calls.lock().unwrap().push(QuoteCall {
            carrier_code: request.carrier_code.clone(),
            service_code: request.service_code.clone(),
            to_postal_code: request.to_postal_code.clone(),
            weight_ounces: request.weight.to_ounces(),
        });
        if *self.fail_all.lock().unwrap() {
            return Err(Error::RateQuote("injected failure".to_string()));
        }
        self.quotes
            .lock()
            .unwrap()
            .get(&request.carrier_code)
            .copied()
            .ok_or_else(|| {
                Error::RateQuote(format!("no quote scripted for {}", request.carrier_code))
            })
    }
}

/// Mock submitter with auto-incrementing platform ids, injectable rate-limit
/// rejections, and injectable hard failures
pub struct MockSubmitter {
    next_order_id: AtomicU64,
    submit_calls: Mutex<Vec<SubmitCall>>,
    rate_limits: Mutex<HashMap<String, u32>>,
    fail_numbers: Mutex<Vec<String>>,
}

impl MockSubmitter {
    /// Mock that accepts every submission
    pub fn new() -> Self {
        Self {
            next_order_id: AtomicU64::new(900_001),
            submit_calls: Mutex::new(Vec::new()),
            rate_limits: Mutex::new(HashMap::new()),
            fail_numbers: Mutex::new(Vec::new()),
        }
    }

    /// Reject the next `times` submissions of this number as rate limited
    pub fn rate_limit(&self, order_number: &str, times: u32) {
        self.rate_limits
            .lock()
            .unwrap()
            .insert(order_number.to_string(), times);
    }

    /// Reject every submission of this number outright
    pub fn fail_on(&self, order_number: &str) {
        self.fail_numbers
            .lock()
            .unwrap()
            .push(order_number.to_string());
    }

    /// Snapshot of every submit call made
    pub fn submit_calls(&self) -> Vec<SubmitCall> {
        self.submit_calls.lock().unwrap().clone()
    }

    /// How many times this number was submitted
    pub fn calls_for(&self, order_number: &str) -> usize {
        self.submit_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.order_number == order_number)
            .count()
    }
}

impl Default for MockSubmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderSubmitter for MockSubmitter {
    async fn submit(&self, shipment: &ShipmentRecord) -> Result<SubmitReceipt> {
        self.submit_calls.lock().unwrap().push(SubmitCall {
            order_number: shipment.order_number.clone(),
            carrier_code: shipment.carrier_code.clone(),
            bill_to_party: shipment.advanced_options.bill_to_party.clone(),
            tag_ids: shipment.tag_ids.clone(),
        });
        if self
            .fail_numbers
            .lock()
            .unwrap()
            .contains(&shipment.order_number)
        {
            return Err(Error::Submission("injected failure".to_string()));
        }
        if let Some(remaining) = self
            .rate_limits
            .lock()
            .unwrap()
            .get_mut(&shipment.order_number)
        {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(Error::RateLimited);
            }
        }
        Ok(SubmitReceipt {
            order_id: Some(self.next_order_id.fetch_add(1, Ordering::SeqCst)),
            order_number: shipment.order_number.clone(),
        })
    }
}
