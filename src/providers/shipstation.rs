//! ShipStation v1 API client

use crate::error::{Error, Result};
use crate::providers::{OrderSubmitter, RateProvider, RateRequest, SubmitReceipt};
use crate::types::{Dimensions, ShipmentRecord, Weight};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Hosted API endpoint
pub const SHIPSTATION_BASE_URL: &str = "https://ssapi.shipstation.com";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// API key environment variable
const API_KEY_VAR: &str = "SHIPSTATION_API_KEY";

/// API secret environment variable
const API_SECRET_VAR: &str = "SHIPSTATION_API_SECRET";

/// ShipStation client using reqwest with HTTP basic auth
pub struct ShipStationClient {
    client: Client,
    base_url: String,
    auth_header: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RatePayload<'a> {
    carrier_code: &'a str,
    service_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    package_code: Option<&'a str>,
    from_postal_code: &'a str,
    to_state: &'a str,
    to_country: &'a str,
    to_postal_code: &'a str,
    weight: &'a Weight,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<&'a Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    confirmation: Option<&'a str>,
    residential: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RateQuoteRow {
    service_code: Option<String>,
    shipment_cost: Decimal,
    other_cost: Decimal,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderResponse {
    order_id: Option<u64>,
    order_number: String,
}

impl ShipStationClient {
    /// Create a client against a specific endpoint
    pub fn new(
        api_key: &str,
        api_secret: &str,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        let credentials = BASE64.encode(format!("{api_key}:{api_secret}"));

        Self {
            client,
            base_url: base_url.into(),
            auth_header: format!("Basic {credentials}"),
        }
    }

    /// Create a client from environment credentials
    pub fn from_env(base_url: &str, timeout: Duration) -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR)
            .map_err(|_| Error::Auth(format!("{API_KEY_VAR} is not set")))?;
        let api_secret = std::env::var(API_SECRET_VAR)
            .map_err(|_| Error::Auth(format!("{API_SECRET_VAR} is not set")))?;
        Ok(Self::new(&api_key, &api_secret, base_url, timeout))
    }

    /// Create a client for the hosted API with the default timeout
    pub fn from_env_default() -> Result<Self> {
        Self::from_env(SHIPSTATION_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl RateProvider for ShipStationClient {
    async fn quote(&self, request: &RateRequest) -> Result<Decimal> {
        let payload = RatePayload {
            carrier_code: &request.carrier_code,
            service_code: &request.service_code,
            package_code: request.package_code.as_deref(),
            from_postal_code: &request.from_postal_code,
            to_state: &request.to_state,
            to_country: &request.to_country,
            to_postal_code: &request.to_postal_code,
            weight: &request.weight,
            dimensions: request.dimensions.as_ref(),
            confirmation: request.confirmation.as_deref(),
            residential: request.residential,
        };

        let response = self
            .client
            .post(self.api_url("/shipments/getrates"))
            .header("Authorization", &self.auth_header)
            .json(&payload)
            .send()
            .await?;
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited);
        }
        let rows: Vec<RateQuoteRow> = response
            .error_for_status()
            .map_err(|e| Error::RateQuote(e.to_string()))?
            .json()
            .await?;

        let row = rows.first().ok_or_else(|| {
            Error::RateQuote(format!(
                "{} returned no services for {}",
                request.carrier_code, request.service_code
            ))
        })?;
        let total = row.shipment_cost + row.other_cost;
        debug!(
            carrier = %request.carrier_code,
            service = row.service_code.as_deref().unwrap_or(&request.service_code),
            %total,
            "rate quoted"
        );
        Ok(total)
    }
}

#[async_trait]
impl OrderSubmitter for ShipStationClient {
    async fn submit(&self, shipment: &ShipmentRecord) -> Result<SubmitReceipt> {
        let response = self
            .client
            .post(self.api_url("/orders/createorder"))
            .header("Authorization", &self.auth_header)
            .json(shipment)
            .send()
            .await?;
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited);
        }
        let created: CreateOrderResponse = response
            .error_for_status()
            .map_err(|e| Error::Submission(e.to_string()))?
            .json()
            .await?;

        debug!(
            order_number = %created.order_number,
            order_id = ?created.order_id,
            "shipment submitted"
        );
        Ok(SubmitReceipt {
            order_id: created.order_id,
            order_number: created.order_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Address, AdvancedOptions};

    fn make_client(server: &mockito::ServerGuard) -> ShipStationClient {
        ShipStationClient::new("key", "secret", server.url(), Duration::from_secs(5))
    }

    fn make_request() -> RateRequest {
        RateRequest {
            carrier_code: "fedex".to_string(),
            service_code: "fedex_home_delivery".to_string(),
            package_code: Some("package".to_string()),
            from_postal_code: "30318".to_string(),
            to_state: "GA".to_string(),
            to_country: "US".to_string(),
            to_postal_code: "30303".to_string(),
            weight: Weight::ounces(42.0),
            dimensions: Some(Dimensions::inches(12.0, 10.0, 6.0)),
            confirmation: Some("delivery".to_string()),
            residential: true,
        }
    }

    fn make_shipment() -> ShipmentRecord {
        ShipmentRecord {
            order_number: "1001".to_string(),
            order_key: "key-1".to_string(),
            order_date: None,
            payment_date: None,
            order_status: "awaiting_shipment".to_string(),
            customer_email: None,
            bill_to: None,
            ship_to: Address {
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
            },
            items: Vec::new(),
            order_total: Decimal::ZERO,
            amount_paid: None,
            tag_ids: Vec::new(),
            weight: Weight::ounces(42.0),
            dimensions: None,
            carrier_code: Some("fedex".to_string()),
            service_code: Some("fedex_home_delivery".to_string()),
            package_code: Some("package".to_string()),
            confirmation: None,
            advanced_options: AdvancedOptions::default(),
        }
    }

    #[tokio::test]
    async fn test_quote_sums_shipment_and_other_cost() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/shipments/getrates")
            .match_header("authorization", "Basic a2V5OnNlY3JldA==")
            .with_status(200)
            .with_body(
                r#"[{"serviceName":"FedEx Home Delivery","serviceCode":"fedex_home_delivery","shipmentCost":9.10,"otherCost":0.89}]"#,
            )
            .create_async()
            .await;
        let client = make_client(&server);

        let rate = client.quote(&make_request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(rate, Decimal::new(999, 2));
    }

    #[tokio::test]
    async fn test_quote_with_no_services_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/shipments/getrates")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let client = make_client(&server);

        let err = client.quote(&make_request()).await.unwrap_err();
        assert!(matches!(err, Error::RateQuote(_)));
    }

    #[tokio::test]
    async fn test_quote_maps_429_to_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/shipments/getrates")
            .with_status(429)
            .create_async()
            .await;
        let client = make_client(&server);

        let err = client.quote(&make_request()).await.unwrap_err();
        assert!(matches!(err, Error::RateLimited));
    }

    #[tokio::test]
    async fn test_quote_maps_server_error_to_rate_quote() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/shipments/getrates")
            .with_status(500)
            .create_async()
            .await;
        let client = make_client(&server);

        let err = client.quote(&make_request()).await.unwrap_err();
        assert!(matches!(err, Error::RateQuote(_)));
    }

    #[tokio::test]
    async fn test_submit_returns_the_platform_receipt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/orders/createorder")
            .match_header("authorization", "Basic a2V5OnNlY3JldA==")
            .with_status(200)
            .with_body(r#"{"orderId":987654,"orderNumber":"1001"}"#)
            .create_async()
            .await;
        let client = make_client(&server);

        let receipt = client.submit(&make_shipment()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(receipt.order_id, Some(987_654));
        assert_eq!(receipt.order_number, "1001");
    }

    #[tokio::test]
    async fn test_submit_maps_429_to_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/orders/createorder")
            .with_status(429)
            .create_async()
            .await;
        let client = make_client(&server);

        let err = client.submit(&make_shipment()).await.unwrap_err();
        assert!(matches!(err, Error::RateLimited));
    }
}
