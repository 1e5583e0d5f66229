//! Authenticated Tauros REST client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::{ExchangeError, SigningError};
use crate::signing::{NonceSource, Signer};

use super::types::{ApiEnvelope, BalanceData, NewOrder, OpenOrder, PlacedOrder, WalletBalance};
use super::PrivateExchange;

const PLACE_ORDER_PATH: &str = "/api/v1/trading/placeorder/";
const OPEN_ORDERS_PATH: &str = "/api/v1/trading/myopenorders/";
const CLOSE_ORDER_PATH: &str = "/api/v1/trading/closeorder/";
const GET_BALANCE_PATH: &str = "/api/v1/data/getbalance/";

/// Tauros private API client.
///
/// Every call is signed over the exact body bytes transmitted; query
/// parameters are not part of the signed message, so bodyless requests sign
/// the empty object.
#[derive(Debug, Clone)]
pub struct TaurosClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL (production or staging).
    base_url: String,
    /// API key sent as a bearer token.
    api_key: String,
    /// Request signer built from the API secret.
    signer: Signer,
    /// Shared nonce sequence for this credential pair.
    nonce: Arc<NonceSource>,
}

impl TaurosClient {
    /// Create a client from config. Fails only when the API secret is not
    /// valid base64, which is a startup-fatal configuration error.
    pub fn new(config: &Config) -> Result<Self, SigningError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .expect("failed to create HTTP client");

        Ok(Self {
            http,
            base_url: config.tauros_url().to_string(),
            api_key: config.tauros_api_key.clone(),
            signer: Signer::new(&config.tauros_api_secret)?,
            nonce: Arc::new(NonceSource::new()),
        })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one signed request and decode the response envelope.
    async fn signed_request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body_json: String,
        query: &[(&str, &str)],
    ) -> Result<ApiEnvelope<T>, ExchangeError> {
        let nonce = self.nonce.next();
        let signature = self.signer.sign(path, &body_json, nonce, method.as_str())?;

        debug!(%method, path, nonce, "signed tauros request");

        let mut request = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Taur-Signature", signature)
            .header("Taur-Nonce", nonce.to_string())
            .header("Content-Type", "application/json")
            .body(body_json);

        if !query.is_empty() {
            request = request.query(query);
        }

        let bytes = request.send().await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl PrivateExchange for TaurosClient {
    #[instrument(skip(self, order), fields(market = %order.market, price = %order.price))]
    async fn place_order(&self, order: &NewOrder) -> Result<PlacedOrder, ExchangeError> {
        // Serialize once; the same string is signed and transmitted.
        let body = serde_json::to_string(order)?;
        self.signed_request(Method::POST, PLACE_ORDER_PATH, body, &[])
            .await?
            .into_result()
    }

    #[instrument(skip(self))]
    async fn open_orders(&self, market: Option<&str>) -> Result<Vec<OpenOrder>, ExchangeError> {
        let query: Vec<(&str, &str)> = market.map(|m| ("market", m)).into_iter().collect();
        self.signed_request(Method::GET, OPEN_ORDERS_PATH, "{}".to_string(), &query)
            .await?
            .into_result()
    }

    #[instrument(skip(self))]
    async fn close_order(&self, order_id: u64) -> Result<(), ExchangeError> {
        let body = serde_json::to_string(&serde_json::json!({ "id": order_id }))?;
        let envelope: ApiEnvelope<serde_json::Value> = self
            .signed_request(Method::POST, CLOSE_ORDER_PATH, body, &[])
            .await?;

        // The close payload is uninteresting; only the success flag matters.
        if !envelope.success {
            return Err(ExchangeError::Rejected {
                msg: envelope.msg.unwrap_or_else(|| "unspecified error".to_string()),
            });
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn balance(&self, currency: &str) -> Result<WalletBalance, ExchangeError> {
        let data: BalanceData = self
            .signed_request(
                Method::GET,
                GET_BALANCE_PATH,
                "{}".to_string(),
                &[("coin", currency)],
            )
            .await?
            .into_result()?;
        Ok(data.balances)
    }
}
