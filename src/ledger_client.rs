//! Marketplace Ledger API Client
//!
//! HTTP client for the remote ledger's REST gateway. Provides the account,
//! offer, resource, and asset endpoints the flows depend on. All methods
//! are a single request with no retries; a failed submission requires
//! explicit re-initiation by the caller.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::models::{Account, Asset, NewAsset, NewOffer, Offer, OfferAcceptance, Resource};

/// Errors surfaced by the ledger API.
///
/// Flows branch on `NotFound` to distinguish benign-absent state (empty
/// listings, unregistered session keys) from real failures; everything
/// else aborts the calling flow.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested entity does not exist on the ledger
    #[error("not found: {0}")]
    NotFound(String),
    /// The ledger rejected the request (validation, closed offer, ...)
    #[error("ledger rejected the request ({status}): {message}")]
    Ledger { status: u16, message: String },
    /// The request never produced a response
    #[error("failed to reach the ledger")]
    Transport(#[from] reqwest::Error),
    /// The response body did not match the expected shape
    #[error("failed to decode ledger response")]
    Decode(#[source] reqwest::Error),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

/// Error body the ledger gateway attaches to rejections.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the marketplace ledger REST API.
///
/// Holds one shared `reqwest::Client`; cheap to clone indirectly via
/// `Arc` in the flows.
pub struct LedgerClient {
    /// Base URL of the ledger gateway (e.g., "http://127.0.0.1:8000")
    base_url: String,
    /// HTTP client instance
    client: reqwest::Client,
}

impl LedgerClient {
    /// Create a new client from the API configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Fetch one account by public key.
    pub async fn get_account(&self, public_key: &str) -> Result<Account, ApiError> {
        self.get(&format!("accounts/{}", public_key)).await
    }

    /// Fetch every account, with assets. Listing flows use this to pair
    /// asset ids with resource names.
    pub async fn get_accounts(&self) -> Result<Vec<Account>, ApiError> {
        self.get("accounts").await
    }

    /// Fetch one offer by id.
    pub async fn get_offer(&self, id: Uuid) -> Result<Offer, ApiError> {
        self.get(&format!("offers/{}", id)).await
    }

    /// Fetch every offer.
    pub async fn get_offers(&self) -> Result<Vec<Offer>, ApiError> {
        self.get("offers").await
    }

    /// Fetch one resource by name, with its rules and owners.
    pub async fn get_resource(&self, name: &str) -> Result<Resource, ApiError> {
        self.get(&format!("resources/{}", name)).await
    }

    /// Fetch every resource.
    pub async fn get_resources(&self) -> Result<Vec<Resource>, ApiError> {
        self.get("resources").await
    }

    /// Create an asset for the session account. The ledger assigns the id
    /// and an initial quantity of zero.
    pub async fn create_asset(&self, asset: &NewAsset) -> Result<Asset, ApiError> {
        let url = format!("{}/assets", self.base_url);
        debug!(%url, resource = %asset.resource, "posting new asset");
        let response = self.client.post(&url).json(asset).send().await?;
        decode(response).await
    }

    /// Publish an offer for the session account.
    pub async fn create_offer(&self, offer: &NewOffer) -> Result<Offer, ApiError> {
        let url = format!("{}/offers", self.base_url);
        debug!(%url, source = %offer.source, "posting new offer");
        let response = self.client.post(&url).json(offer).send().await?;
        decode(response).await
    }

    /// Accept an offer with a resolved acceptance. The gateway responds
    /// with an empty body once the exchange is submitted for settlement.
    pub async fn accept_offer(
        &self,
        offer_id: Uuid,
        acceptance: &OfferAcceptance,
    ) -> Result<(), ApiError> {
        let url = format!("{}/offers/{}/accept", self.base_url, offer_id);
        debug!(%url, count = acceptance.count, "submitting acceptance");
        let response = self.client.patch(&url).json(acceptance).send().await?;
        expect_success(response).await
    }

    /// Close an offer, ending further acceptances. Only the offer's owner
    /// may close it; the ledger enforces this.
    pub async fn close_offer(&self, offer_id: Uuid) -> Result<(), ApiError> {
        let url = format!("{}/offers/{}/close", self.base_url, offer_id);
        debug!(%url, "closing offer");
        let response = self.client.patch(&url).send().await?;
        expect_success(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "fetching");
        let response = self.client.get(&url).send().await?;
        decode(response).await
    }
}

/// Map a response to the decoded body or the error taxonomy.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let response = reject_errors(response).await?;
    response.json().await.map_err(ApiError::Decode)
}

/// Map a response to success, discarding any body.
async fn expect_success(response: reqwest::Response) -> Result<(), ApiError> {
    reject_errors(response).await.map(|_| ())
}

/// Turn non-success statuses into the error taxonomy, extracting the
/// gateway's `{"error": ...}` body when one is present.
async fn reject_errors(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(response.url().path().to_string()));
    }
    if !status.is_success() {
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| status.to_string());
        return Err(ApiError::Ledger {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}
