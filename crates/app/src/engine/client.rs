//! HTTP client for the Super Engine API.
//!
//! Wraps `reqwest` with bearer-token injection and normalized error
//! reporting. Non-2xx responses become [`EngineError::Status`] carrying
//! the numeric status and the `Retry-After` hint so callers can branch on
//! them; transport failures propagate unclassified.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode, header::CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

use growth_labs_core::{Campaign, CampaignId, CreatorProfile};

use crate::config::EngineConfig;
use crate::identity::AccessToken;

use super::EngineError;
use super::types::{
    CampaignCreate, OnboardingSubmission, campaign_from_value, campaigns_from_value,
    profile_from_value,
};

/// Request timeout for all engine calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Super Engine API.
///
/// Cheaply cloneable; holds no mutable state. Retry policy lives in the
/// onboarding gate, never here.
#[derive(Clone)]
pub struct EngineClient {
    inner: Arc<EngineClientInner>,
}

struct EngineClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl EngineClient {
    /// Create a new Super Engine API client.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be constructed, which
    /// only happens on TLS backend misconfiguration.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(EngineClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
            }),
        }
    }

    /// Execute a request against the engine.
    ///
    /// Sets `Authorization: Bearer <token>` when a token is supplied and
    /// `Content-Type: application/json` when a body is present.
    ///
    /// - 204 resolves to `Ok(None)` regardless of body content
    /// - other 2xx responses resolve to the parsed JSON body
    /// - non-2xx responses become [`EngineError::Status`]
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Http`] on transport failure,
    /// [`EngineError::Status`] on non-success responses, and
    /// [`EngineError::Parse`] when a success body is not valid JSON.
    #[instrument(skip(self, token, body), fields(method = %method, path = %path))]
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        token: Option<&AccessToken>,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<Value>, EngineError> {
        let url = format!("{}{path}", self.inner.base_url);

        let mut request = self.inner.client.request(method, &url);
        if let Some(token) = token {
            request = request.bearer_auth(token.as_str());
        }
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        // 204 means success with no payload, whatever the body says
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        // Read Retry-After before the body consumes the response
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::debug!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Engine returned non-success status"
            );
            return Err(EngineError::Status {
                status: status.as_u16(),
                retry_after,
                message: response_text.chars().take(200).collect(),
            });
        }

        if response_text.is_empty() {
            return Ok(None);
        }

        let value = serde_json::from_str(&response_text)?;
        Ok(Some(value))
    }

    /// `GET` a path.
    ///
    /// # Errors
    ///
    /// See [`EngineClient::request`].
    pub async fn get(
        &self,
        token: Option<&AccessToken>,
        path: &str,
    ) -> Result<Option<Value>, EngineError> {
        self.request::<()>(token, Method::GET, path, None).await
    }

    /// `POST` a path with an optional JSON body.
    ///
    /// # Errors
    ///
    /// See [`EngineClient::request`].
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        token: Option<&AccessToken>,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<Value>, EngineError> {
        self.request(token, Method::POST, path, body).await
    }

    /// `PATCH` a path with an optional JSON body.
    ///
    /// # Errors
    ///
    /// See [`EngineClient::request`].
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        token: Option<&AccessToken>,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<Value>, EngineError> {
        self.request(token, Method::PATCH, path, body).await
    }

    /// `DELETE` a path.
    ///
    /// # Errors
    ///
    /// See [`EngineClient::request`].
    pub async fn delete(
        &self,
        token: Option<&AccessToken>,
        path: &str,
    ) -> Result<Option<Value>, EngineError> {
        self.request::<()>(token, Method::DELETE, path, None).await
    }

    /// `GET` a path and deserialize the body.
    ///
    /// # Errors
    ///
    /// [`EngineError::MissingBody`] when the engine answers 204/empty.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        token: Option<&AccessToken>,
        path: &str,
    ) -> Result<T, EngineError> {
        let value = self.get(token, path).await?.ok_or(EngineError::MissingBody)?;
        Ok(serde_json::from_value(value)?)
    }

    // =========================================================================
    // Onboarding
    // =========================================================================

    /// Fetch the creator profile backing the onboarding gate.
    ///
    /// # Errors
    ///
    /// `Status { status: 404, .. }` when no profile exists yet and
    /// `Status { status: 503, .. }` while the account is still
    /// provisioning; the gate interprets both.
    pub async fn fetch_onboarding(
        &self,
        token: &AccessToken,
    ) -> Result<CreatorProfile, EngineError> {
        let value = self
            .get(Some(token), "/onboarding")
            .await?
            .ok_or(EngineError::MissingBody)?;
        profile_from_value(value)
    }

    /// Create the creator profile, completing onboarding.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the submission.
    pub async fn submit_onboarding(
        &self,
        token: &AccessToken,
        submission: &OnboardingSubmission,
    ) -> Result<CreatorProfile, EngineError> {
        let value = self
            .post(Some(token), "/onboarding", Some(submission))
            .await?
            .ok_or(EngineError::MissingBody)?;
        profile_from_value(value)
    }

    // =========================================================================
    // Campaigns
    // =========================================================================

    /// List the user's campaigns, normalized from the engine's loose wire
    /// shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// normalized.
    pub async fn list_campaigns(&self, token: &AccessToken) -> Result<Vec<Campaign>, EngineError> {
        let value = self
            .get(Some(token), "/campaigns")
            .await?
            .ok_or(EngineError::MissingBody)?;
        campaigns_from_value(value)
    }

    /// Fetch a single campaign.
    ///
    /// # Errors
    ///
    /// `Status { status: 404, .. }` when the campaign does not exist.
    pub async fn get_campaign(
        &self,
        token: &AccessToken,
        id: &CampaignId,
    ) -> Result<Campaign, EngineError> {
        let value = self
            .get(Some(token), &format!("/campaigns/{id}"))
            .await?
            .ok_or(EngineError::MissingBody)?;
        campaign_from_value(value)
    }

    /// Create a campaign from a completed wizard draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the submission.
    pub async fn create_campaign(
        &self,
        token: &AccessToken,
        create: &CampaignCreate,
    ) -> Result<Campaign, EngineError> {
        let value = self
            .post(Some(token), "/campaigns", Some(create))
            .await?
            .ok_or(EngineError::MissingBody)?;
        campaign_from_value(value)
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Whether the engine answers its health endpoint.
    pub async fn ping(&self) -> bool {
        self.request::<()>(None, Method::GET, "/health", None)
            .await
            .is_ok()
    }
}
