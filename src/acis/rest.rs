//! REST API client for the ACIS Trading API

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use super::auth::{default_headers, ApiKey};
use super::messages::*;
use crate::common::errors::{AcisError, Result};
use crate::common::types::{
    AccountPortfolio, HealthStatus, HistoryPoint, Portfolio, RebalanceSuggestion, RiskLevel,
    UsageInfo,
};

/// Low-level REST client: one pooled connection set, one method per endpoint
///
/// Performs no parameter validation; see `AcisClient` for the checked API.
#[derive(Debug, Clone)]
pub struct AcisRestClient {
    /// HTTP client carrying the auth headers
    client: Client,
    /// Base URL without trailing slash
    base_url: String,
}

impl AcisRestClient {
    /// Create a new REST client
    pub fn new(api_key: &ApiKey, base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        let parsed = Url::parse(base_url)
            .map_err(|e| AcisError::Configuration(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(AcisError::Configuration(format!(
                "Invalid base URL '{}': cannot be a base",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers(api_key, user_agent)?)
            .build()
            .map_err(|e| AcisError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Portfolio Generation
    // ========================================================================

    #[instrument(skip(self, request), fields(strategy = %request.strategy))]
    pub async fn generate_portfolio(&self, request: &PortfolioRequest) -> Result<Portfolio> {
        self.post("/portfolios/generate", request).await
    }

    #[instrument(skip(self, request), fields(strategy = %request.strategy, holdings = request.current_positions.len()))]
    pub async fn rebalance(&self, request: &RebalanceRequest) -> Result<Vec<RebalanceSuggestion>> {
        let response: RebalanceResponse = self.post("/portfolios/rebalance", request).await?;
        Ok(response.suggestions)
    }

    // ========================================================================
    // Account & Usage
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn get_usage(&self) -> Result<UsageInfo> {
        self.get("/usage").await
    }

    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<HealthStatus> {
        self.get("/health").await
    }

    #[instrument(skip(self))]
    pub async fn get_risk_levels(&self) -> Result<Vec<RiskLevel>> {
        self.get("/risk-levels").await
    }

    // ========================================================================
    // User Portfolio Management
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn get_user_portfolios(&self) -> Result<Vec<AccountPortfolio>> {
        self.get("/user/portfolios").await
    }

    #[instrument(skip(self))]
    pub async fn get_user_portfolio(&self, strategy_id: &str) -> Result<Portfolio> {
        let url = self.url_with_segments(&["user", "portfolios", strategy_id])?;
        self.execute(self.client.request(Method::GET, url)).await
    }

    #[instrument(skip(self))]
    pub async fn get_user_portfolio_history(
        &self,
        strategy_id: &str,
        query: HistoryQuery,
    ) -> Result<Vec<HistoryPoint>> {
        let url = self.url_with_segments(&["user", "portfolios", strategy_id, "history"])?;
        self.execute(self.client.request(Method::GET, url).query(&query))
            .await
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Append percent-encoded path segments to the base URL
    fn url_with_segments(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AcisError::Configuration(format!("Invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AcisError::Configuration("Base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.execute(self.client.get(self.url(endpoint))).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<T> {
        self.execute(self.client.post(self.url(endpoint)).json(body))
            .await
    }

    /// Send the request and decode a success body or map the error status
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = request.build()?;
        debug!("{} {}", request.method(), request.url());

        let response = self.client.execute(request).await?;
        let status = response.status();
        let text = response.text().await?;
        debug!("Response status: {}", status);

        if !status.is_success() {
            let error = map_error_status(status, &text);
            warn!(status = status.as_u16(), "ACIS API request failed: {}", error);
            return Err(error);
        }

        serde_json::from_str(&text).map_err(|e| {
            AcisError::InvalidResponse(format!("Failed to decode {} response: {}", status, e))
        })
    }
}

/// Map a non-success status and body to the error taxonomy
pub fn map_error_status(status: StatusCode, body: &str) -> AcisError {
    let details = ErrorDetails::parse(body);
    let code = status.as_u16();

    match status {
        StatusCode::UNAUTHORIZED => AcisError::Authentication {
            message: details.message.unwrap_or_else(|| "Invalid API key".to_string()),
            status_code: Some(code),
            response: details.body,
        },
        StatusCode::TOO_MANY_REQUESTS => AcisError::RateLimit {
            message: details
                .message
                .unwrap_or_else(|| "Rate limit exceeded".to_string()),
            reset_at: details.reset_at,
            response: details.body,
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AcisError::Validation {
            field: details.field,
            message: details
                .message
                .unwrap_or_else(|| "Validation error".to_string()),
            status_code: Some(code),
            response: details.body,
        },
        _ => AcisError::Api {
            status_code: code,
            message: details
                .message
                .unwrap_or_else(|| format!("API error: {}", code)),
            response: details.body,
        },
    }
}
