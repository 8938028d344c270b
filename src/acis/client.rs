//! Main ACIS client: validated, typed access to the REST API

use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, instrument};

use super::auth::{ApiKey, DEFAULT_USER_AGENT};
use super::messages::{HistoryQuery, PortfolioRequest, RebalanceRequest};
use super::rest::AcisRestClient;
use crate::common::errors::{AcisError, Result};
use crate::common::traits::PortfolioProvider;
use crate::common::types::{
    AccountPortfolio, HealthStatus, HistoryPoint, Portfolio, RebalanceSuggestion, RiskLevel,
    Strategy, UsageInfo,
};
use crate::config::types::{AcisConfig, DEFAULT_BASE_URL};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// ACIS Trading API client
///
/// Every request is checked locally first: invalid parameters fail with
/// [`AcisError::Validation`] without touching the network. Cloning is cheap
/// and clones share the connection pool.
///
/// ```rust,no_run
/// use acis_trading::{AcisClient, PortfolioRequest, Strategy};
///
/// # async fn run() -> acis_trading::Result<()> {
/// let client = AcisClient::new("acis_live_xxx")?;
/// let portfolio = client
///     .generate_portfolio(&PortfolioRequest::new(Strategy::Value).max_positions(25))
///     .await?;
/// for position in &portfolio.positions {
///     println!("{}: {:.1}%", position.ticker, position.weight * 100.0);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AcisClient {
    rest: AcisRestClient,
}

/// Builder for [`AcisClient`]
#[derive(Debug, Clone)]
pub struct AcisClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl AcisClientBuilder {
    /// Override the production base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<AcisClient> {
        if self.timeout.is_zero() {
            return Err(AcisError::Configuration(
                "Request timeout must be greater than zero".to_string(),
            ));
        }
        let api_key = ApiKey::new(self.api_key)?;
        let rest = AcisRestClient::new(&api_key, &self.base_url, self.timeout, &self.user_agent)?;
        info!(base_url = rest.base_url(), "ACIS client initialized");
        Ok(AcisClient { rest })
    }
}

impl AcisClient {
    /// Client against the production API with a 30 second timeout
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: impl Into<String>) -> AcisClientBuilder {
        AcisClientBuilder {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &AcisConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| AcisError::Authentication {
            message: "API key is required (set ACIS_API_KEY)".to_string(),
            status_code: None,
            response: None,
        })?;

        let mut builder = Self::builder(api_key)
            .base_url(config.base_url.clone())
            .timeout(Duration::from_secs(config.timeout_seconds));
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        builder.build()
    }

    /// Get a reference to the REST client
    pub fn rest(&self) -> &AcisRestClient {
        &self.rest
    }

    // ========================================================================
    // Portfolio Generation
    // ========================================================================

    /// Generate an AI-optimized portfolio
    #[instrument(skip(self, request), fields(strategy = %request.strategy, max_positions = request.max_positions), err)]
    pub async fn generate_portfolio(&self, request: &PortfolioRequest) -> Result<Portfolio> {
        request.validate()?;
        self.rest.generate_portfolio(request).await
    }

    /// Generate a portfolio from an untyped strategy name
    ///
    /// Unknown strategy names fail locally with a validation error on `strategy`.
    #[instrument(skip(self), err)]
    pub async fn generate_portfolio_named(&self, strategy: &str, max_positions: u32) -> Result<Portfolio> {
        let strategy: Strategy = strategy.parse()?;
        self.generate_portfolio(&PortfolioRequest::new(strategy).max_positions(max_positions))
            .await
    }

    /// Get buy/sell/hold suggestions moving the holdings toward a strategy
    ///
    /// Suggestions are returned exactly as the server sent them.
    #[instrument(skip(self, request), fields(strategy = %request.strategy, holdings = request.current_positions.len()), err)]
    pub async fn get_rebalance_suggestions(
        &self,
        request: &RebalanceRequest,
    ) -> Result<Vec<RebalanceSuggestion>> {
        request.validate()?;
        self.rest.rebalance(request).await
    }

    #[instrument(skip(self), err)]
    pub async fn get_value_portfolio(&self, max_positions: u32) -> Result<Portfolio> {
        self.fixed_strategy(Strategy::Value, max_positions).await
    }

    #[instrument(skip(self), err)]
    pub async fn get_growth_portfolio(&self, max_positions: u32) -> Result<Portfolio> {
        self.fixed_strategy(Strategy::Growth, max_positions).await
    }

    #[instrument(skip(self), err)]
    pub async fn get_dividend_portfolio(&self, max_positions: u32) -> Result<Portfolio> {
        self.fixed_strategy(Strategy::Dividend, max_positions).await
    }

    /// Market-regime aware portfolio
    #[instrument(skip(self), err)]
    pub async fn get_adaptive_portfolio(&self, max_positions: u32) -> Result<Portfolio> {
        self.fixed_strategy(Strategy::Adaptive, max_positions).await
    }

    async fn fixed_strategy(&self, strategy: Strategy, max_positions: u32) -> Result<Portfolio> {
        self.generate_portfolio(&PortfolioRequest::new(strategy).max_positions(max_positions))
            .await
    }

    // ========================================================================
    // Account & Usage
    // ========================================================================

    /// Usage for the current quota window
    #[instrument(skip(self), err)]
    pub async fn get_usage(&self) -> Result<UsageInfo> {
        self.rest.get_usage().await
    }

    #[instrument(skip(self), err)]
    pub async fn health_check(&self) -> Result<HealthStatus> {
        self.rest.health_check().await
    }

    /// Available risk profiles and their parameters
    #[instrument(skip(self), err)]
    pub async fn get_risk_levels(&self) -> Result<Vec<RiskLevel>> {
        self.rest.get_risk_levels().await
    }

    // ========================================================================
    // User Portfolio Management
    // ========================================================================

    /// Portfolios the account is subscribed to
    #[instrument(skip(self), err)]
    pub async fn get_my_portfolios(&self) -> Result<Vec<AccountPortfolio>> {
        self.rest.get_user_portfolios().await
    }

    /// Full portfolio, including performance, for an account strategy id
    #[instrument(skip(self), err)]
    pub async fn get_portfolio(&self, strategy_id: &str) -> Result<Portfolio> {
        let strategy_id = non_empty_id(strategy_id)?;
        self.rest.get_user_portfolio(strategy_id).await
    }

    /// Daily values for an account portfolio; `days` must be within 1..=365
    #[instrument(skip(self), err)]
    pub async fn get_portfolio_history(&self, strategy_id: &str, days: u32) -> Result<Vec<HistoryPoint>> {
        let strategy_id = non_empty_id(strategy_id)?;
        let query = HistoryQuery::new(days)?;
        self.rest.get_user_portfolio_history(strategy_id, query).await
    }
}

fn non_empty_id(strategy_id: &str) -> Result<&str> {
    let trimmed = strategy_id.trim();
    if trimmed.is_empty() {
        return Err(AcisError::invalid_field("strategy", "strategy id must not be empty"));
    }
    Ok(trimmed)
}

#[async_trait]
impl PortfolioProvider for AcisClient {
    async fn generate_portfolio(&self, request: &PortfolioRequest) -> Result<Portfolio> {
        AcisClient::generate_portfolio(self, request).await
    }

    async fn get_rebalance_suggestions(
        &self,
        request: &RebalanceRequest,
    ) -> Result<Vec<RebalanceSuggestion>> {
        AcisClient::get_rebalance_suggestions(self, request).await
    }

    async fn get_usage(&self) -> Result<UsageInfo> {
        AcisClient::get_usage(self).await
    }
}
