//! Trait definitions for portfolio providers

use async_trait::async_trait;

use super::errors::Result;
use super::types::{Portfolio, RebalancePlan, RebalanceSuggestion, UsageInfo};
use crate::acis::messages::{PortfolioRequest, RebalanceRequest};

/// Source of AI-generated portfolios and rebalancing advice
///
/// `AcisClient` is the production implementation; code that only needs
/// portfolios should depend on this trait so it can be exercised with
/// an in-memory provider.
#[async_trait]
pub trait PortfolioProvider: Send + Sync {
    /// Generate a portfolio for the given request
    async fn generate_portfolio(&self, request: &PortfolioRequest) -> Result<Portfolio>;

    /// Get buy/sell/hold suggestions for existing holdings
    async fn get_rebalance_suggestions(
        &self,
        request: &RebalanceRequest,
    ) -> Result<Vec<RebalanceSuggestion>>;

    /// Get usage for the current quota window
    async fn get_usage(&self) -> Result<UsageInfo>;
}

impl RebalancePlan {
    /// Fetch suggestions from a provider and group them by action
    pub async fn fetch<P>(provider: &P, request: &RebalanceRequest) -> Result<Self>
    where
        P: PortfolioProvider + ?Sized,
    {
        let suggestions = provider.get_rebalance_suggestions(request).await?;
        Ok(Self::from_suggestions(suggestions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::{HoldingInput, RebalanceAction, Strategy};
    use chrono::Utc;

    struct StaticProvider {
        suggestions: Vec<RebalanceSuggestion>,
    }

    #[async_trait]
    impl PortfolioProvider for StaticProvider {
        async fn generate_portfolio(&self, request: &PortfolioRequest) -> Result<Portfolio> {
            Ok(Portfolio {
                strategy: request.strategy.to_string(),
                positions: Vec::new(),
                generated_at: None,
                model_version: None,
                risk_tolerance: Some(request.risk_tolerance),
                total_value: None,
                performance: None,
            })
        }

        async fn get_rebalance_suggestions(
            &self,
            _request: &RebalanceRequest,
        ) -> Result<Vec<RebalanceSuggestion>> {
            Ok(self.suggestions.clone())
        }

        async fn get_usage(&self) -> Result<UsageInfo> {
            Ok(UsageInfo {
                current_usage: 0,
                rate_limit: 100,
                remaining: 100,
                reset_at: Utc::now(),
            })
        }
    }

    fn suggestion(ticker: &str, action: RebalanceAction) -> RebalanceSuggestion {
        RebalanceSuggestion {
            ticker: ticker.to_string(),
            action,
            current_weight: 0.1,
            target_weight: 0.1,
            weight_change: None,
            shares_to_trade: None,
            reason: None,
        }
    }

    #[tokio::test]
    async fn test_plan_fetch_through_trait_object() {
        let provider: Box<dyn PortfolioProvider> = Box::new(StaticProvider {
            suggestions: vec![
                suggestion("AAPL", RebalanceAction::Hold),
                suggestion("NVDA", RebalanceAction::Sell),
            ],
        });
        let request = RebalanceRequest::new(Strategy::Value, vec![HoldingInput::new("AAPL", 0.1)]);

        let plan = RebalancePlan::fetch(provider.as_ref(), &request).await.unwrap();

        assert_eq!(plan.holds.len(), 1);
        assert_eq!(plan.sells[0].ticker, "NVDA");
        assert!(plan.buys.is_empty());
    }
}
