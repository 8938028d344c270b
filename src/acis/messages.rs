//! Request payloads and response envelopes for the ACIS REST API

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::errors::{AcisError, Result};
use crate::common::types::{HoldingInput, MarketCap, RebalanceSuggestion, RiskTolerance, Strategy};

/// Smallest portfolio the API will build
pub const MIN_POSITIONS: u32 = 5;
/// Largest portfolio the API will build
pub const MAX_POSITIONS: u32 = 50;
pub const DEFAULT_MAX_POSITIONS: u32 = 20;
/// Minimum weight deviation that triggers a buy/sell instead of hold
pub const DEFAULT_REBALANCE_THRESHOLD: f64 = 0.03;
pub const DEFAULT_HISTORY_DAYS: u32 = 30;
pub const MAX_HISTORY_DAYS: u32 = 365;

/// Body of `POST /portfolios/generate`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioRequest {
    pub strategy: Strategy,
    pub max_positions: u32,
    pub risk_tolerance: RiskTolerance,
    /// Amount to invest; enables per-position share counts
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub investment_amount: Option<Decimal>,
}

impl PortfolioRequest {
    /// Request with the default size (20) and moderate risk
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            max_positions: DEFAULT_MAX_POSITIONS,
            risk_tolerance: RiskTolerance::default(),
            investment_amount: None,
        }
    }

    pub fn max_positions(mut self, max_positions: u32) -> Self {
        self.max_positions = max_positions;
        self
    }

    pub fn risk_tolerance(mut self, risk_tolerance: RiskTolerance) -> Self {
        self.risk_tolerance = risk_tolerance;
        self
    }

    pub fn investment_amount(mut self, amount: Decimal) -> Self {
        self.investment_amount = Some(amount);
        self
    }

    /// Check the request locally before it is sent
    pub fn validate(&self) -> Result<()> {
        if !(MIN_POSITIONS..=MAX_POSITIONS).contains(&self.max_positions) {
            return Err(AcisError::invalid_field(
                "max_positions",
                format!(
                    "must be between {} and {}, got {}",
                    MIN_POSITIONS, MAX_POSITIONS, self.max_positions
                ),
            ));
        }
        if let Some(amount) = self.investment_amount {
            if amount <= Decimal::ZERO {
                return Err(AcisError::invalid_field(
                    "investment_amount",
                    format!("must be positive, got {}", amount),
                ));
            }
        }
        Ok(())
    }
}

/// Body of `POST /portfolios/rebalance`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RebalanceRequest {
    pub current_positions: Vec<HoldingInput>,
    pub strategy: Strategy,
    pub market_cap: MarketCap,
    pub rebalance_threshold: f64,
}

impl RebalanceRequest {
    pub fn new(strategy: Strategy, current_positions: Vec<HoldingInput>) -> Self {
        Self {
            current_positions,
            strategy,
            market_cap: MarketCap::default(),
            rebalance_threshold: DEFAULT_REBALANCE_THRESHOLD,
        }
    }

    pub fn market_cap(mut self, market_cap: MarketCap) -> Self {
        self.market_cap = market_cap;
        self
    }

    pub fn rebalance_threshold(mut self, threshold: f64) -> Self {
        self.rebalance_threshold = threshold;
        self
    }

    /// Check the request locally before it is sent.
    ///
    /// Holdings are not inspected; an empty list is a valid request.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.rebalance_threshold;
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(AcisError::invalid_field(
                "rebalance_threshold",
                format!("must be between 0 and 1, got {}", threshold),
            ));
        }
        Ok(())
    }
}

/// Query string of `GET /user/portfolios/{id}/history`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HistoryQuery {
    pub days: u32,
}

impl HistoryQuery {
    pub fn new(days: u32) -> Result<Self> {
        if !(1..=MAX_HISTORY_DAYS).contains(&days) {
            return Err(AcisError::invalid_field(
                "days",
                format!("must be between 1 and {}, got {}", MAX_HISTORY_DAYS, days),
            ));
        }
        Ok(Self { days })
    }
}

/// Response envelope of `POST /portfolios/rebalance`
#[derive(Debug, Clone, Deserialize)]
pub struct RebalanceResponse {
    #[serde(default)]
    pub suggestions: Vec<RebalanceSuggestion>,
}

/// Details extracted from a non-success response body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorDetails {
    pub message: Option<String>,
    pub field: Option<String>,
    pub reset_at: Option<String>,
    /// Decoded body, or the raw text wrapped as `{"detail": ...}`
    pub body: Option<serde_json::Value>,
}

impl ErrorDetails {
    /// Parse an error body.
    ///
    /// `detail` may be a string or a list of `{"loc": [...], "msg": ...}`
    /// entries; the first entry wins. Non-JSON bodies become the message.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::default();
        }

        let body: serde_json::Value = match serde_json::from_str(trimmed) {
            Ok(value) => value,
            Err(_) => {
                return Self {
                    message: Some(trimmed.to_string()),
                    body: Some(serde_json::json!({ "detail": trimmed })),
                    ..Self::default()
                }
            }
        };

        let mut details = Self::default();
        match body.get("detail") {
            Some(serde_json::Value::String(detail)) => details.message = Some(detail.clone()),
            Some(serde_json::Value::Array(entries)) => {
                if let Some(first) = entries.first() {
                    details.message = first
                        .get("msg")
                        .and_then(|m| m.as_str())
                        .map(|m| m.to_string());
                    details.field = first
                        .get("loc")
                        .and_then(|loc| loc.as_array())
                        .and_then(|loc| loc.last())
                        .map(|last| match last {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        });
                }
            }
            Some(serde_json::Value::Null) | None => {}
            Some(other) => details.message = Some(other.to_string()),
        }

        if details.field.is_none() {
            details.field = body
                .get("field")
                .and_then(|f| f.as_str())
                .map(|f| f.to_string());
        }

        details.reset_at = match body.get("reset_at") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };

        details.body = Some(body);
        details
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_portfolio_request_defaults() {
        let request = PortfolioRequest::new(Strategy::Value);
        assert_eq!(request.max_positions, 20);
        assert_eq!(request.risk_tolerance, RiskTolerance::Moderate);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_portfolio_request_bounds() {
        for n in [5, 20, 50] {
            assert!(PortfolioRequest::new(Strategy::Growth).max_positions(n).validate().is_ok());
        }
        for n in [0, 4, 51, 1000] {
            let err = PortfolioRequest::new(Strategy::Growth)
                .max_positions(n)
                .validate()
                .unwrap_err();
            assert!(matches!(
                err,
                AcisError::Validation { ref field, status_code: None, .. } if field.as_deref() == Some("max_positions")
            ));
        }
    }

    #[test]
    fn test_investment_amount_must_be_positive() {
        let zero = PortfolioRequest::new(Strategy::Dividend).investment_amount(Decimal::ZERO);
        assert!(zero.validate().is_err());
        let ok = PortfolioRequest::new(Strategy::Dividend).investment_amount(dec!(10000));
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_portfolio_request_body() {
        let body = serde_json::to_value(PortfolioRequest::new(Strategy::ValueSmallcap)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "strategy": "value_smallcap",
                "max_positions": 20,
                "risk_tolerance": "moderate"
            })
        );

        let body = serde_json::to_value(
            PortfolioRequest::new(Strategy::Value)
                .risk_tolerance(RiskTolerance::Aggressive)
                .investment_amount(dec!(25000.5)),
        )
        .unwrap();
        assert_eq!(body["investment_amount"], 25000.5);
        assert_eq!(body["risk_tolerance"], "aggressive");
    }

    #[test]
    fn test_rebalance_request_body() {
        let request = RebalanceRequest::new(
            Strategy::Value,
            vec![HoldingInput::new("AAPL", 0.15).with_shares(100)],
        );
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["rebalance_threshold"], 0.03);
        assert_eq!(body["market_cap"], "large");
        assert_eq!(body["current_positions"][0]["ticker"], "AAPL");
        assert_eq!(body["current_positions"][0]["shares"], 100);
    }

    #[test]
    fn test_rebalance_threshold_bounds() {
        let base = RebalanceRequest::new(Strategy::Growth, Vec::new());
        assert!(base.clone().validate().is_ok());
        assert!(base.clone().rebalance_threshold(0.0).validate().is_ok());
        assert!(base.clone().rebalance_threshold(-0.01).validate().is_err());
        assert!(base.clone().rebalance_threshold(1.5).validate().is_err());
        assert!(base.rebalance_threshold(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_history_query_bounds() {
        assert!(HistoryQuery::new(1).is_ok());
        assert!(HistoryQuery::new(365).is_ok());
        assert!(HistoryQuery::new(0).is_err());
        assert!(HistoryQuery::new(366).is_err());
    }

    #[test]
    fn test_error_details_string_detail() {
        let details = ErrorDetails::parse(r#"{"detail": "Invalid API key"}"#);
        assert_eq!(details.message.as_deref(), Some("Invalid API key"));
        assert_eq!(details.field, None);
    }

    #[test]
    fn test_error_details_list_detail() {
        let details = ErrorDetails::parse(
            r#"{"detail": [{"loc": ["body", "max_positions"], "msg": "ensure this value is less than or equal to 50", "type": "value_error"}]}"#,
        );
        assert_eq!(details.field.as_deref(), Some("max_positions"));
        assert_eq!(
            details.message.as_deref(),
            Some("ensure this value is less than or equal to 50")
        );
    }

    #[test]
    fn test_error_details_reset_at_verbatim() {
        let details = ErrorDetails::parse(
            r#"{"detail": "Rate limit exceeded", "reset_at": "2024-01-15T00:00:00+00:00"}"#,
        );
        assert_eq!(details.reset_at.as_deref(), Some("2024-01-15T00:00:00+00:00"));
    }

    #[test]
    fn test_error_details_non_json() {
        let details = ErrorDetails::parse("Bad Gateway");
        assert_eq!(details.message.as_deref(), Some("Bad Gateway"));
        assert_eq!(details.body, Some(serde_json::json!({"detail": "Bad Gateway"})));

        assert_eq!(ErrorDetails::parse("   "), ErrorDetails::default());
    }
}
