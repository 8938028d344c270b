//! Value objects returned by the ACIS Trading API

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::de;
use super::errors::{AcisError, Result};

/// Server-side portfolio construction policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Undervalued stocks with strong fundamentals
    Value,
    /// High-growth companies
    Growth,
    /// Income-focused dividend stocks
    Dividend,
    /// Market-regime aware
    Adaptive,
    ValueLargecap,
    ValueSmallcap,
    GrowthLargecap,
    GrowthSmallcap,
}

impl Strategy {
    /// Every strategy the API accepts
    pub const ALL: [Strategy; 8] = [
        Strategy::Value,
        Strategy::Growth,
        Strategy::Dividend,
        Strategy::Adaptive,
        Strategy::ValueLargecap,
        Strategy::ValueSmallcap,
        Strategy::GrowthLargecap,
        Strategy::GrowthSmallcap,
    ];

    /// Wire name of the strategy
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Value => "value",
            Strategy::Growth => "growth",
            Strategy::Dividend => "dividend",
            Strategy::Adaptive => "adaptive",
            Strategy::ValueLargecap => "value_largecap",
            Strategy::ValueSmallcap => "value_smallcap",
            Strategy::GrowthLargecap => "growth_largecap",
            Strategy::GrowthSmallcap => "growth_smallcap",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = AcisError;

    fn from_str(s: &str) -> Result<Self> {
        Strategy::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Strategy::ALL.iter().map(|s| s.as_str()).collect();
                AcisError::invalid_field(
                    "strategy",
                    format!("unknown strategy '{}', expected one of: {}", s, known.join(", ")),
                )
            })
    }
}

/// Risk profile applied to position sizing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

impl std::fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTolerance::Conservative => write!(f, "conservative"),
            RiskTolerance::Moderate => write!(f, "moderate"),
            RiskTolerance::Aggressive => write!(f, "aggressive"),
        }
    }
}

impl FromStr for RiskTolerance {
    type Err = AcisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "conservative" => Ok(RiskTolerance::Conservative),
            "moderate" => Ok(RiskTolerance::Moderate),
            "aggressive" => Ok(RiskTolerance::Aggressive),
            other => Err(AcisError::invalid_field(
                "risk_tolerance",
                format!("unknown risk tolerance '{}'", other),
            )),
        }
    }
}

/// Market cap focus for rebalancing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketCap {
    #[default]
    Large,
    Small,
}

impl std::fmt::Display for MarketCap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketCap::Large => write!(f, "large"),
            MarketCap::Small => write!(f, "small"),
        }
    }
}

impl FromStr for MarketCap {
    type Err = AcisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "large" => Ok(MarketCap::Large),
            "small" => Ok(MarketCap::Small),
            other => Err(AcisError::invalid_field(
                "market_cap",
                format!("unknown market cap '{}'", other),
            )),
        }
    }
}

/// A single position of a generated portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Stock symbol
    pub ticker: String,
    /// Fraction of the portfolio (0.0 to 1.0)
    pub weight: f64,
    /// Share count, only present when an investment amount was supplied
    #[serde(default, deserialize_with = "de::whole_number_opt")]
    pub shares: Option<i64>,
    /// Last price used for sizing
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub sector: Option<String>,
    /// Model confidence for this pick
    #[serde(default)]
    pub ml_score: Option<f64>,
}

/// A portfolio as returned by the generation and account endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub strategy: String,
    pub positions: Vec<Position>,
    #[serde(default, deserialize_with = "de::timestamp_opt")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub risk_tolerance: Option<RiskTolerance>,
    /// Total invested value, when an investment amount was supplied
    #[serde(default)]
    pub total_value: Option<Decimal>,
    /// Performance block, only on account portfolios
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<serde_json::Value>,
}

impl Portfolio {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sum of all position weights (expected to be close to 1.0)
    pub fn total_weight(&self) -> f64 {
        self.positions.iter().map(|p| p.weight).sum()
    }

    /// First `n` positions in server order
    pub fn top(&self, n: usize) -> &[Position] {
        &self.positions[..n.min(self.positions.len())]
    }

    /// Aggregate weight per sector; positions without a sector are grouped under "Unknown"
    pub fn by_sector(&self) -> BTreeMap<String, f64> {
        let mut sectors = BTreeMap::new();
        for position in &self.positions {
            let sector = position.sector.as_deref().unwrap_or("Unknown");
            *sectors.entry(sector.to_string()).or_insert(0.0) += position.weight;
        }
        sectors
    }
}

/// A holding supplied by the caller for rebalancing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingInput {
    pub ticker: String,
    /// Current portfolio weight (0.0 to 1.0)
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<i64>,
}

impl HoldingInput {
    pub fn new(ticker: impl Into<String>, weight: f64) -> Self {
        Self {
            ticker: ticker.into(),
            weight,
            shares: None,
        }
    }

    pub fn with_shares(mut self, shares: i64) -> Self {
        self.shares = Some(shares);
        self
    }
}

/// Recommended action for a holding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebalanceAction {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for RebalanceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RebalanceAction::Buy => write!(f, "BUY"),
            RebalanceAction::Sell => write!(f, "SELL"),
            RebalanceAction::Hold => write!(f, "HOLD"),
        }
    }
}

/// A single rebalancing suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceSuggestion {
    pub ticker: String,
    pub action: RebalanceAction,
    pub current_weight: f64,
    pub target_weight: f64,
    #[serde(default)]
    pub weight_change: Option<f64>,
    #[serde(default, deserialize_with = "de::whole_number_opt")]
    pub shares_to_trade: Option<i64>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl RebalanceSuggestion {
    /// Weight change reported by the server, or target minus current
    pub fn weight_delta(&self) -> f64 {
        self.weight_change
            .unwrap_or(self.target_weight - self.current_weight)
    }
}

/// Suggestions grouped by action, server order preserved within each group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RebalancePlan {
    pub buys: Vec<RebalanceSuggestion>,
    pub sells: Vec<RebalanceSuggestion>,
    pub holds: Vec<RebalanceSuggestion>,
}

impl RebalancePlan {
    pub fn from_suggestions(suggestions: Vec<RebalanceSuggestion>) -> Self {
        let mut plan = Self::default();
        for suggestion in suggestions {
            match suggestion.action {
                RebalanceAction::Buy => plan.buys.push(suggestion),
                RebalanceAction::Sell => plan.sells.push(suggestion),
                RebalanceAction::Hold => plan.holds.push(suggestion),
            }
        }
        plan
    }

    /// Number of suggestions that require a trade
    pub fn trade_count(&self) -> usize {
        self.buys.len() + self.sells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buys.is_empty() && self.sells.is_empty() && self.holds.is_empty()
    }
}

/// API usage for the current quota window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageInfo {
    /// Requests made in the current window
    pub current_usage: u64,
    /// Request limit for the account tier
    pub rate_limit: u64,
    pub remaining: u64,
    #[serde(deserialize_with = "de::timestamp")]
    pub reset_at: DateTime<Utc>,
}

impl UsageInfo {
    /// Fraction of the quota already consumed
    pub fn utilization(&self) -> f64 {
        if self.rate_limit == 0 {
            return 1.0;
        }
        self.current_usage as f64 / self.rate_limit as f64
    }
}

/// API availability status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok") || self.status.eq_ignore_ascii_case("healthy")
    }
}

/// A risk profile configuration offered by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLevel {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Profile parameters (volatility caps, position limits, ...)
    #[serde(flatten)]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

/// Summary of a portfolio subscribed to by the account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountPortfolio {
    pub strategy: String,
    #[serde(default)]
    pub position_count: u32,
    #[serde(default, deserialize_with = "de::timestamp_opt")]
    pub last_rebalanced: Option<DateTime<Utc>>,
}

/// One day of portfolio history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub value: Decimal,
    #[serde(default)]
    pub daily_return: Option<f64>,
    #[serde(default)]
    pub cumulative_return: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position(ticker: &str, weight: f64, sector: Option<&str>) -> Position {
        Position {
            ticker: ticker.to_string(),
            weight,
            shares: None,
            price: None,
            sector: sector.map(|s| s.to_string()),
            ml_score: None,
        }
    }

    #[test]
    fn test_strategy_parse_all_known() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.as_str().parse::<Strategy>().unwrap(), strategy);
        }
    }

    #[test]
    fn test_strategy_parse_rejects_unknown() {
        for name in ["momentum", "Value", "", "value ", "growth-largecap"] {
            let err = name.parse::<Strategy>().unwrap_err();
            match err {
                AcisError::Validation {
                    field, status_code, ..
                } => {
                    assert_eq!(field.as_deref(), Some("strategy"));
                    assert_eq!(status_code, None);
                }
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_strategy_serde_matches_display() {
        for strategy in Strategy::ALL {
            let json = serde_json::to_string(&strategy).unwrap();
            assert_eq!(json, format!("\"{}\"", strategy));
        }
    }

    #[test]
    fn test_enum_defaults() {
        assert_eq!(RiskTolerance::default(), RiskTolerance::Moderate);
        assert_eq!(MarketCap::default(), MarketCap::Large);
        assert!("reckless".parse::<RiskTolerance>().is_err());
        assert_eq!("small".parse::<MarketCap>().unwrap(), MarketCap::Small);
    }

    #[test]
    fn test_position_minimal_fields() {
        let json = r#"{"ticker": "AAPL", "weight": 0.05}"#;
        let pos: Position = serde_json::from_str(json).unwrap();
        assert_eq!(pos.ticker, "AAPL");
        assert_eq!(pos.shares, None);
        assert_eq!(pos.price, None);
    }

    #[test]
    fn test_position_shares_as_whole_float() {
        let json = r#"{"ticker": "JPM", "weight": 0.25, "shares": 13.0}"#;
        let pos: Position = serde_json::from_str(json).unwrap();
        assert_eq!(pos.shares, Some(13));

        let fractional = r#"{"ticker": "JPM", "weight": 0.25, "shares": 13.4}"#;
        assert!(serde_json::from_str::<Position>(fractional).is_err());
    }

    #[test]
    fn test_naive_timestamps_read_as_utc() {
        let usage: UsageInfo = serde_json::from_str(
            r#"{"current_usage": 1, "rate_limit": 100, "remaining": 99, "reset_at": "2024-03-16T00:00:00"}"#,
        )
        .unwrap();
        assert_eq!(usage.reset_at.to_rfc3339(), "2024-03-16T00:00:00+00:00");

        let account: AccountPortfolio = serde_json::from_str(
            r#"{"strategy": "value_strategy", "position_count": 20, "last_rebalanced": "2024-03-01T09:15:00"}"#,
        )
        .unwrap();
        assert!(account.last_rebalanced.is_some());
    }

    #[test]
    fn test_position_price_as_decimal() {
        let json = r#"{"ticker": "MSFT", "weight": 0.1, "price": 412.5, "shares": 12}"#;
        let pos: Position = serde_json::from_str(json).unwrap();
        assert_eq!(pos.price, Some(dec!(412.5)));
        assert_eq!(pos.shares, Some(12));
    }

    #[test]
    fn test_portfolio_aggregates() {
        let portfolio = Portfolio {
            strategy: "value".to_string(),
            positions: vec![
                position("JPM", 0.5, Some("Financials")),
                position("BAC", 0.25, Some("Financials")),
                position("XOM", 0.25, None),
            ],
            generated_at: None,
            model_version: None,
            risk_tolerance: None,
            total_value: None,
            performance: None,
        };

        assert_eq!(portfolio.total_weight(), 1.0);
        assert_eq!(portfolio.top(2).len(), 2);
        assert_eq!(portfolio.top(10).len(), 3);

        let sectors = portfolio.by_sector();
        assert_eq!(sectors["Financials"], 0.75);
        assert_eq!(sectors["Unknown"], 0.25);
    }

    #[test]
    fn test_rebalance_plan_grouping() {
        let json = r#"[
            {"ticker": "NVDA", "action": "sell", "current_weight": 0.20, "target_weight": 0.10},
            {"ticker": "JPM", "action": "buy", "current_weight": 0.05, "target_weight": 0.08, "shares_to_trade": 12},
            {"ticker": "AAPL", "action": "hold", "current_weight": 0.15, "target_weight": 0.14},
            {"ticker": "V", "action": "buy", "current_weight": 0.05, "target_weight": 0.09}
        ]"#;
        let suggestions: Vec<RebalanceSuggestion> = serde_json::from_str(json).unwrap();
        let plan = RebalancePlan::from_suggestions(suggestions);

        assert_eq!(plan.sells.len(), 1);
        assert_eq!(plan.holds.len(), 1);
        assert_eq!(
            plan.buys.iter().map(|s| s.ticker.as_str()).collect::<Vec<_>>(),
            vec!["JPM", "V"]
        );
        assert_eq!(plan.trade_count(), 3);
    }

    #[test]
    fn test_weight_delta_prefers_server_value() {
        let mut suggestion = RebalanceSuggestion {
            ticker: "NVDA".to_string(),
            action: RebalanceAction::Sell,
            current_weight: 0.25,
            target_weight: 0.125,
            weight_change: None,
            shares_to_trade: None,
            reason: None,
        };
        assert_eq!(suggestion.weight_delta(), -0.125);

        suggestion.weight_change = Some(-0.1);
        assert_eq!(suggestion.weight_delta(), -0.1);
    }

    #[test]
    fn test_holding_input_omits_missing_shares() {
        let json = serde_json::to_value(HoldingInput::new("AAPL", 0.15)).unwrap();
        assert!(json.get("shares").is_none());

        let json = serde_json::to_value(HoldingInput::new("AAPL", 0.15).with_shares(100)).unwrap();
        assert_eq!(json["shares"], 100);
    }

    #[test]
    fn test_usage_utilization() {
        let usage: UsageInfo = serde_json::from_str(
            r#"{"current_usage": 25, "rate_limit": 100, "remaining": 75, "reset_at": "2024-06-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(usage.utilization(), 0.25);
    }

    #[test]
    fn test_health_status() {
        let health: HealthStatus = serde_json::from_str(r#"{"status": "OK", "version": "2.1.0"}"#).unwrap();
        assert!(health.is_healthy());

        let degraded: HealthStatus = serde_json::from_str(r#"{"status": "degraded"}"#).unwrap();
        assert!(!degraded.is_healthy());
    }

    #[test]
    fn test_risk_level_keeps_parameters() {
        let level: RiskLevel = serde_json::from_str(
            r#"{"name": "conservative", "description": "Low volatility", "max_position_weight": 0.05}"#,
        )
        .unwrap();
        assert_eq!(level.name, "conservative");
        assert_eq!(level.parameters["max_position_weight"], 0.05);
    }
}
