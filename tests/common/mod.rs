//! Common test utilities and fixtures

#![allow(dead_code)]

use acis_trading::AcisClient;
use std::time::Duration;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "acis_test_0123456789";

/// Create a client pointed at the mock server
pub fn client_for(server: &MockServer) -> AcisClient {
    AcisClient::builder(TEST_API_KEY)
        .base_url(server.uri())
        .timeout(Duration::from_secs(5))
        .build()
        .expect("Failed to create ACIS client")
}

/// Sample API responses for testing
pub mod api_responses {
    /// Generated value portfolio with share counts
    pub const PORTFOLIO: &str = r#"{
        "strategy": "value",
        "generated_at": "2024-03-15T14:30:00Z",
        "model_version": "lgbm-2024.03.1",
        "risk_tolerance": "moderate",
        "total_value": 10000,
        "positions": [
            {"ticker": "JPM", "weight": 0.25, "shares": 13, "price": 187.25, "sector": "Financials", "ml_score": 0.912},
            {"ticker": "XOM", "weight": 0.125, "shares": 11, "price": 112.5, "sector": "Energy", "ml_score": 0.874},
            {"ticker": "CVS", "weight": 0.0625, "sector": "Health Care", "ml_score": 0.81},
            {"ticker": "INTC", "weight": 0.5625}
        ]
    }"#;

    /// Python-style server output: naive timestamp, float share counts
    pub const PORTFOLIO_NAIVE: &str = r#"{
        "strategy": "value",
        "generated_at": "2024-03-15T14:30:00.123456",
        "model_version": "lgbm-2024.03.1",
        "positions": [
            {"ticker": "JPM", "weight": 0.5, "shares": 13.0, "price": 187.25},
            {"ticker": "XOM", "weight": 0.5, "shares": 11, "price": 112.5}
        ]
    }"#;

    pub const REBALANCE: &str = r#"{
        "suggestions": [
            {"ticker": "NVDA", "action": "sell", "current_weight": 0.20, "target_weight": 0.08, "weight_change": -0.12, "reason": "Overweight vs target"},
            {"ticker": "JPM", "action": "buy", "current_weight": 0.05, "target_weight": 0.09, "weight_change": 0.04, "shares_to_trade": 12},
            {"ticker": "AAPL", "action": "hold", "current_weight": 0.15, "target_weight": 0.14, "weight_change": -0.01}
        ]
    }"#;

    pub const USAGE: &str = r#"{
        "current_usage": 42,
        "rate_limit": 100,
        "remaining": 58,
        "reset_at": "2024-03-16T00:00:00Z"
    }"#;

    pub const USAGE_NAIVE: &str = r#"{
        "current_usage": 42,
        "rate_limit": 100,
        "remaining": 58,
        "reset_at": "2024-03-16T00:00:00"
    }"#;

    pub const HEALTH: &str = r#"{"status": "ok", "version": "1.4.2"}"#;

    pub const RISK_LEVELS: &str = r#"[
        {"name": "conservative", "description": "Low volatility, capital preservation", "max_position_weight": 0.05},
        {"name": "moderate", "description": "Balanced risk and return", "max_position_weight": 0.08},
        {"name": "aggressive", "description": "Concentrated high-conviction picks", "max_position_weight": 0.15}
    ]"#;

    pub const MY_PORTFOLIOS: &str = r#"[
        {"strategy": "value_strategy", "position_count": 20, "last_rebalanced": "2024-03-01T00:00:00Z"},
        {"strategy": "dividend_strategy", "position_count": 25}
    ]"#;

    pub const HISTORY: &str = r#"[
        {"date": "2024-03-13", "value": 10000.00, "daily_return": 0.0, "cumulative_return": 0.0},
        {"date": "2024-03-14", "value": 10125.50, "daily_return": 0.01255, "cumulative_return": 0.01255}
    ]"#;

    pub const RATE_LIMITED: &str = r#"{
        "detail": "Daily rate limit exceeded",
        "reset_at": "2024-03-16T00:00:00+00:00"
    }"#;

    pub const UNPROCESSABLE: &str = r#"{
        "detail": [
            {"loc": ["body", "current_positions", 0, "weight"], "msg": "ensure this value is greater than or equal to 0", "type": "value_error"}
        ]
    }"#;
}
