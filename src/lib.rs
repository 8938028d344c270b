//! ACIS Trading client library
//!
//! A Rust client for the ACIS Trading API: AI-generated stock portfolios,
//! rebalancing suggestions and account usage. Portfolio construction runs
//! server-side; this crate issues authenticated requests, validates inputs
//! locally and maps responses to typed values and errors.

pub mod acis;
pub mod common;
pub mod config;

// Re-export commonly used types
pub use acis::auth::ApiKey;
pub use acis::client::{AcisClient, AcisClientBuilder};
pub use acis::messages::{PortfolioRequest, RebalanceRequest};
pub use acis::rest::AcisRestClient;
pub use common::errors::{AcisError, Result};
pub use common::traits::PortfolioProvider;
pub use common::types::{
    AccountPortfolio, HealthStatus, HistoryPoint, HoldingInput, MarketCap, Portfolio, Position,
    RebalanceAction, RebalancePlan, RebalanceSuggestion, RiskLevel, RiskTolerance, Strategy,
    UsageInfo,
};
pub use config::types::{AcisConfig, AppConfig};
