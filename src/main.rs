//! acis - command line access to the ACIS Trading API
//!
//! Thin wrapper over the library for trying the API from a terminal.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use acis_trading::config::load_config;
use acis_trading::{
    AcisClient, AcisError, HoldingInput, MarketCap, Portfolio, PortfolioRequest, RebalancePlan,
    RebalanceRequest, RiskTolerance, Strategy,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "acis.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// API key (overrides config and ACIS_API_KEY)
    #[arg(long, env = "ACIS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API base URL override
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check API status and version
    Health,
    /// Generate a portfolio
    Generate {
        /// Strategy name (value, growth, dividend, adaptive, value_largecap, ...)
        #[arg(short, long, default_value = "value")]
        strategy: String,
        /// Number of positions (5-50)
        #[arg(short, long, default_value_t = 20)]
        max_positions: u32,
        /// conservative, moderate or aggressive
        #[arg(short, long, default_value = "moderate")]
        risk: String,
        /// Investment amount used to compute share counts
        #[arg(short, long)]
        amount: Option<Decimal>,
        /// Rows to print
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Get rebalancing suggestions for holdings given as TICKER=WEIGHT[:SHARES]
    Rebalance {
        #[arg(short, long, default_value = "value")]
        strategy: String,
        /// large or small
        #[arg(long, default_value = "large")]
        market_cap: String,
        #[arg(short, long, default_value_t = 0.03)]
        threshold: f64,
        holdings: Vec<String>,
    },
    /// Show API usage for the current window
    Usage,
    /// List available risk levels
    RiskLevels,
    /// List portfolios subscribed to by the account
    Portfolios,
    /// Show daily history of an account portfolio
    History {
        strategy_id: String,
        #[arg(short, long, default_value_t = 30)]
        days: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let mut config = load_config(Some(args.config.as_str()))?;
    if let Some(key) = &args.api_key {
        config.acis.api_key = Some(key.clone());
    }
    if let Some(url) = &args.base_url {
        config.acis.base_url = url.clone();
    }

    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.settings.log_level.clone());
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Configuration: {:?}", config.acis);

    let client = AcisClient::from_config(&config.acis).context("failed to create ACIS client")?;

    match run(&client, args.command).await {
        Err(AcisError::RateLimit { reset_at, .. }) => {
            bail!(
                "rate limit exceeded, try again after {}",
                reset_at.as_deref().unwrap_or("the quota window resets")
            )
        }
        other => other.map_err(Into::into),
    }
}

async fn run(client: &AcisClient, command: Command) -> acis_trading::Result<()> {
    match command {
        Command::Health => {
            let health = client.health_check().await?;
            println!("API Status: {}", health.status);
            println!("API Version: {}", health.version.as_deref().unwrap_or("unknown"));
        }
        Command::Generate {
            strategy,
            max_positions,
            risk,
            amount,
            top,
        } => {
            let mut request = PortfolioRequest::new(strategy.parse::<Strategy>()?)
                .max_positions(max_positions)
                .risk_tolerance(risk.parse::<RiskTolerance>()?);
            if let Some(amount) = amount {
                request = request.investment_amount(amount);
            }
            let portfolio = client.generate_portfolio(&request).await?;
            print_portfolio(&portfolio, top);
        }
        Command::Rebalance {
            strategy,
            market_cap,
            threshold,
            holdings,
        } => {
            let holdings = holdings
                .iter()
                .map(|h| parse_holding(h))
                .collect::<acis_trading::Result<Vec<_>>>()?;
            let request = RebalanceRequest::new(strategy.parse()?, holdings)
                .market_cap(market_cap.parse::<MarketCap>()?)
                .rebalance_threshold(threshold);
            let plan = RebalancePlan::fetch(client, &request).await?;
            print_plan(&plan);
        }
        Command::Usage => {
            let usage = client.get_usage().await?;
            println!(
                "API Usage: {}/{} requests ({:.0}%)",
                usage.current_usage,
                usage.rate_limit,
                usage.utilization() * 100.0
            );
            println!("Remaining: {} requests", usage.remaining);
            println!("Resets at: {}", usage.reset_at);
        }
        Command::RiskLevels => {
            for level in client.get_risk_levels().await? {
                println!("{:<14} {}", level.name, level.description);
            }
        }
        Command::Portfolios => {
            for portfolio in client.get_my_portfolios().await? {
                println!("{:<20} {:>3} positions", portfolio.strategy, portfolio.position_count);
            }
        }
        Command::History { strategy_id, days } => {
            let history = client.get_portfolio_history(&strategy_id, days).await?;
            println!("{:<12} {:>14} {:>9}", "Date", "Value", "Return");
            for point in history {
                println!(
                    "{:<12} {:>14} {:>8.2}%",
                    point.date,
                    point.value,
                    point.daily_return.unwrap_or(0.0) * 100.0
                );
            }
        }
    }
    Ok(())
}

/// Parse `TICKER=WEIGHT` or `TICKER=WEIGHT:SHARES`
fn parse_holding(raw: &str) -> acis_trading::Result<HoldingInput> {
    let invalid = || {
        AcisError::invalid_field(
            "current_positions",
            format!("expected TICKER=WEIGHT[:SHARES], got '{}'", raw),
        )
    };

    let (ticker, rest) = raw.split_once('=').ok_or_else(invalid)?;
    let (weight, shares) = match rest.split_once(':') {
        Some((weight, shares)) => (weight, Some(shares)),
        None => (rest, None),
    };

    let mut holding = HoldingInput::new(
        ticker.trim().to_uppercase(),
        weight.trim().parse().map_err(|_| invalid())?,
    );
    if let Some(shares) = shares {
        holding = holding.with_shares(shares.trim().parse().map_err(|_| invalid())?);
    }
    Ok(holding)
}

fn print_portfolio(portfolio: &Portfolio, top: usize) {
    println!(
        "\nGenerated {} positions ({} strategy):\n",
        portfolio.len(),
        portfolio.strategy
    );
    println!("{:<8} {:>8} {:<22} {:>10}", "Ticker", "Weight", "Sector", "ML Score");
    println!("{}", "-".repeat(52));

    for position in portfolio.top(top) {
        println!(
            "{:<8} {:>7.1}% {:<22} {:>10.3}",
            position.ticker,
            position.weight * 100.0,
            position.sector.as_deref().unwrap_or("N/A"),
            position.ml_score.unwrap_or(0.0)
        );
    }

    if let Some(version) = &portfolio.model_version {
        println!("\nModel version: {}", version);
    }
}

fn print_plan(plan: &RebalancePlan) {
    if !plan.sells.is_empty() {
        println!("SELL Recommendations:");
        for s in &plan.sells {
            println!(
                "  {}: {:.1}% -> {:.1}%",
                s.ticker,
                s.current_weight * 100.0,
                s.target_weight * 100.0
            );
            if let Some(reason) = &s.reason {
                println!("    Reason: {}", reason);
            }
        }
    }

    if !plan.buys.is_empty() {
        println!("\nBUY Recommendations:");
        for s in &plan.buys {
            println!(
                "  {}: {:.1}% -> {:.1}%",
                s.ticker,
                s.current_weight * 100.0,
                s.target_weight * 100.0
            );
            if let Some(shares) = s.shares_to_trade {
                println!("    Shares to buy: {}", shares);
            }
        }
    }

    if !plan.holds.is_empty() {
        let tickers: Vec<&str> = plan.holds.iter().map(|s| s.ticker.as_str()).collect();
        println!("\nHOLD ({} positions): {}", tickers.len(), tickers.join(", "));
    }

    println!(
        "\nSummary: {} sells, {} buys, {} holds",
        plan.sells.len(),
        plan.buys.len(),
        plan.holds.len()
    );
}
