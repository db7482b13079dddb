use std::io;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use market::{
    ContractTerms, ContractTermsInput, FixedRateProvider, FixedTerms, MarketConfig, PriceHistory,
    PromptTerms, VolatilityConvention,
};

mod quote;

use quote::{gather_parameters, Quote};

/// European option quote, closed form and binomial lattice
#[derive(Parser, Debug)]
#[command(name = "quote")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Ticker symbol of the underlying
    #[arg(short, long)]
    ticker: String,

    /// CSV file with `date,adj_close` rows for the ticker
    #[arg(short, long)]
    prices: PathBuf,

    /// Strike price (prompted for when absent)
    #[arg(short, long, requires = "expiry")]
    strike: Option<f64>,

    /// Expiry date, YYYY-MM-DD (prompted for when absent)
    #[arg(short, long, requires = "strike")]
    expiry: Option<NaiveDate>,

    /// Risk-free rate in percent, overrides RISK_FREE_RATE_PCT
    #[arg(long)]
    rate_pct: Option<f64>,

    /// Number of lattice intervals, overrides LATTICE_INTERVALS
    #[arg(short = 'n', long)]
    intervals: Option<usize>,

    /// Volatility lookback in calendar days, overrides VOL_LOOKBACK_DAYS
    #[arg(long)]
    lookback_days: Option<u32>,

    /// Scale the daily return volatility by sqrt(252)
    #[arg(long)]
    annualize: bool,

    /// Sum the lattice nodes on all cores regardless of size
    #[arg(long)]
    parallel: bool,

    /// Enable debug logging when RUST_LOG is unset
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = MarketConfig::from_env().context("loading configuration")?;
    debug!(?config, "configuration");

    run(cli, config)
}

fn run(cli: Cli, config: MarketConfig) -> anyhow::Result<()> {
    let convention = if cli.annualize {
        VolatilityConvention::Annualized
    } else {
        config.vol_convention
    };
    let mut history = PriceHistory::new(convention);
    history.load_csv(&cli.ticker, &cli.prices)?;

    let rates = FixedRateProvider::from_percent(cli.rate_pct.unwrap_or(config.risk_free_rate_pct));
    let lookback_days = cli.lookback_days.unwrap_or(config.vol_lookback_days);
    let nr_intervals = cli.intervals.unwrap_or(config.lattice_intervals);

    let mut terms: Box<dyn ContractTermsInput> = match (cli.strike, cli.expiry) {
        (Some(strike), Some(expiry)) => Box::new(FixedTerms(ContractTerms::new(strike, expiry)?)),
        _ => Box::new(PromptTerms::new(io::stdin().lock(), io::stdout())),
    };

    let today = chrono::Local::now().date_naive();
    let params = gather_parameters(
        &cli.ticker,
        lookback_days,
        &history,
        &rates,
        terms.as_mut(),
        today,
    )?;

    let quote = Quote::price(&params, nr_intervals, cli.parallel)
        .with_context(|| format!("pricing {} options", cli.ticker))?;
    info!(ticker = %cli.ticker, "quote complete");
    println!("{quote}");
    Ok(())
}
