use crate::error::{MarketError, MarketResult};
use crate::history::VolatilityConvention;

pub const DEFAULT_RATE_PCT: f64 = 5.0;
/// Five years of history.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 5 * 365;
pub const DEFAULT_LATTICE_INTERVALS: usize = 100;

/// Settings of the market input layer, read from the environment (and a `.env` file).
#[derive(Clone, Debug, PartialEq)]
pub struct MarketConfig {
    /// `RISK_FREE_RATE_PCT`
    pub risk_free_rate_pct: f64,
    /// `VOL_LOOKBACK_DAYS`
    pub vol_lookback_days: u32,
    /// `VOL_CONVENTION`, daily or annualized
    pub vol_convention: VolatilityConvention,
    /// `LATTICE_INTERVALS`, default size of the binomial lattice for quotes
    pub lattice_intervals: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            risk_free_rate_pct: DEFAULT_RATE_PCT,
            vol_lookback_days: DEFAULT_LOOKBACK_DAYS,
            vol_convention: VolatilityConvention::Daily,
            lattice_intervals: DEFAULT_LATTICE_INTERVALS,
        }
    }
}

impl MarketConfig {
    pub fn from_env() -> MarketResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key-value source; missing keys fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> MarketResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            risk_free_rate_pct: parse_or(&lookup, "RISK_FREE_RATE_PCT", defaults.risk_free_rate_pct)?,
            vol_lookback_days: parse_or(&lookup, "VOL_LOOKBACK_DAYS", defaults.vol_lookback_days)?,
            vol_convention: parse_or(&lookup, "VOL_CONVENTION", defaults.vol_convention)?,
            lattice_intervals: parse_or(&lookup, "LATTICE_INTERVALS", defaults.lattice_intervals)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> MarketResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| MarketError::Config(format!("{key}: {e}"))),
        None => Ok(default),
    }
}
