use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::Deserialize;

use crate::error::{MarketError, MarketResult};
use crate::providers::MarketDataProvider;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// One row of a price file: `date,adj_close`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub adj_close: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, adj_close: f64) -> Self {
        Self { date, adj_close }
    }
}

/// Scaling of the standard deviation of daily returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VolatilityConvention {
    /// The raw standard deviation of daily returns.
    #[default]
    Daily,
    /// Daily figure times sqrt(252), comparable with an annualized option volatility.
    Annualized,
}

impl VolatilityConvention {
    pub fn scale(&self, daily_std: f64) -> f64 {
        match self {
            VolatilityConvention::Daily => daily_std,
            VolatilityConvention::Annualized => daily_std * TRADING_DAYS_PER_YEAR.sqrt(),
        }
    }
}

impl FromStr for VolatilityConvention {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(VolatilityConvention::Daily),
            "annualized" | "annualised" => Ok(VolatilityConvention::Annualized),
            other => Err(MarketError::Parse(format!(
                "unknown volatility convention '{other}', expected daily or annualized"
            ))),
        }
    }
}

impl fmt::Display for VolatilityConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolatilityConvention::Daily => write!(f, "daily"),
            VolatilityConvention::Annualized => write!(f, "annualized"),
        }
    }
}

/// Adjusted closes of one ticker, ordered by date.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceSeries {
    observations: Vec<Observation>,
}

impl PriceSeries {
    pub fn new(mut observations: Vec<Observation>) -> MarketResult<Self> {
        if let Some(bad) = observations
            .iter()
            .find(|obs| !(obs.adj_close.is_finite() && obs.adj_close > 0.0))
        {
            return Err(MarketError::InvalidInput(format!(
                "adjusted close on {} must be positive, got {}",
                bad.date, bad.adj_close
            )));
        }
        observations.sort_by_key(|obs| obs.date);
        Ok(Self { observations })
    }

    pub fn from_csv<R: Read>(reader: R) -> MarketResult<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let observations = csv_reader
            .deserialize()
            .collect::<Result<Vec<Observation>, csv::Error>>()?;
        Self::new(observations)
    }

    pub fn from_path(path: impl AsRef<Path>) -> MarketResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv(file)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn latest(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Observations dated within `lookback_days` of the latest one, both ends included.
    pub fn window(&self, lookback_days: u32) -> &[Observation] {
        let Some(latest) = self.latest() else {
            return &[];
        };
        let first = latest
            .date
            .checked_sub_days(Days::new(lookback_days.into()))
            .unwrap_or(NaiveDate::MIN);
        let start = self.observations.partition_point(|obs| obs.date < first);
        &self.observations[start..]
    }

    /// Simple returns close_t / close_{t-1} - 1 inside the window.
    pub fn simple_returns(&self, lookback_days: u32) -> Vec<f64> {
        self.window(lookback_days)
            .windows(2)
            .map(|pair| pair[1].adj_close / pair[0].adj_close - 1.0)
            .collect()
    }
}

/// Population standard deviation (divides by n, not n - 1).
pub fn population_std(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().fold(0.0, |acc, x| acc + (x - mean).powi(2)) / n;
    Some(variance.sqrt())
}

/// In-memory price histories keyed by ticker.
#[derive(Clone, Debug, Default)]
pub struct PriceHistory {
    series: HashMap<String, PriceSeries>,
    convention: VolatilityConvention,
}

impl PriceHistory {
    pub fn new(convention: VolatilityConvention) -> Self {
        Self {
            series: HashMap::new(),
            convention,
        }
    }

    pub fn convention(&self) -> VolatilityConvention {
        self.convention
    }

    pub fn insert(&mut self, ticker: impl Into<String>, series: PriceSeries) {
        self.series.insert(ticker.into(), series);
    }

    pub fn load_csv(&mut self, ticker: &str, path: impl AsRef<Path>) -> MarketResult<()> {
        let path = path.as_ref();
        let series = PriceSeries::from_path(path)?;
        tracing::info!(
            ticker,
            path = %path.display(),
            observations = series.len(),
            "loaded price history"
        );
        self.insert(ticker, series);
        Ok(())
    }

    fn series(&self, ticker: &str) -> MarketResult<&PriceSeries> {
        self.series
            .get(ticker)
            .ok_or_else(|| MarketError::UnknownTicker(ticker.to_string()))
    }
}

impl MarketDataProvider for PriceHistory {
    fn spot_price(&self, ticker: &str) -> MarketResult<f64> {
        let latest = self.series(ticker)?.latest().ok_or_else(|| {
            MarketError::InsufficientData(format!("no observations for {ticker}"))
        })?;
        tracing::debug!(ticker, date = %latest.date, spot = latest.adj_close, "spot price");
        Ok(latest.adj_close)
    }

    fn historical_volatility(&self, ticker: &str, lookback_days: u32) -> MarketResult<f64> {
        let returns = self.series(ticker)?.simple_returns(lookback_days);
        if returns.len() < 2 {
            return Err(MarketError::InsufficientData(format!(
                "{} returns for {ticker} within {lookback_days} days, need at least 2",
                returns.len()
            )));
        }
        let daily_std = population_std(&returns).unwrap_or_default();
        let vola = self.convention.scale(daily_std);
        tracing::debug!(
            ticker,
            lookback_days,
            nr_returns = returns.len(),
            convention = %self.convention,
            vola,
            "historical volatility"
        );
        Ok(vola)
    }
}
