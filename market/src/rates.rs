use crate::error::{MarketError, MarketResult};
use crate::providers::RiskFreeRateProvider;

/// A rate quoted in percent (e.g. an overnight reference rate), handed out as a decimal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedRateProvider {
    rate_pct: f64,
}

impl FixedRateProvider {
    pub fn from_percent(rate_pct: f64) -> Self {
        Self { rate_pct }
    }
}

impl RiskFreeRateProvider for FixedRateProvider {
    fn rate(&self) -> MarketResult<f64> {
        if !self.rate_pct.is_finite() {
            return Err(MarketError::InvalidInput(format!(
                "risk-free rate must be finite, got {}%",
                self.rate_pct
            )));
        }
        let rate = self.rate_pct / 100.0;
        tracing::debug!(rate_pct = self.rate_pct, rate, "risk-free rate");
        Ok(rate)
    }
}
