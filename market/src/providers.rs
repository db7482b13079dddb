use crate::contract::ContractTerms;
use crate::error::MarketResult;

/// Source of spot prices and volatility. Callers collect from it and hand plain numbers
/// to the pricers.
pub trait MarketDataProvider {
    /// Most recent adjusted close of the ticker.
    fn spot_price(&self, ticker: &str) -> MarketResult<f64>;

    /// Standard deviation of the ticker's daily returns over the lookback window,
    /// scaled according to the provider's [`crate::history::VolatilityConvention`].
    fn historical_volatility(&self, ticker: &str, lookback_days: u32) -> MarketResult<f64>;
}

pub trait RiskFreeRateProvider {
    /// Decimal rate, e.g. 0.05 for 5%.
    fn rate(&self) -> MarketResult<f64>;
}

pub trait ContractTermsInput {
    fn collect(&mut self) -> MarketResult<ContractTerms>;
}
