use std::fmt;

use anyhow::Context;
use chrono::NaiveDate;
use tracing::info;

use market::{ContractTermsInput, MarketDataProvider, RiskFreeRateProvider};
use pricing::{
    BlackScholesMerton, ContractParameters, CoxRossRubinstein, OptionPricer, PriceResult,
    PricingError,
};

/// Collects spot, volatility, rate and contract terms into pricer inputs.
pub fn gather_parameters<T: ContractTermsInput + ?Sized>(
    ticker: &str,
    lookback_days: u32,
    market: &impl MarketDataProvider,
    rates: &impl RiskFreeRateProvider,
    terms: &mut T,
    today: NaiveDate,
) -> anyhow::Result<ContractParameters> {
    let terms = terms.collect().context("collecting contract terms")?;
    let spot = market
        .spot_price(ticker)
        .with_context(|| format!("spot price of {ticker}"))?;
    let vola = market
        .historical_volatility(ticker, lookback_days)
        .with_context(|| format!("historical volatility of {ticker}"))?;
    let rfr = rates.rate().context("risk-free rate")?;
    let time_to_expiration = terms.time_to_expiration(today);

    info!(
        ticker,
        spot,
        strike = terms.strike,
        expiry = %terms.expiry,
        time_to_expiration,
        vola,
        rfr,
        "market inputs"
    );
    Ok(ContractParameters::new(
        spot,
        terms.strike,
        time_to_expiration,
        rfr,
        vola,
    ))
}

/// Both valuations of one contract.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quote {
    pub analytic: PriceResult,
    pub lattice: PriceResult,
    pub nr_intervals: usize,
}

impl Quote {
    pub fn price(
        params: &ContractParameters,
        nr_intervals: usize,
        parallel: bool,
    ) -> Result<Self, PricingError> {
        let analytic = BlackScholesMerton.price(params)?;
        let crr = CoxRossRubinstein::new(nr_intervals);
        let lattice = if parallel {
            crr.price_parallel(params)?
        } else {
            crr.price(params)?
        };
        info!(
            nr_intervals,
            call_gap = lattice.call - analytic.call,
            put_gap = lattice.put - analytic.put,
            "lattice against closed form"
        );
        Ok(Self {
            analytic,
            lattice,
            nr_intervals,
        })
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Call price: {:.2}", self.analytic.call)?;
        writeln!(f, "Put price: {:.2}", self.analytic.put)?;
        writeln!(
            f,
            "Binomial call price ({} intervals): {:.2}",
            self.nr_intervals, self.lattice.call
        )?;
        write!(
            f,
            "Binomial put price ({} intervals): {:.2}",
            self.nr_intervals, self.lattice.put
        )
    }
}
