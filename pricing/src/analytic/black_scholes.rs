use crate::analytic::normal::norm_cdf;
use crate::common::models::{BlackScholesTerms, ContractParameters, PriceResult};
use crate::common::pricer::OptionPricer;
use crate::error::PricingError;

/// d1 and d2 of the Black-Scholes formula.
/// '''math
/// d1 = (ln(S/K) + (r + sigma^2/2) T) / (sigma sqrt(T)),   d2 = d1 - sigma sqrt(T)
/// '''
pub fn black_scholes_terms(dp: &ContractParameters) -> Result<BlackScholesTerms, PricingError> {
    dp.validate()?;
    let sigma_exp = dp.vola * dp.time_to_expiration.sqrt();
    let d1 = ((dp.spot / dp.strike).ln() + (dp.rfr + dp.vola.powi(2) / 2.0) * dp.time_to_expiration)
        / sigma_exp;
    let d2 = d1 - sigma_exp;
    Ok(BlackScholesTerms { d1, d2 })
}

/// European Put and Call option prices for stocks.
/// https://en.wikipedia.org/wiki/Black-Scholes_model
#[derive(Clone, Copy, Debug, Default)]
pub struct BlackScholesMerton;

impl OptionPricer for BlackScholesMerton {
    fn price(&self, dp: &ContractParameters) -> Result<PriceResult, PricingError> {
        let BlackScholesTerms { d1, d2 } = black_scholes_terms(dp)?;
        let disc_strike = dp.strike * dp.discount_factor();

        let call = dp.spot * norm_cdf(d1) - disc_strike * norm_cdf(d2);
        let put = disc_strike * norm_cdf(-d2) - dp.spot * norm_cdf(-d1);
        Ok(PriceResult::new(call, put))
    }
}
