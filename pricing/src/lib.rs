pub mod analytic;
pub mod common;
pub mod error;
pub mod lattice;

pub use analytic::{black_scholes_terms, norm_cdf, BlackScholesMerton};
pub use common::{BlackScholesTerms, ContractParameters, LatticeConfig, OptionPricer, PriceResult};
pub use error::PricingError;
pub use lattice::CoxRossRubinstein;

/// Call and put values from the Black-Scholes formula.
pub fn price_analytical(params: &ContractParameters) -> Result<PriceResult, PricingError> {
    BlackScholesMerton.price(params)
}

/// Call and put values from an `nr_intervals`-step CRR binomial lattice.
pub fn price_lattice(
    params: &ContractParameters,
    nr_intervals: usize,
) -> Result<PriceResult, PricingError> {
    CoxRossRubinstein::new(nr_intervals).price(params)
}
