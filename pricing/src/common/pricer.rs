use crate::common::models::{ContractParameters, PriceResult};
use crate::error::PricingError;

/// A method that values the European call and put of one contract.
pub trait OptionPricer {
    fn price(&self, params: &ContractParameters) -> Result<PriceResult, PricingError>;

    fn call(&self, params: &ContractParameters) -> Result<f64, PricingError> {
        self.price(params).map(|res| res.call)
    }

    fn put(&self, params: &ContractParameters) -> Result<f64, PricingError> {
        self.price(params).map(|res| res.put)
    }
}
