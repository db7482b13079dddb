pub mod models;
pub mod pricer;

pub use models::{BlackScholesTerms, ContractParameters, LatticeConfig, PriceResult};
pub use pricer::OptionPricer;
