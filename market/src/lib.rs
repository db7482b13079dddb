pub mod config;
pub mod contract;
pub mod error;
pub mod history;
pub mod providers;
pub mod rates;

pub use config::MarketConfig;
pub use contract::{ContractTerms, FixedTerms, PromptTerms};
pub use error::{MarketError, MarketResult};
pub use history::{Observation, PriceHistory, PriceSeries, VolatilityConvention};
pub use providers::{ContractTermsInput, MarketDataProvider, RiskFreeRateProvider};
pub use rates::FixedRateProvider;
