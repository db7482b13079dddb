use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid lattice configuration: {0}")]
    InvalidLatticeConfig(String),
}
