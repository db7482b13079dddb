pub mod black_scholes;
pub mod normal;

pub use black_scholes::{black_scholes_terms, BlackScholesMerton};
pub use normal::norm_cdf;
