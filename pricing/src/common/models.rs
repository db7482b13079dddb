use crate::error::PricingError;

/// Market and contract inputs of a vanilla European option.
/// Treated as an immutable value: the fields are public for construction and reading,
/// the pricers only ever borrow it and `validate` runs on every pricing call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContractParameters {
    /// the underlying's price at time t
    pub spot: f64,
    /// the strike or exercise price of the option
    pub strike: f64,
    /// (T - t) in years, where T is the time of the option's expiration and t is the current time
    pub time_to_expiration: f64,
    /// the annualized (continuously compounded) risk-free interest rate
    pub rfr: f64,
    /// the annualized standard deviation of the underlying's returns
    pub vola: f64,
}

impl ContractParameters {
    pub fn new(spot: f64, strike: f64, time_to_expiration: f64, rfr: f64, vola: f64) -> Self {
        Self {
            spot,
            strike,
            time_to_expiration,
            rfr,
            vola,
        }
    }

    /// Checks the preconditions shared by both pricers.
    pub fn validate(&self) -> Result<(), PricingError> {
        let fields = [
            ("spot", self.spot),
            ("strike", self.strike),
            ("time to expiration", self.time_to_expiration),
            ("risk-free rate", self.rfr),
            ("volatility", self.vola),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(PricingError::InvalidInput(format!(
                "{name} must be finite, got {value}"
            )));
        }
        if self.spot <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "spot must be positive, got {}",
                self.spot
            )));
        }
        if self.strike <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "strike must be positive, got {}",
                self.strike
            )));
        }
        if self.vola <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "volatility must be positive, got {}",
                self.vola
            )));
        }
        if self.time_to_expiration <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "time to expiration must be positive, got {}",
                self.time_to_expiration
            )));
        }
        Ok(())
    }

    /// exp(-r * T)
    pub fn discount_factor(&self) -> f64 {
        (-self.rfr * self.time_to_expiration).exp()
    }

    /// Right hand side of the put-call parity, S - K * exp(-r * T).
    pub fn forward_intrinsic(&self) -> f64 {
        self.spot - self.strike * self.discount_factor()
    }
}

/// The standardized moneyness terms of the Black-Scholes formula.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlackScholesTerms {
    pub d1: f64,
    pub d2: f64,
}

/// Discretization of the binomial lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LatticeConfig {
    pub nr_intervals: usize,
}

impl LatticeConfig {
    pub const DEFAULT_INTERVALS: usize = 100;

    pub fn new(nr_intervals: usize) -> Self {
        Self { nr_intervals }
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        if self.nr_intervals < 1 {
            return Err(PricingError::InvalidLatticeConfig(format!(
                "number of intervals must be at least 1, got {}",
                self.nr_intervals
            )));
        }
        Ok(())
    }
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVALS)
    }
}

/// Call and put value of the same contract.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceResult {
    pub call: f64,
    pub put: f64,
}

impl PriceResult {
    pub fn new(call: f64, put: f64) -> Self {
        Self { call, put }
    }

    /// Deviation from put-call parity, C - P - (S - K * exp(-r * T)).
    pub fn parity_gap(&self, params: &ContractParameters) -> f64 {
        self.call - self.put - params.forward_intrinsic()
    }

    pub fn is_finite(&self) -> bool {
        self.call.is_finite() && self.put.is_finite()
    }
}
