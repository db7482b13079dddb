use rayon::prelude::*;

use crate::common::models::{ContractParameters, LatticeConfig, PriceResult};
use crate::common::pricer::OptionPricer;
use crate::error::PricingError;
use crate::lattice::weights::NodeWeights;

/// Above this many intervals `price` sums the terminal nodes on the rayon pool.
pub const PARALLEL_THRESHOLD: usize = 10_000;

/// Terminal nodes handled by one parallel task.
const CHUNK_SIZE: usize = 2_048;

/// European Put and Call option prices on a Cox-Ross-Rubinstein binomial tree.
/// '''math
/// u = exp(sigma sqrt(dt)),  d = 1/u,  p = (exp(r dt) - d) / (u - d)
/// '''
/// The European value only depends on the terminal layer, so the tree is never built:
/// the discounted payoffs are summed with their risk-neutral node probabilities.
/// Coarse trees with a strong drift give p outside (0, 1); they are still priced,
/// the node weights then alternate in sign.
/// https://en.wikipedia.org/wiki/Binomial_options_pricing_model
#[derive(Clone, Copy, Debug, Default)]
pub struct CoxRossRubinstein {
    pub config: LatticeConfig,
}

impl CoxRossRubinstein {
    pub fn new(nr_intervals: usize) -> Self {
        Self {
            config: LatticeConfig::new(nr_intervals),
        }
    }

    /// Single threaded summation over all terminal nodes.
    pub fn price_serial(&self, dp: &ContractParameters) -> Result<PriceResult, PricingError> {
        let tree = TerminalLayer::new(dp, &self.config)?;
        let (call, put) = tree.payoff_sums(0, tree.n);
        tree.discounted(call, put)
    }

    /// Summation over contiguous node chunks in parallel; every chunk seeds its own weights.
    pub fn price_parallel(&self, dp: &ContractParameters) -> Result<PriceResult, PricingError> {
        let tree = TerminalLayer::new(dp, &self.config)?;
        let nr_chunks = tree.n / CHUNK_SIZE + 1;
        let (call, put) = (0..nr_chunks)
            .into_par_iter()
            .map(|chunk| {
                let start = chunk * CHUNK_SIZE;
                let end = (start + CHUNK_SIZE - 1).min(tree.n);
                tree.payoff_sums(start, end)
            })
            .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1));
        tree.discounted(call, put)
    }
}

impl OptionPricer for CoxRossRubinstein {
    fn price(&self, dp: &ContractParameters) -> Result<PriceResult, PricingError> {
        if self.config.nr_intervals > PARALLEL_THRESHOLD {
            self.price_parallel(dp)
        } else {
            self.price_serial(dp)
        }
    }
}

/// Last layer of an n-step CRR tree.
struct TerminalLayer {
    n: usize,
    ln_spot: f64,
    strike: f64,
    ln_strike: f64,
    /// sigma * sqrt(dt), i.e. ln(u)
    log_step: f64,
    /// risk-neutral up probability
    p: f64,
    discount: f64,
}

impl TerminalLayer {
    fn new(dp: &ContractParameters, config: &LatticeConfig) -> Result<Self, PricingError> {
        config.validate()?;
        dp.validate()?;

        let n = config.nr_intervals;
        let dt = dp.time_to_expiration / n as f64;
        let log_step = dp.vola * dt.sqrt();
        let u = log_step.exp();
        let d = (-log_step).exp();
        if u - d <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "up and down factors coincide (volatility {} over {} intervals)",
                dp.vola, n
            )));
        }

        Ok(Self {
            n,
            ln_spot: dp.spot.ln(),
            strike: dp.strike,
            ln_strike: dp.strike.ln(),
            log_step,
            p: ((dp.rfr * dt).exp() - d) / (u - d),
            discount: dp.discount_factor(),
        })
    }

    /// ln(S u^i d^(n-i))
    fn ln_underlying_price(&self, node: usize) -> f64 {
        self.ln_spot + self.log_step * (2.0 * node as f64 - self.n as f64)
    }

    /// Undiscounted, probability weighted call and put payoffs of the nodes `start..=end`.
    /// The underlying price enters only through its product with the weight, which stays
    /// finite where S u^i d^(n-i) alone would overflow.
    fn payoff_sums(&self, start: usize, end: usize) -> (f64, f64) {
        NodeWeights::new(self.n, start, end, self.p).fold((0.0, 0.0), |(call, put), weight| {
            let ln_st = self.ln_underlying_price(weight.node);
            if ln_st > self.ln_strike {
                (call + weight.scale_exp(ln_st) - self.strike * weight.value(), put)
            } else if ln_st < self.ln_strike {
                (call, put + self.strike * weight.value() - weight.scale_exp(ln_st))
            } else {
                (call, put)
            }
        })
    }

    fn discounted(&self, call: f64, put: f64) -> Result<PriceResult, PricingError> {
        let res = PriceResult::new(call * self.discount, put * self.discount);
        if !res.is_finite() {
            return Err(PricingError::InvalidInput(format!(
                "lattice value is not finite (call {}, put {}) with p = {} over {} intervals",
                res.call, res.put, self.p, self.n
            )));
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic::BlackScholesMerton;
    use assert_approx_eq::assert_approx_eq;

    fn reference() -> ContractParameters {
        ContractParameters::new(100.0, 100.0, 1.0, 0.05, 0.2)
    }

    #[test]
    fn one_step_tree() {
        let dp = reference();
        let res = CoxRossRubinstein::new(1).price(&dp).unwrap();

        let u = 0.2_f64.exp();
        let d = 1.0 / u;
        let p = (0.05_f64.exp() - d) / (u - d);
        let disc = (-0.05_f64).exp();
        assert_approx_eq!(res.call, disc * p * (100.0 * u - 100.0), 1e-12);
        assert_approx_eq!(res.put, disc * (1.0 - p) * (100.0 - 100.0 * d), 1e-12);
    }

    #[test]
    fn default_lattice_near_analytic() {
        let dp = reference();
        let res = CoxRossRubinstein::default().price(&dp).unwrap();
        let exact = BlackScholesMerton.price(&dp).unwrap();
        assert_approx_eq!(res.call, exact.call, 0.05);
        assert_approx_eq!(res.put, exact.put, 0.05);
    }

    #[test]
    fn lattice_put_call_parity() {
        for dp in [
            reference(),
            ContractParameters::new(300.0, 250.0, 1.0, 0.03, 0.15),
            ContractParameters::new(310.0, 250.0, 3.5, 0.05, 0.25),
            ContractParameters::new(50.0, 65.0, 0.25, -0.005, 0.45),
        ] {
            for n in [1, 7, 200, 2_000] {
                let res = CoxRossRubinstein::new(n).price(&dp).unwrap();
                let rhs = dp.forward_intrinsic();
                assert!(
                    res.parity_gap(&dp).abs() <= 1e-6 * rhs.abs().max(1.0),
                    "n = {n}, {dp:?}: {res:?}"
                );
            }
        }
    }

    #[test]
    fn beyond_factorial_range() {
        // 171! overflows f64
        let dp = reference();
        let exact = BlackScholesMerton.price(&dp).unwrap();
        for n in [171, 1_000, 10_000] {
            let res = CoxRossRubinstein::new(n).price(&dp).unwrap();
            assert!(res.is_finite());
            assert_approx_eq!(res.call, exact.call, 0.02);
            assert_approx_eq!(res.put, exact.put, 0.02);
        }
    }

    #[test]
    fn parallel_matches_serial() {
        let dp = ContractParameters::new(102.0, 100.0, 0.5, 0.02, 0.2);
        for n in [1, CHUNK_SIZE - 1, CHUNK_SIZE, 3 * CHUNK_SIZE + 5, 20_001] {
            let pricer = CoxRossRubinstein::new(n);
            let serial = pricer.price_serial(&dp).unwrap();
            let parallel = pricer.price_parallel(&dp).unwrap();
            assert_approx_eq!(serial.call, parallel.call, 1e-8);
            assert_approx_eq!(serial.put, parallel.put, 1e-8);
        }
    }

    #[test]
    fn large_trees_use_the_parallel_path() {
        let dp = reference();
        let pricer = CoxRossRubinstein::new(PARALLEL_THRESHOLD + 1);
        let res = pricer.price(&dp).unwrap();
        let parallel = pricer.price_parallel(&dp).unwrap();
        assert_approx_eq!(res.call, parallel.call, 1e-12);
        assert_approx_eq!(res.put, parallel.put, 1e-12);
        let exact = BlackScholesMerton.price(&dp).unwrap();
        assert_approx_eq!(res.call, exact.call, 1e-3);
    }

    #[test]
    fn rejects_zero_intervals() {
        let res = CoxRossRubinstein::new(0).price(&reference());
        assert!(matches!(res, Err(PricingError::InvalidLatticeConfig(_))));
    }

    #[test]
    fn rejects_zero_volatility() {
        let dp = ContractParameters::new(100.0, 100.0, 1.0, 0.05, 0.0);
        let res = CoxRossRubinstein::new(100).price(&dp);
        assert!(matches!(res, Err(PricingError::InvalidInput(_))));
    }

    #[test]
    fn rejects_vanishing_step() {
        // sigma * sqrt(dt) rounds away next to 1.0
        let dp = ContractParameters::new(100.0, 100.0, 1.0, 0.0, 1e-300);
        let res = CoxRossRubinstein::new(100).price(&dp);
        assert!(matches!(res, Err(PricingError::InvalidInput(_))));
    }

    #[test]
    fn probability_outside_unit_interval_matches_direct_sum() {
        // exp(r dt) > u (p > 1) and exp(r dt) < d (p < 0) on a three step tree
        for rfr in [0.05, -0.05] {
            let dp = ContractParameters::new(100.0, 100.0, 5.0, rfr, 0.01);
            let n = 3;
            let dt = dp.time_to_expiration / n as f64;
            let u = (dp.vola * dt.sqrt()).exp();
            let d = 1.0 / u;
            let p = ((rfr * dt).exp() - d) / (u - d);
            assert!(!(0.0..=1.0).contains(&p), "p = {p}");

            let coefficients = [1.0, 3.0, 3.0, 1.0];
            let (mut call, mut put) = (0.0, 0.0);
            for (i, c) in coefficients.iter().enumerate() {
                let w = c * p.powi(i as i32) * (1.0 - p).powi((n - i) as i32);
                let st = dp.spot * u.powi(i as i32) * d.powi((n - i) as i32);
                call += w * (st - dp.strike).max(0.0);
                put += w * (dp.strike - st).max(0.0);
            }
            let disc = dp.discount_factor();

            let res = CoxRossRubinstein::new(n).price(&dp).unwrap();
            assert_approx_eq!(res.call, disc * call, 1e-9 * call.abs().max(1.0));
            assert_approx_eq!(res.put, disc * put, 1e-9 * put.abs().max(1.0));
        }
    }

    #[test]
    fn low_volatility_on_a_coarse_tree() {
        // 1% volatility over five years: p is about 1.06 with 100 intervals
        let dp = ContractParameters::new(100.0, 100.0, 5.0, 0.05, 0.01);
        let exact = BlackScholesMerton.price(&dp).unwrap();
        let res = CoxRossRubinstein::new(100).price(&dp).unwrap();
        assert!(res.is_finite());
        assert_approx_eq!(res.call, exact.call, 1e-3);
        assert_approx_eq!(res.put, exact.put, 1e-3);
    }

    #[test]
    fn extreme_volatility_stays_finite() {
        // the top node S u^n is about exp(826) and overflows on its own
        let dp = ContractParameters::new(100.0, 100.0, 30.0, 0.05, 1.5);
        let exact = BlackScholesMerton.price(&dp).unwrap();
        let pricer = CoxRossRubinstein::new(10_000);
        for res in [
            pricer.price_serial(&dp).unwrap(),
            pricer.price_parallel(&dp).unwrap(),
        ] {
            assert!(res.is_finite(), "{res:?}");
            assert_approx_eq!(res.call, exact.call, 1e-3);
            assert_approx_eq!(res.put, exact.put, 1e-3);
        }
    }

    #[test]
    fn million_step_tree() {
        let dp = ContractParameters::new(100.0, 100.0, 5.0, 0.05, 0.8);
        let exact = BlackScholesMerton.price(&dp).unwrap();
        let pricer = CoxRossRubinstein::new(1_000_000);
        for res in [
            pricer.price(&dp).unwrap(),
            pricer.price_serial(&dp).unwrap(),
        ] {
            assert!(res.is_finite(), "{res:?}");
            assert_approx_eq!(res.call, exact.call, 1e-3);
            assert_approx_eq!(res.put, exact.put, 1e-3);
        }
    }

    #[test]
    fn non_finite_value_is_an_error() {
        // exp(r dt) overflows, so p is infinite
        let dp = ContractParameters::new(100.0, 100.0, 10.0, 100.0, 0.2);
        let res = CoxRossRubinstein::new(1).price(&dp);
        assert!(matches!(res, Err(PricingError::InvalidInput(_))));
    }
}
