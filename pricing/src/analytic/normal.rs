use probability::distribution::{Distribution, Gaussian};

/// Standard normal cumulative distribution function, Phi(x).
///
/// Defined for the whole extended real line: Phi(-inf) = 0, Phi(inf) = 1 and NaN propagates.
pub fn norm_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == f64::INFINITY {
        return 1.0;
    }
    if x == f64::NEG_INFINITY {
        return 0.0;
    }
    let normal = Gaussian::new(0.0, 1.0);
    normal.distribution(x)
}
