use libm::lgamma;

/// ln C(n, k)
pub(crate) fn ln_binomial(n: usize, k: usize) -> f64 {
    if k == 0 || k == n {
        return 0.0;
    }
    lgamma(n as f64 + 1.0) - lgamma(k as f64 + 1.0) - lgamma((n - k) as f64 + 1.0)
}

/// k ln|x|, with the empty product x^0 = 1 even for x = 0.
fn ln_abs_pow(k: usize, ln_abs: f64) -> f64 {
    if k == 0 {
        0.0
    } else {
        k as f64 * ln_abs
    }
}

fn sign_of_pow(k: usize, x: f64) -> f64 {
    if x < 0.0 && k % 2 == 1 {
        -1.0
    } else {
        1.0
    }
}

/// Weight C(n, i) p^i (1-p)^(n-i) of terminal node i, kept as sign and logarithm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct NodeWeight {
    pub node: usize,
    /// ln |weight|
    pub ln_abs: f64,
    /// +1 or -1, negative only when p lies outside [0, 1]
    pub sign: f64,
}

impl NodeWeight {
    pub fn value(&self) -> f64 {
        self.sign * self.ln_abs.exp()
    }

    /// weight * exp(ln_x), formed in one exponential so neither factor overflows on its own.
    pub fn scale_exp(&self, ln_x: f64) -> f64 {
        self.sign * (self.ln_abs + ln_x).exp()
    }
}

/// Walks the weights of the nodes `start..=end`. The first one is seeded in closed form,
/// the rest follow from
/// '''math
/// ln|w(i+1)| = ln|w(i)| + ln((n - i) / (i + 1)) + ln|p / (1 - p)|
/// '''
/// so no factorial or power of p is ever formed. The sign flips on every step when p lies
/// outside [0, 1] (coarse trees with a strong drift).
#[derive(Clone, Debug)]
pub(crate) struct NodeWeights {
    n: usize,
    node: usize,
    end: usize,
    p: f64,
    ln_abs_p: f64,
    ln_abs_q: f64,
    current: NodeWeight,
}

impl NodeWeights {
    pub(crate) fn new(n: usize, start: usize, end: usize, p: f64) -> Self {
        debug_assert!(start <= end && end <= n);
        let ln_abs_p = p.abs().ln();
        let ln_abs_q = (1.0 - p).abs().ln();
        let mut weights = Self {
            n,
            node: start,
            end,
            p,
            ln_abs_p,
            ln_abs_q,
            current: NodeWeight {
                node: start,
                ln_abs: 0.0,
                sign: 1.0,
            },
        };
        weights.current = weights.closed_form(start);
        weights
    }

    fn closed_form(&self, node: usize) -> NodeWeight {
        let ups = node;
        let downs = self.n - node;
        NodeWeight {
            node,
            ln_abs: ln_binomial(self.n, node)
                + ln_abs_pow(ups, self.ln_abs_p)
                + ln_abs_pow(downs, self.ln_abs_q),
            sign: sign_of_pow(ups, self.p) * sign_of_pow(downs, 1.0 - self.p),
        }
    }

    fn advance(&self) -> NodeWeight {
        let node = self.node + 1;
        let ln_odds = self.ln_abs_p - self.ln_abs_q;
        if !ln_odds.is_finite() {
            // p is 0 or 1: all mass sits on one end of the layer
            return self.closed_form(node);
        }
        let ratio = (self.n - self.node) as f64 / node as f64;
        let flips = (self.p < 0.0) != (1.0 - self.p < 0.0);
        NodeWeight {
            node,
            ln_abs: self.current.ln_abs + ratio.ln() + ln_odds,
            sign: if flips {
                -self.current.sign
            } else {
                self.current.sign
            },
        }
    }
}

impl Iterator for NodeWeights {
    type Item = NodeWeight;

    fn next(&mut self) -> Option<Self::Item> {
        if self.node > self.end {
            return None;
        }
        let current = self.current;
        if self.node < self.n {
            self.current = self.advance();
        }
        self.node += 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end + 1).saturating_sub(self.node);
        (remaining, Some(remaining))
    }
}
