pub mod binomial;
mod weights;

pub use binomial::{CoxRossRubinstein, PARALLEL_THRESHOLD};
