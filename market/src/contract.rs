use std::io::{BufRead, Write};

use chrono::NaiveDate;

use crate::error::{MarketError, MarketResult};
use crate::providers::ContractTermsInput;

pub const DAYS_PER_YEAR: f64 = 365.0;

/// The user supplied part of an option contract.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContractTerms {
    pub strike: f64,
    pub expiry: NaiveDate,
}

impl ContractTerms {
    pub fn new(strike: f64, expiry: NaiveDate) -> MarketResult<Self> {
        if !(strike.is_finite() && strike > 0.0) {
            return Err(MarketError::InvalidInput(format!(
                "strike must be positive, got {strike}"
            )));
        }
        Ok(Self { strike, expiry })
    }

    /// Whole calendar days until expiry over 365. Zero or negative once expired.
    pub fn time_to_expiration(&self, today: NaiveDate) -> f64 {
        (self.expiry - today).num_days() as f64 / DAYS_PER_YEAR
    }
}

/// Terms known up front, e.g. from command line arguments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedTerms(pub ContractTerms);

impl ContractTermsInput for FixedTerms {
    fn collect(&mut self) -> MarketResult<ContractTerms> {
        Ok(self.0)
    }
}

/// Asks for strike and expiry one line at a time.
pub struct PromptTerms<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptTerms<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> MarketResult<String> {
        write!(self.output, "{prompt}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(MarketError::Parse(format!("no answer for {prompt}")));
        }
        Ok(line.trim().to_string())
    }

    fn ask_parsed<T: std::str::FromStr>(&mut self, prompt: &str) -> MarketResult<T> {
        let answer = self.ask(prompt)?;
        answer
            .parse()
            .map_err(|_| MarketError::Parse(format!("{prompt}: cannot parse '{answer}'")))
    }
}

impl<R: BufRead, W: Write> ContractTermsInput for PromptTerms<R, W> {
    fn collect(&mut self) -> MarketResult<ContractTerms> {
        let strike: f64 = self.ask_parsed("Strike price")?;
        let year: i32 = self.ask_parsed("Expiry year")?;
        let month: u32 = self.ask_parsed("Expiry month")?;
        let day: u32 = self.ask_parsed("Expiry day")?;

        let expiry = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            MarketError::InvalidInput(format!("{year}-{month}-{day} is not a calendar date"))
        })?;
        ContractTerms::new(strike, expiry)
    }
}
