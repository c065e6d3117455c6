//! Decoding of missing values in input cells.

use std::{convert::Infallible, fmt, num::ParseFloatError, str::FromStr};

/// Cell contents that always decode as absent, regardless of configuration.
pub const CONVENTIONAL_NA_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null"];

/// The representation of missing copy-numbers in an input table.
///
/// This governs only how raw text is decoded when loading. Copy-numbers that decode to
/// [`Sample::MISSING`](crate::vst::Sample::MISSING) are kept at this stage, and are instead
/// excluded when samples are constructed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NaValue {
    /// A literal token, such as `.`, that decodes as absent.
    Token(String),
    /// An integer sentinel written in place of missing values.
    ///
    /// Cells holding the sentinel decode to the corresponding number.
    Sentinel(i64),
}

impl NaValue {
    /// Decodes a raw cell into an optional copy-number.
    ///
    /// Returns `Ok(None)` if the cell is absent. Non-finite numbers are treated as absent.
    pub fn decode(&self, raw: &str) -> Result<Option<f64>, ParseFloatError> {
        let raw = raw.trim();

        if self.is_absent(raw) {
            return Ok(None);
        }

        let value = match self {
            NaValue::Sentinel(sentinel) if raw.parse::<i64>().ok() == Some(*sentinel) => {
                *sentinel as f64
            }
            _ => raw.parse::<f64>()?,
        };

        Ok(value.is_finite().then_some(value))
    }

    fn is_absent(&self, raw: &str) -> bool {
        match self {
            NaValue::Token(token) if token == raw => true,
            _ => CONVENTIONAL_NA_TOKENS.contains(&raw),
        }
    }
}

impl Default for NaValue {
    fn default() -> Self {
        Self::Token(String::from("."))
    }
}

impl FromStr for NaValue {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "-1" => Self::Sentinel(-1),
            token => Self::Token(token.to_string()),
        })
    }
}

impl fmt::Display for NaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NaValue::Token(token) => f.write_str(token),
            NaValue::Sentinel(sentinel) => write!(f, "{sentinel}"),
        }
    }
}
