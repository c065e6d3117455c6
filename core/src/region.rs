//! Region identifiers.

use std::fmt;

const DELIMITER: char = '_';

/// A region, decomposed from an identifier of the form `chr_start_end_name`.
///
/// The name consists of all tokens after the end coordinate, and may itself contain underscores.
/// It is empty if the identifier has only three tokens. Fields are kept as they appear in the
/// identifier, so decomposition never fails: missing tokens are empty, and coordinates need not
/// be integers.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Region {
    /// Chromosome.
    pub chr: String,
    /// Start coordinate.
    pub start: String,
    /// End coordinate.
    pub end: String,
    /// Name.
    pub name: String,
}

impl Region {
    /// Returns `true` if the identifier had at least three tokens, and start and end are
    /// non-negative integers.
    pub fn is_well_formed(&self) -> bool {
        let is_coordinate = |s: &str| s.parse::<u64>().is_ok();

        !self.chr.is_empty() && is_coordinate(&self.start) && is_coordinate(&self.end)
    }
}

impl From<&str> for Region {
    fn from(identifier: &str) -> Self {
        let mut tokens = identifier.splitn(4, DELIMITER).map(str::to_string);
        let mut next = || tokens.next().unwrap_or_default();

        Self {
            chr: next(),
            start: next(),
            end: next(),
            name: next(),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Region {
            chr,
            start,
            end,
            name,
        } = self;

        if name.is_empty() {
            write!(f, "{chr}{DELIMITER}{start}{DELIMITER}{end}")
        } else {
            write!(f, "{chr}{DELIMITER}{start}{DELIMITER}{end}{DELIMITER}{name}")
        }
    }
}
