//! Row filters applied while loading.

/// Sex labels retained when filtering for chromosome X.
pub const FEMALE_LABELS: &[&str] = &["F", "f", "female"];

/// A contig, as requested for analysis.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contig(String);

impl Contig {
    /// Creates a new contig.
    pub fn new<S>(name: S) -> Self
    where
        S: ToString,
    {
        Self(name.to_string())
    }

    /// Returns `true` if the contig is chromosome X, named either `X` or `chrX`.
    pub fn is_x(&self) -> bool {
        matches!(self.0.as_str(), "X" | "chrX")
    }

    /// Returns `true` if `name` refers to the same contig, ignoring any `chr` prefix.
    pub fn matches(&self, name: &str) -> bool {
        strip_chr(&self.0) == strip_chr(name)
    }

    /// Returns the contig name as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn strip_chr(name: &str) -> &str {
    name.strip_prefix("chr").unwrap_or(name)
}

/// A filter deciding which input rows are retained.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Filter {
    contig: Option<Contig>,
}

impl Filter {
    /// Creates a filter for the provided contig.
    ///
    /// With no contig, all rows are retained.
    pub fn new(contig: Option<Contig>) -> Self {
        Self { contig }
    }

    /// Returns the contig of the filter, if any.
    pub fn contig(&self) -> Option<&Contig> {
        self.contig.as_ref()
    }

    /// Returns `true` if rows must be restricted to females, which is the case for chromosome X.
    pub fn requires_sex(&self) -> bool {
        self.contig.as_ref().map_or(false, Contig::is_x)
    }

    /// Returns `true` if a row with the provided sex should be retained.
    ///
    /// Rows are only restricted for chromosome X, where females are retained. Rows are never
    /// dropped because of their contig.
    pub fn keep(&self, sex: Option<&str>) -> bool {
        !self.requires_sex() || sex.map_or(false, is_female)
    }

    /// Returns `true` if a row on the provided contig is on the contig of the filter.
    ///
    /// With no contig, every row is on contig.
    pub fn is_on_contig(&self, contig: &str) -> bool {
        self.contig.as_ref().map_or(true, |requested| requested.matches(contig))
    }
}

fn is_female(sex: &str) -> bool {
    FEMALE_LABELS.contains(&sex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contig_is_x() {
        assert!(Contig::new("X").is_x());
        assert!(Contig::new("chrX").is_x());
        assert!(!Contig::new("x").is_x());
        assert!(!Contig::new("chr1").is_x());
    }

    #[test]
    fn test_contig_matches_ignoring_prefix() {
        let contig = Contig::new("X");

        assert!(contig.matches("chrX"));
        assert!(contig.matches("X"));
        assert!(!contig.matches("chrY"));
    }

    #[test]
    fn test_no_contig_keeps_everything() {
        let filter = Filter::default();

        assert!(!filter.requires_sex());
        assert!(filter.keep(Some("M")));
        assert!(filter.keep(None));
        assert!(filter.is_on_contig("chr1"));
    }

    #[test]
    fn test_autosome_keeps_every_row() {
        let filter = Filter::new(Some(Contig::new("chr1")));

        assert!(!filter.requires_sex());
        assert!(filter.keep(Some("M")));
        assert!(filter.keep(None));
        assert!(filter.is_on_contig("1"));
        assert!(!filter.is_on_contig("chr2"));
    }

    #[test]
    fn test_chrx_keeps_only_females() {
        let filter = Filter::new(Some(Contig::new("chrX")));

        assert!(filter.requires_sex());
        assert!(filter.keep(Some("F")));
        assert!(filter.keep(Some("f")));
        assert!(filter.keep(Some("female")));
        assert!(!filter.keep(Some("M")));
        assert!(!filter.keep(Some("Female")));
        assert!(!filter.keep(None));
    }
}
