//! Vst between two copy-number samples.
//!
//! Vst measures the proportion of the total copy-number variance that is explained by group
//! membership. For two groups of sizes n₁ and n₂, with population variances V₁ and V₂ and a
//! pooled variance Vₜ, it is defined as
//!
//! ```text
//! Vst = (Vₜ - (V₁n₁ + V₂n₂) / (n₁ + n₂)) / Vₜ
//! ```
//!
//! See Redon et al. (2006).

/// Default minimum combined sample size required for Vst to be defined.
pub const DEFAULT_SIZE_THRESHOLD: usize = 30;

/// A copy-number sample for a single group in a single region.
///
/// Constructing a sample removes observations that should not contribute to Vst: observations
/// that were absent in the input, and observations equal to [`Sample::MISSING`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sample(Vec<f64>);

impl Sample {
    /// Sentinel copy-number marking an excluded observation.
    pub const MISSING: f64 = -1.0;

    /// Creates a new sample from observations, dropping absent and sentinel values.
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self(
            observations
                .into_iter()
                .flatten()
                .filter(|&x| x != Self::MISSING)
                .collect(),
        )
    }

    /// Returns the number of retained observations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no observations were retained.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the retained observations.
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Returns the population variance of the sample.
    pub fn variance(&self) -> f64 {
        variance(self.0.iter().copied(), self.len())
    }
}

impl From<Vec<f64>> for Sample {
    fn from(values: Vec<f64>) -> Self {
        Self::from_observations(values.into_iter().map(Some))
    }
}

impl FromIterator<Option<f64>> for Sample {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self::from_observations(iter)
    }
}

/// Vst between two samples.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Vst(pub f64);

impl Vst {
    /// Calculates Vst between two samples.
    ///
    /// Returns `None` if either sample is empty, or if the combined sample size is below
    /// `size_threshold`. If there is no variance in the pooled sample, Vst is zero. Negative
    /// estimates are floored at zero.
    pub fn from_samples(a: &Sample, b: &Sample, size_threshold: usize) -> Option<Self> {
        let (n1, n2) = (a.len(), b.len());

        if n1 == 0 || n2 == 0 || n1 + n2 < size_threshold {
            return None;
        }

        Some(Self::from_samples_unchecked(a, b))
    }

    fn from_samples_unchecked(a: &Sample, b: &Sample) -> Self {
        let (n1, n2) = (a.len() as f64, b.len() as f64);

        let pooled = a.values().iter().chain(b.values()).copied();
        let v_total = variance(pooled, a.len() + b.len());

        if v_total == 0.0 {
            return Self(0.0);
        }

        let v_within = (a.variance() * n1 + b.variance() * n2) / (n1 + n2);

        Self(((v_total - v_within) / v_total).max(0.0))
    }
}

impl From<Vst> for f64 {
    fn from(vst: Vst) -> Self {
        vst.0
    }
}

/// Calculates Vst between two sets of observations.
///
/// See [`Vst::from_samples`] for details.
pub fn vst<A, B>(a: A, b: B, size_threshold: usize) -> Option<f64>
where
    A: IntoIterator<Item = Option<f64>>,
    B: IntoIterator<Item = Option<f64>>,
{
    Vst::from_samples(&Sample::from_iter(a), &Sample::from_iter(b), size_threshold).map(f64::from)
}

// Shifted by the first value, so constant samples have exactly zero variance.
fn variance<I>(values: I, n: usize) -> f64
where
    I: Iterator<Item = f64> + Clone,
{
    let Some(shift) = values.clone().next() else {
        return f64::NAN;
    };

    let n = n as f64;
    let shifted = values.map(move |x| x - shift);
    let mean = shifted.clone().sum::<f64>() / n;

    shifted.map(|x| (x - mean).powi(2)).sum::<f64>() / n
}
