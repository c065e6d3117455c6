//! Aggregation of pairwise Vst across regions.

use std::collections::BTreeMap;

use crate::{
    group::{Groups, Pairs},
    region::Region,
    table::{Record, Table},
    vst::{Sample, Vst, DEFAULT_SIZE_THRESHOLD},
};

/// Policy for summarising pairwise values when some are undefined.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Reduction {
    /// Ignore undefined values, so that summaries are undefined only if all values are.
    #[default]
    Skip,
    /// Any undefined value makes summaries undefined.
    Propagate,
}

impl Reduction {
    /// Returns the maximum and mean of the provided values.
    ///
    /// If there are no values to summarise, both are undefined.
    pub fn summarize(self, values: &[Option<f64>]) -> Summary {
        let defined = match self {
            Reduction::Skip => values.iter().flatten().copied().collect::<Vec<_>>(),
            Reduction::Propagate => match values.iter().copied().collect::<Option<Vec<_>>>() {
                Some(values) => values,
                None => return Summary::default(),
            },
        };

        if defined.is_empty() {
            return Summary::default();
        }

        let max = defined.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = defined.iter().sum::<f64>() / defined.len() as f64;

        Summary {
            max: Some(max),
            mean: Some(mean),
        }
    }
}

/// Summary statistics of the pairwise Vst values in a region.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    /// Maximum pairwise Vst.
    pub max: Option<f64>,
    /// Mean pairwise Vst.
    pub mean: Option<f64>,
}

/// Pairwise Vst values for a single region.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionVst {
    /// The region.
    pub region: Region,
    /// Summary of the pairwise values.
    pub summary: Summary,
    /// Vst for each pair of groups, in the order of the pairs used for aggregation.
    pub pairwise: Vec<Option<f64>>,
}

/// Calculates pairwise Vst between groups for each region.
#[derive(Clone, Debug)]
pub struct Aggregator {
    groups: Groups,
    pairs: Pairs,
    size_threshold: usize,
    reduction: Reduction,
}

impl Aggregator {
    /// Creates a new aggregator comparing all pairs of the provided groups.
    pub fn new(groups: Groups) -> Self {
        let pairs = groups.pairs();

        Self {
            groups,
            pairs,
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            reduction: Reduction::default(),
        }
    }

    /// Returns the pairs of groups compared in every region.
    pub fn pairs(&self) -> &Pairs {
        &self.pairs
    }

    /// Sets the minimum combined sample size for Vst to be defined.
    ///
    /// By default, this is [`DEFAULT_SIZE_THRESHOLD`].
    pub fn set_size_threshold(mut self, size_threshold: usize) -> Self {
        self.size_threshold = size_threshold;
        self
    }

    /// Sets the policy for summarising pairwise values.
    pub fn set_reduction(mut self, reduction: Reduction) -> Self {
        self.reduction = reduction;
        self
    }

    /// Calculates pairwise Vst for each region in the table.
    ///
    /// Regions are returned in lexicographical order of their identifiers. Identifiers that do
    /// not have integer start and end coordinates are decomposed as far as possible, and reported
    /// with a warning.
    pub fn aggregate(&self, table: &Table) -> Vec<RegionVst> {
        let mut regions: BTreeMap<&str, Vec<&Record>> = BTreeMap::new();
        for record in table {
            regions.entry(&record.region).or_default().push(record);
        }

        log::info!(
            "Calculating Vst for {} pairs of {} groups in {} regions.",
            self.pairs.len(),
            self.groups.len(),
            regions.len()
        );

        regions
            .into_iter()
            .map(|(identifier, records)| {
                let region = Region::from(identifier);
                if !region.is_well_formed() {
                    log::warn!(
                        "Region identifier '{identifier}' is not of the form 'chr_start_end_name'."
                    );
                }

                let (pairwise, summary) = self.aggregate_region(records.iter().copied());

                log::trace!(
                    "Region '{identifier}': {} records, max Vst {:?}, mean Vst {:?}.",
                    records.len(),
                    summary.max,
                    summary.mean
                );

                RegionVst {
                    region,
                    summary,
                    pairwise,
                }
            })
            .collect()
    }

    /// Calculates pairwise Vst from the records of a single region.
    ///
    /// Returns one value for each pair, in pair order, along with their summary. Records with
    /// group labels outside the aggregator groups are ignored.
    pub fn aggregate_region<'a, I>(&self, records: I) -> (Vec<Option<f64>>, Summary)
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut observations = vec![Vec::new(); self.groups.len()];
        for record in records {
            if let Some(id) = self.groups.get_id(&record.group) {
                observations[usize::from(id)].push(record.copy_number);
            }
        }

        let samples = observations
            .into_iter()
            .map(Sample::from_observations)
            .collect::<Vec<_>>();

        let pairwise = self
            .pairs
            .iter()
            .map(|pair| {
                let (a, b) = pair.ids();
                Vst::from_samples(
                    &samples[usize::from(a)],
                    &samples[usize::from(b)],
                    self.size_threshold,
                )
                .map(f64::from)
            })
            .collect::<Vec<_>>();

        let summary = self.reduction.summarize(&pairwise);

        (pairwise, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEPARATED: f64 = 4.0 / 4.1875;

    fn records(region: &str, group: &str, values: &[f64]) -> Vec<Record> {
        values
            .iter()
            .map(|&v| Record::new(region, group, Some(v)))
            .collect()
    }

    fn table(regions: &[&str]) -> Table {
        regions
            .iter()
            .flat_map(|region| {
                let mut v = records(region, "A", &[1.0, 1.0, 1.0, 2.0]);
                v.extend(records(region, "B", &[5.0, 5.0, 5.0, 6.0]));
                v
            })
            .collect()
    }

    #[test]
    fn test_summarize_skip() {
        let summary = Reduction::Skip.summarize(&[Some(0.2), None, Some(0.6)]);

        assert_approx_eq!(summary.max, Some(0.6));
        assert_approx_eq!(summary.mean, Some(0.4));
    }

    #[test]
    fn test_summarize_propagate() {
        let summary = Reduction::Propagate.summarize(&[Some(0.2), None, Some(0.6)]);

        assert_eq!(summary, Summary::default());

        let summary = Reduction::Propagate.summarize(&[Some(0.2), Some(0.6)]);

        assert_approx_eq!(summary.max, Some(0.6));
        assert_approx_eq!(summary.mean, Some(0.4));
    }

    #[test]
    fn test_summarize_all_undefined() {
        for reduction in [Reduction::Skip, Reduction::Propagate] {
            assert_eq!(reduction.summarize(&[None, None]), Summary::default());
            assert_eq!(reduction.summarize(&[]), Summary::default());
        }
    }

    #[test]
    fn test_aggregate_two_regions() {
        let table = table(&["chr2_1_50_second", "chr1_100_200_my_region"]);
        let aggregator = Aggregator::new(Groups::from_records(&table)).set_size_threshold(4);

        let regions = aggregator.aggregate(&table);

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].region.to_string(), "chr1_100_200_my_region");
        assert_eq!(regions[0].region.name, "my_region");
        assert_eq!(regions[1].region.chr, "chr2");

        for region in regions {
            assert_approx_eq!(region.pairwise, vec![Some(SEPARATED)]);
            assert_approx_eq!(region.summary.max, Some(SEPARATED));
            assert_approx_eq!(region.summary.mean, Some(SEPARATED));
        }
    }

    #[test]
    fn test_aggregate_default_threshold_is_undefined() {
        let table = table(&["chr1_100_200_x"]);
        let aggregator = Aggregator::new(Groups::from_records(&table));

        let regions = aggregator.aggregate(&table);

        assert_eq!(regions[0].pairwise, vec![None]);
        assert_eq!(regions[0].summary, Summary::default());
    }

    #[test]
    fn test_aggregate_region_pair_order_with_absent_group() {
        let mut records = records("r_1_2", "A", &[1.0, 2.0]);
        records.extend(self::records("r_1_2", "C", &[1.0, 2.0]));

        let groups = Groups::from_iter(["A", "B", "C"]);
        let aggregator = Aggregator::new(groups).set_size_threshold(2);

        let (pairwise, summary) = aggregator.aggregate_region(&records);

        assert_eq!(pairwise, vec![None, Some(0.0), None]);
        assert_eq!(summary.max, Some(0.0));
    }

    #[test]
    fn test_aggregate_region_ignores_excluded_groups() {
        let mut records = records("r_1_2", "A", &[1.0, 1.0, 1.0, 2.0]);
        records.extend(self::records("r_1_2", "B", &[5.0, 5.0, 5.0, 6.0]));
        records.extend(self::records("r_1_2", "C", &[100.0, 200.0]));

        let groups = Groups::from_records(&records).exclude(&["C"]);
        let aggregator = Aggregator::new(groups).set_size_threshold(4);

        assert_eq!(aggregator.pairs().names().collect::<Vec<_>>(), ["A_B"]);

        let (pairwise, _) = aggregator.aggregate_region(&records);

        assert_approx_eq!(pairwise, vec![Some(SEPARATED)]);
    }

    #[test]
    fn test_aggregate_keeps_malformed_regions() {
        let table = table(&["region1", "chr1_KI270706v1_random_100_200_x", "chr1_100_200_x"]);
        let aggregator = Aggregator::new(Groups::from_records(&table)).set_size_threshold(4);

        let regions = aggregator.aggregate(&table);

        assert_eq!(regions.len(), 3);
        assert_eq!(regions[1].region.start, "KI270706v1");
        assert_eq!(regions[2].region.chr, "region1");

        for region in regions {
            assert_approx_eq!(region.pairwise, vec![Some(SEPARATED)]);
        }
    }
}
