use anyhow::{Context, Error};

use vst_core::{
    output::{Schema, Writer},
    table::{self, Columns, Contig, Filter},
    Aggregator, Groups, Input, Output, Reduction,
};

use super::Cli;

#[derive(Debug)]
pub struct Runner {
    input: Input,
    output: Output,
    builder: table::Builder,
    exclude_groups: Vec<String>,
    size_threshold: usize,
    reduction: Reduction,
    precision: usize,
    na_value: f64,
}

impl Runner {
    pub fn run(self) -> Result<(), Error> {
        let table = self
            .builder
            .read_from_input(&self.input)
            .with_context(|| format!("Failed to read table from '{}'", self.input))?;

        if table.is_empty() {
            log::warn!("No records left in '{}' after filtering.", self.input);
        }

        let groups = Groups::from_records(&table).exclude(self.exclude_groups.as_slice());
        log::info!(
            "Found {} groups: {}.",
            groups.len(),
            groups.iter().collect::<Vec<_>>().join(", ")
        );

        if groups.len() < 2 {
            log::warn!("Fewer than two groups found, no pairwise Vst will be calculated.");
        }

        let aggregator = Aggregator::new(groups)
            .set_size_threshold(self.size_threshold)
            .set_reduction(self.reduction);

        let regions = aggregator.aggregate(&table);

        let writer = self
            .output
            .create()
            .with_context(|| format!("Failed to create output '{}'", self.output))?;

        Writer::new(writer, Schema::new(aggregator.pairs()))
            .set_precision(self.precision)
            .set_na_value(self.na_value)
            .write_all(&regions)
            .with_context(|| format!("Failed to write output to '{}'", self.output))?;

        Ok(())
    }
}

impl From<Cli> for Runner {
    fn from(args: Cli) -> Self {
        let columns = Columns::new(args.region_column, args.group_column, args.cp_column)
            .set_contig(args.contig_col)
            .set_sex(args.sex_col);

        let filter = Filter::new(args.contig.map(Contig::new));
        if filter.requires_sex() {
            log::info!("Restricting to female samples for chromosome X.");
        }

        let builder = table::Builder::new(columns)
            .set_na_value(args.input_na_value)
            .set_filter(filter);

        Self {
            input: Input::new(args.input),
            output: Output::new(args.outfile),
            builder,
            exclude_groups: args.exclude_groups.unwrap_or_default(),
            size_threshold: args.size_thresh,
            reduction: Reduction::from(args.summary_na),
            precision: args.precision,
            na_value: args.output_na_value,
        }
    }
}
