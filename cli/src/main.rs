use std::{io::Write, path::PathBuf};

use anyhow::Error;

use clap::{ArgAction, Parser, ValueEnum};

use vst_core::{output::DEFAULT_PRECISION, table::NaValue, vst::DEFAULT_SIZE_THRESHOLD, Reduction};

mod runner;
use runner::Runner;

const NAME: &str = env!("CARGO_BIN_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Calculate Vst between groups for copy-numbers across genomic regions.
///
/// The input is a tab-delimited table in long format, with one copy-number per row. The output
/// is a tab-delimited table with one row per region, holding the Vst between each pair of groups
/// along with the maximum and mean across pairs.
#[derive(Debug, Parser)]
#[clap(name = NAME, version = VERSION, about)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Input table in long format.
    ///
    /// Use '-' to read from stdin. Gzip-compressed input is detected automatically.
    #[arg(value_name = "LONG_TABLE")]
    input: PathBuf,

    /// Column that uniquely identifies regions.
    ///
    /// Region identifiers must be of the form 'chr_start_end_name'.
    #[arg(value_name = "REGION_COLUMN")]
    region_column: String,

    /// Column to use for grouping copy-numbers.
    #[arg(value_name = "GROUP_COLUMN")]
    group_column: String,

    /// Column with copy-number values.
    #[arg(value_name = "CP_COLUMN")]
    cp_column: String,

    /// Path to output table.
    ///
    /// Use '-' to write to stdout.
    #[arg(value_name = "OUTFILE")]
    outfile: PathBuf,

    /// Minimum total size of two groups for Vst to be calculated.
    #[arg(
        long = "size_thresh",
        visible_alias = "size-thresh",
        default_value_t = DEFAULT_SIZE_THRESHOLD,
        value_name = "INT"
    )]
    size_thresh: usize,

    /// Missing value in the input copy-number column.
    ///
    /// The value '-1' marks missing copy-numbers numerically. Any other value is taken as a
    /// literal token. Copy-numbers of exactly -1 are always excluded from Vst calculations.
    #[arg(
        long = "input_na_value",
        visible_alias = "input-na-value",
        default_value = ".",
        allow_hyphen_values = true,
        value_name = "STR"
    )]
    input_na_value: NaValue,

    /// Value written where Vst is undefined.
    #[arg(
        long = "output_na_value",
        visible_alias = "output-na-value",
        default_value_t = f64::NAN,
        allow_negative_numbers = true,
        value_name = "FLOAT"
    )]
    output_na_value: f64,

    /// Column with chromosome information.
    #[arg(
        long = "contig_col",
        visible_alias = "contig-col",
        default_value = "chr",
        value_name = "STR"
    )]
    contig_col: String,

    /// Column with sex information.
    ///
    /// Required if the contig is 'X' or 'chrX', in which case only rows with sex 'F', 'f' or
    /// 'female' are used.
    #[arg(
        long = "sex_col",
        visible_alias = "sex-col",
        default_value = "sex",
        value_name = "STR"
    )]
    sex_col: String,

    /// Chromosome to calculate Vst for.
    ///
    /// If 'X' or 'chrX', only female rows are used. Rows are never dropped by contig, but if the
    /// contig column is present, rows on other contigs are reported with a warning.
    #[arg(long, value_name = "STR")]
    contig: Option<String>,

    /// Names of groups to exclude.
    #[arg(
        long = "exclude_groups",
        visible_alias = "exclude-groups",
        num_args = 1..,
        value_name = "GROUP"
    )]
    exclude_groups: Option<Vec<String>>,

    /// How undefined pairwise values affect the maximum and mean.
    #[arg(
        long = "summary_na",
        visible_alias = "summary-na",
        value_enum,
        default_value_t = SummaryNa::Skip,
        value_name = "POLICY"
    )]
    summary_na: SummaryNa,

    /// Number of decimal places for Vst values.
    #[arg(long, default_value_t = DEFAULT_PRECISION, value_name = "INT")]
    precision: usize,

    /// Suppress warnings.
    ///
    /// By default, only warnings are printed. By setting this flag, warnings will be disabled.
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbosity.
    ///
    /// Flag can be set multiply times to increase verbosity.
    #[clap(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Print CLI arguments for debugging.
    #[clap(long, hide = true)]
    debug: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum SummaryNa {
    /// Summarise defined values only.
    Skip,
    /// Summaries are undefined if any pairwise value is undefined.
    Propagate,
}

impl From<SummaryNa> for Reduction {
    fn from(summary_na: SummaryNa) -> Self {
        match summary_na {
            SummaryNa::Skip => Reduction::Skip,
            SummaryNa::Propagate => Reduction::Propagate,
        }
    }
}

impl Cli {
    pub fn run(self) -> Result<(), Error> {
        if self.debug {
            eprintln!("{self:#?}");
        }

        let level = if self.quiet {
            log::LevelFilter::Off
        } else {
            match self.verbose {
                0 => log::LevelFilter::Warn,
                1 => log::LevelFilter::Info,
                2 => log::LevelFilter::Debug,
                _ => log::LevelFilter::Trace,
            }
        };

        match env_logger::Builder::new()
            .filter_level(level)
            .target(env_logger::Target::Stderr)
            .format(|buf, record| {
                let level = record.level().as_str().to_lowercase();
                let args = record.args();
                writeln!(buf, "[vst {level:>5}] {args}")
            })
            .try_init()
        {
            Ok(()) => (),
            Err(e) => eprintln!("failed to setup logger: {e}"),
        }

        Runner::from(self).run()
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.run() {
        Ok(()) => (),
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(1);
        }
    }
}
