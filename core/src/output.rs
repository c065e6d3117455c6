//! Writing region Vst tables.
//!
//! The output has one row per region. Each column has a declared [`Kind`], which determines how
//! its cells are formatted, and every row is checked against this [`Schema`] before writing.

use std::{
    fmt,
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::{aggregate::RegionVst, group::Pairs};

/// Default number of decimal places for Vst values.
pub const DEFAULT_PRECISION: usize = 6;

/// An output destination.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Output {
    /// A path to which to write a file.
    Path(PathBuf),
    /// Stdout.
    Stdout,
}

impl Output {
    /// Path used on the command line to denote stdout.
    pub const STDOUT: &'static str = "-";

    /// Creates a new output destination, where the path `-` denotes stdout.
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        let path = path.into();

        if path.as_os_str() == Self::STDOUT {
            Self::Stdout
        } else {
            Self::Path(path)
        }
    }

    /// Open the output for writing.
    pub fn create(&self) -> io::Result<Box<dyn Write>> {
        Ok(match self {
            Output::Path(path) => Box::new(io::BufWriter::new(File::create(path)?)),
            Output::Stdout => Box::new(io::BufWriter::new(io::stdout().lock())),
        })
    }

    /// Returns the provided path if provided, otherwise `None`.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Output::Path(path) => Some(path.as_ref()),
            Output::Stdout => None,
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Path(path) => write!(f, "{}", path.display()),
            Output::Stdout => f.write_str("[stdout]"),
        }
    }
}

/// The kind of values held by a column.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// Free text.
    Text,
    /// Vst value, possibly undefined.
    Vst,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Text => "text",
            Kind::Vst => "vst",
        })
    }
}

/// A named output column.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Column {
    name: String,
    kind: Kind,
}

impl Column {
    /// Creates a new column.
    pub fn new<S>(name: S, kind: Kind) -> Self
    where
        S: ToString,
    {
        Self {
            name: name.to_string(),
            kind,
        }
    }

    /// Returns the name of the column.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the kind of the column.
    pub fn kind(&self) -> Kind {
        self.kind
    }
}

/// The columns of an output table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Schema(Vec<Column>);

impl Schema {
    /// Creates the schema for the provided pairs of groups.
    ///
    /// The leading columns are `chr`, `start`, `end`, `name`, `max_vst`, and `mean_vst`,
    /// followed by one column per pair.
    pub fn new(pairs: &Pairs) -> Self {
        let fixed = [
            Column::new("chr", Kind::Text),
            Column::new("start", Kind::Text),
            Column::new("end", Kind::Text),
            Column::new("name", Kind::Text),
            Column::new("max_vst", Kind::Vst),
            Column::new("mean_vst", Kind::Vst),
        ];

        let pairwise = pairs.names().map(|name| Column::new(name, Kind::Vst));

        Self(fixed.into_iter().chain(pairwise).collect())
    }

    /// Returns the columns.
    pub fn columns(&self) -> &[Column] {
        &self.0
    }

    /// Returns an iterator over the column names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(Column::name)
    }
}

/// A single cell of an output row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cell<'a> {
    /// Free text.
    Text(&'a str),
    /// Vst value, possibly undefined.
    Vst(Option<f64>),
}

impl<'a> Cell<'a> {
    /// Returns the kind of the cell.
    pub fn kind(&self) -> Kind {
        match self {
            Cell::Text(_) => Kind::Text,
            Cell::Vst(_) => Kind::Vst,
        }
    }

    /// Returns the cells of the output row for a region.
    pub fn from_region(region: &'a RegionVst) -> Vec<Self> {
        let r = &region.region;

        let fixed = [
            Cell::Text(&r.chr),
            Cell::Text(&r.start),
            Cell::Text(&r.end),
            Cell::Text(&r.name),
            Cell::Vst(region.summary.max),
            Cell::Vst(region.summary.mean),
        ];

        let pairwise = region.pairwise.iter().map(|&vst| Cell::Vst(vst));

        fixed.into_iter().chain(pairwise).collect()
    }
}

/// A writer of region Vst tables.
pub struct Writer<W>
where
    W: Write,
{
    inner: csv::Writer<W>,
    schema: Schema,
    precision: usize,
    na_value: f64,
}

impl<W> Writer<W>
where
    W: Write,
{
    /// Creates a new tab-delimited writer for the provided schema.
    pub fn new(inner: W, schema: Schema) -> Self {
        let inner = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(inner);

        Self {
            inner,
            schema,
            precision: DEFAULT_PRECISION,
            na_value: f64::NAN,
        }
    }

    /// Sets the number of decimal places for Vst values.
    ///
    /// By default, this is [`DEFAULT_PRECISION`].
    pub fn set_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the value written in place of undefined Vst values.
    ///
    /// By default, this is NaN.
    pub fn set_na_value(mut self, na_value: f64) -> Self {
        self.na_value = na_value;
        self
    }

    /// Writes the header.
    pub fn write_header(&mut self) -> Result<(), Error> {
        let names = self.schema.names().collect::<Vec<_>>();
        self.inner.write_record(&names)?;

        Ok(())
    }

    /// Writes the row for a region.
    ///
    /// # Errors
    ///
    /// If the row does not conform to the schema, or on I/O error.
    pub fn write_region(&mut self, region: &RegionVst) -> Result<(), Error> {
        let cells = Cell::from_region(region);

        if cells.len() != self.schema.columns().len() {
            return Err(Error::ColumnCount {
                expected: self.schema.columns().len(),
                found: cells.len(),
            });
        }

        let fields = self
            .schema
            .columns()
            .iter()
            .zip(cells.iter())
            .map(|(column, cell)| {
                if column.kind() == cell.kind() {
                    Ok(self.format(cell))
                } else {
                    Err(Error::ColumnKind {
                        column: column.name().to_string(),
                        expected: column.kind(),
                        found: cell.kind(),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.inner.write_record(&fields)?;

        Ok(())
    }

    /// Writes the header followed by all regions, and flushes.
    pub fn write_all<'a, I>(&mut self, regions: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = &'a RegionVst>,
    {
        self.write_header()?;

        let mut n = 0;
        for region in regions {
            self.write_region(region)?;
            n += 1;
        }

        self.inner.flush()?;

        log::info!("Wrote {n} regions.");

        Ok(())
    }

    fn format(&self, cell: &Cell<'_>) -> String {
        match cell {
            Cell::Text(s) => s.to_string(),
            Cell::Vst(vst) => format!(
                "{:.precision$}",
                vst.unwrap_or(self.na_value),
                precision = self.precision
            ),
        }
    }
}

/// An error associated with writing a region Vst table.
#[derive(Debug)]
pub enum Error {
    /// A row has the wrong number of cells.
    ColumnCount {
        /// Number of columns in the schema.
        expected: usize,
        /// Number of cells in the row.
        found: usize,
    },
    /// A cell has the wrong kind for its column.
    ColumnKind {
        /// Column name.
        column: String,
        /// Kind declared by the schema.
        expected: Kind,
        /// Kind of the cell.
        found: Kind,
    },
    /// Error writing delimited output.
    Csv(csv::Error),
    /// I/O error.
    Io(io::Error),
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ColumnCount { expected, found } => {
                write!(f, "expected {expected} output columns, found {found}")
            }
            Error::ColumnKind {
                column,
                expected,
                found,
            } => write!(
                f,
                "expected {expected} value in output column '{column}', found {found}"
            ),
            Error::Csv(e) => write!(f, "{e}"),
            Error::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{aggregate::Summary, group::Groups, region::Region};

    fn region_vst(identifier: &str, pairwise: Vec<Option<f64>>, summary: Summary) -> RegionVst {
        RegionVst {
            region: Region::from(identifier),
            summary,
            pairwise,
        }
    }

    fn write(writer: Writer<Vec<u8>>, regions: &[RegionVst]) -> Result<String, Error> {
        let mut writer = writer;
        writer.write_all(regions)?;

        let bytes = writer
            .inner
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?;

        Ok(String::from_utf8(bytes).unwrap())
    }

    #[test]
    fn test_schema() {
        let pairs = Groups::from_iter(["A", "B", "C"]).pairs();

        assert_eq!(
            Schema::new(&pairs).names().collect::<Vec<_>>(),
            [
                "chr", "start", "end", "name", "max_vst", "mean_vst", "A_B", "A_C", "B_C"
            ]
        );
    }

    #[test]
    fn test_write() -> Result<(), Error> {
        let pairs = Groups::from_iter(["A", "B", "C"]).pairs();
        let regions = [region_vst(
            "chr1_100_200_my_region",
            vec![Some(0.5), None, Some(0.25)],
            Summary {
                max: Some(0.5),
                mean: Some(0.375),
            },
        )];

        let s = write(Writer::new(Vec::new(), Schema::new(&pairs)), &regions)?;

        let expected = "\
chr\tstart\tend\tname\tmax_vst\tmean_vst\tA_B\tA_C\tB_C
chr1\t100\t200\tmy_region\t0.500000\t0.375000\t0.500000\tNaN\t0.250000
";
        assert_eq!(s, expected);

        Ok(())
    }

    #[test]
    fn test_write_precision_and_na_value() -> Result<(), Error> {
        let pairs = Groups::from_iter(["A", "B"]).pairs();
        let regions = [region_vst("chr2_1_2", vec![None], Summary::default())];

        let writer = Writer::new(Vec::new(), Schema::new(&pairs))
            .set_precision(2)
            .set_na_value(-1.0);
        let s = write(writer, &regions)?;

        let expected = "\
chr\tstart\tend\tname\tmax_vst\tmean_vst\tA_B
chr2\t1\t2\t\t-1.00\t-1.00\t-1.00
";
        assert_eq!(s, expected);

        Ok(())
    }

    #[test]
    fn test_write_column_count_mismatch() {
        let pairs = Groups::from_iter(["A", "B"]).pairs();
        let regions = [region_vst("chr2_1_2", vec![None, None], Summary::default())];

        let result = write(Writer::new(Vec::new(), Schema::new(&pairs)), &regions);

        assert!(matches!(
            result,
            Err(Error::ColumnCount {
                expected: 7,
                found: 8
            })
        ));
    }

    #[test]
    fn test_output_new_stdout() {
        assert_eq!(Output::new("-"), Output::Stdout);
        assert_eq!(Output::new("out.tsv").as_path(), Some(Path::new("out.tsv")));
    }
}
