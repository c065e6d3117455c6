//! Long-format copy-number tables.
//!
//! A table has one row per observation, associating a region, a group label and a copy-number.
//! Columns are identified by name in a header line, and rows are tab-delimited. Column names are
//! resolved against the header once, so that a missing column is reported before any row is
//! read.

use std::{fmt, io};

pub mod filter;
pub use filter::{Contig, Filter};

pub mod na;
pub use na::NaValue;

use crate::Input;

/// Default name of the contig column.
pub const DEFAULT_CONTIG_COLUMN: &str = "chr";

/// Default name of the sex column.
pub const DEFAULT_SEX_COLUMN: &str = "sex";

/// Names of the columns to read from a table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Columns {
    region: String,
    group: String,
    copy_number: String,
    contig: String,
    sex: String,
}

impl Columns {
    /// Creates new column names with the default contig and sex columns.
    pub fn new<S>(region: S, group: S, copy_number: S) -> Self
    where
        S: ToString,
    {
        Self {
            region: region.to_string(),
            group: group.to_string(),
            copy_number: copy_number.to_string(),
            contig: DEFAULT_CONTIG_COLUMN.to_string(),
            sex: DEFAULT_SEX_COLUMN.to_string(),
        }
    }

    /// Sets the name of the contig column.
    pub fn set_contig<S>(mut self, contig: S) -> Self
    where
        S: ToString,
    {
        self.contig = contig.to_string();
        self
    }

    /// Sets the name of the sex column.
    pub fn set_sex<S>(mut self, sex: S) -> Self
    where
        S: ToString,
    {
        self.sex = sex.to_string();
        self
    }

    fn resolve(&self, header: &csv::StringRecord, filter: &Filter) -> Result<Indices, Error> {
        let find = |name: &str| header.iter().position(|column| column == name);
        let require = |name: &str| find(name).ok_or_else(|| Error::missing_column(name));

        let contig = if filter.contig().is_some() {
            let contig = find(self.contig.as_str());
            if contig.is_none() {
                log::debug!(
                    "Contig column '{}' not found, rows will not be checked against contig.",
                    self.contig
                );
            }
            contig
        } else {
            None
        };

        let sex = if filter.requires_sex() {
            Some(require(self.sex.as_str())?)
        } else {
            None
        };

        Ok(Indices {
            region: require(self.region.as_str())?,
            group: require(self.group.as_str())?,
            copy_number: require(self.copy_number.as_str())?,
            contig,
            sex,
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Indices {
    region: usize,
    group: usize,
    copy_number: usize,
    contig: Option<usize>,
    sex: Option<usize>,
}

/// A single row of a table.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// Region identifier.
    pub region: String,
    /// Group label.
    pub group: String,
    /// Copy-number, or `None` if absent.
    pub copy_number: Option<f64>,
}

impl Record {
    /// Creates a new record.
    pub fn new<S>(region: S, group: S, copy_number: Option<f64>) -> Self
    where
        S: ToString,
    {
        Self {
            region: region.to_string(),
            group: group.to_string(),
            copy_number,
        }
    }
}

/// A table of records, after filtering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Returns the records.
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl FromIterator<Record> for Table {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A table reader builder.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Builder {
    columns: Columns,
    na_value: NaValue,
    filter: Filter,
}

impl Builder {
    /// Creates a new builder reading the provided columns.
    pub fn new(columns: Columns) -> Self {
        Self {
            columns,
            na_value: NaValue::default(),
            filter: Filter::default(),
        }
    }

    /// Sets the representation of missing copy-numbers.
    ///
    /// By default, this is the token `.`.
    pub fn set_na_value(mut self, na_value: NaValue) -> Self {
        self.na_value = na_value;
        self
    }

    /// Sets the filter applied to rows.
    ///
    /// By default, all rows are retained.
    pub fn set_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Reads a table from an input source.
    pub fn read_from_input(self, input: &Input) -> Result<Table, Error> {
        self.read(input.open()?)
    }

    /// Reads a table from a reader.
    ///
    /// # Errors
    ///
    /// If a required column is missing from the header, if the input is not a well-formed
    /// delimited table, or if a copy-number cannot be decoded.
    pub fn read<R>(self, reader: R) -> Result<Table, Error>
    where
        R: io::Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(reader);

        let indices = self.columns.resolve(reader.headers()?, &self.filter)?;

        let mut records = Vec::new();
        let mut skipped = 0;
        let mut off_contig = 0;
        let mut row = csv::StringRecord::new();

        while reader.read_record(&mut row)? {
            let get = |i: Option<usize>| i.and_then(|i| row.get(i));

            if !self.filter.keep(get(indices.sex)) {
                skipped += 1;
                continue;
            }

            if !get(indices.contig).map_or(true, |contig| self.filter.is_on_contig(contig)) {
                off_contig += 1;
            }

            let raw = get(Some(indices.copy_number)).unwrap_or_default();
            let copy_number = self.na_value.decode(raw).map_err(|_| Error::InvalidCopyNumber {
                line: row.position().map(csv::Position::line),
                column: self.columns.copy_number.clone(),
                value: raw.to_string(),
            })?;

            records.push(Record {
                region: get(Some(indices.region)).unwrap_or_default().to_string(),
                group: get(Some(indices.group)).unwrap_or_default().to_string(),
                copy_number,
            });
        }

        log::info!(
            "Read {} records, skipped {skipped} records by filtering.",
            records.len()
        );

        match self.filter.contig() {
            Some(contig) if off_contig > 0 => log::warn!(
                "Found {off_contig} records not on contig '{}', these are retained.",
                contig.as_str()
            ),
            _ => (),
        }

        Ok(Table { records })
    }
}

/// An error associated with reading a table.
#[derive(Debug)]
pub enum Error {
    /// Malformed delimited input.
    Csv(csv::Error),
    /// A copy-number could not be decoded.
    InvalidCopyNumber {
        /// Line of the offending row, if known.
        line: Option<u64>,
        /// Name of the copy-number column.
        column: String,
        /// The raw cell contents.
        value: String,
    },
    /// I/O error.
    Io(io::Error),
    /// A required column is not present in the header.
    MissingColumn {
        /// Name of the missing column.
        name: String,
    },
}

impl Error {
    fn missing_column(name: &str) -> Self {
        Self::MissingColumn {
            name: name.to_string(),
        }
    }
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
            Error::Csv(e) => write!(f, "{e}"),
            Error::InvalidCopyNumber {
                line: Some(line),
                column,
                value,
            } => write!(
                f,
                "invalid copy-number '{value}' in column '{column}' on line {line}"
            ),
            Error::InvalidCopyNumber {
                line: None,
                column,
                value,
            } => write!(f, "invalid copy-number '{value}' in column '{column}'"),
            Error::Io(e) => write!(f, "{e}"),
            Error::MissingColumn { name } => write!(f, "column '{name}' not found in header"),
        }
    }
}

impl std::error::Error for Error {}
