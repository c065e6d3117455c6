#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Copy-number differentiation between groups across genomic regions.
//!
//! This serves as the core library implementation for the `vst` CLI, but can also be used as a
//! free-standing library.
//!
//! # Overview
//!
//! The statistic at the heart of the crate is [`Vst`], a variance-based measure of how strongly
//! copy-number differs between two groups. A long-format [`Table`] associates regions, group
//! labels and copy-numbers, and an [`Aggregator`] calculates Vst for every pair of [`Groups`]
//! within each region.
//!
//! # Example
//!
//! ```
//! use vst_core::{
//!     table::{Builder, Columns},
//!     Aggregator, Groups,
//! };
//!
//! let raw = "\
//! region\tpop\tcn
//! chr1_100_200_dup\tA\t1
//! chr1_100_200_dup\tA\t2
//! chr1_100_200_dup\tB\t5
//! chr1_100_200_dup\tB\t6
//! ";
//!
//! let table = Builder::new(Columns::new("region", "pop", "cn"))
//!     .read(raw.as_bytes())
//!     .expect("valid table");
//!
//! let aggregator = Aggregator::new(Groups::from_records(&table)).set_size_threshold(4);
//! let regions = aggregator.aggregate(&table);
//!
//! // Within-group variance is 0.25, and total variance is 4.25
//! let vst = regions[0].pairwise[0].expect("vst defined");
//! assert!((vst - 4.0 / 4.25).abs() < 1e-12);
//! ```

#[cfg(test)]
#[macro_use]
pub(crate) mod approx;

pub mod aggregate;
pub use aggregate::{Aggregator, Reduction, RegionVst};

pub mod group;
pub use group::Groups;

pub mod input;
pub use input::Input;

pub mod output;
pub use output::Output;

pub mod region;
pub use region::Region;

pub mod table;
pub use table::Table;

pub mod vst;
pub use vst::Vst;
