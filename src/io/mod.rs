//! Raw-input ingestion.
//!
//! Reads the raw recording export into a [`RawTable`], the column-major
//! pre-cleaning form that [`clean`](crate::clean) consumes. The only
//! supported input is the CSV export; see [`read_raw_csv`].

mod csv;

pub use csv::{read_raw_csv, RawTable};
