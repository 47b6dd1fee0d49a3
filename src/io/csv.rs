//! CSV ingestion of the raw recording.
//!
//! The raw export comes in two dialects: comma-delimited with `.` decimals,
//! and semicolon-delimited with `,` decimals. The delimiter is detected from
//! the header line and decimal commas are normalized when the semicolon
//! dialect is in use.
//!
//! Missing-value markers (`""`, `NA`, `#DIV/0!`) parse to NaN; any other
//! non-numeric feature cell is an error with row/column context.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use log::{debug, info};

use crate::dataset::{ActivityClass, DatasetError};

// =============================================================================
// RawTable
// =============================================================================

/// The raw recording, column-major, before any cleaning.
///
/// Every non-label column is stored as a named f32 column with NaN for
/// missing cells. The label column is parsed to class indices up front so
/// cleaning can never drop it.
#[derive(Clone, Debug)]
pub struct RawTable {
    names: Vec<String>,
    columns: Vec<Vec<f32>>,
    labels: Vec<u32>,
}

impl RawTable {
    /// Build a table from pre-parsed columns. Panics on ragged input;
    /// intended for tests and synthetic data.
    pub fn from_columns(names: Vec<String>, columns: Vec<Vec<f32>>, labels: Vec<u32>) -> Self {
        assert_eq!(names.len(), columns.len(), "one name per column");
        for col in &columns {
            assert_eq!(col.len(), labels.len(), "column length mismatch");
        }
        Self {
            names,
            columns,
            labels,
        }
    }

    /// Number of data rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.labels.len()
    }

    /// Number of non-label columns.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column header.
    #[inline]
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    /// All column headers in file order.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// One column's values (NaN = missing).
    #[inline]
    pub fn column(&self, index: usize) -> &[f32] {
        &self.columns[index]
    }

    /// Class indices, one per row.
    #[inline]
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Markers the export uses for missing cells.
const MISSING_MARKERS: [&str; 2] = ["NA", "#DIV/0!"];

/// Read the raw CSV export.
///
/// `label_column` names the class column (`"classe"` in the reference
/// export); it may appear anywhere in the header.
pub fn read_raw_csv(path: &Path, label_column: &str) -> Result<RawTable, DatasetError> {
    let mut file = File::open(path)?;
    let delimiter = detect_delimiter(&mut file)?;
    file.seek(SeekFrom::Start(0))?;

    let decimal_comma = delimiter == b';';
    debug!(
        "reading {} (delimiter {:?}, decimal comma: {decimal_comma})",
        path.display(),
        delimiter as char
    );

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let label_idx = headers
        .iter()
        .position(|h| h == label_column)
        .ok_or_else(|| DatasetError::MissingLabelColumn {
            name: label_column.to_string(),
        })?;

    let names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != label_idx)
        .map(|(_, h)| h.clone())
        .collect();

    let mut columns: Vec<Vec<f32>> = vec![Vec::new(); names.len()];
    let mut labels: Vec<u32> = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = row_no + 1;
        let record = result?;
        if record.len() != headers.len() {
            return Err(DatasetError::RaggedRow {
                row,
                expected: headers.len(),
                got: record.len(),
            });
        }

        let raw_label = record.get(label_idx).unwrap_or("");
        let class: ActivityClass =
            raw_label
                .parse()
                .map_err(|()| DatasetError::UnknownClassLabel {
                    row,
                    value: raw_label.to_string(),
                })?;
        labels.push(class.index());

        let mut out_col = 0;
        for (col_idx, cell) in record.iter().enumerate() {
            if col_idx == label_idx {
                continue;
            }
            let value = parse_cell(cell, decimal_comma).ok_or_else(|| {
                DatasetError::InvalidNumber {
                    row,
                    column: headers[col_idx].clone(),
                    value: cell.to_string(),
                }
            })?;
            columns[out_col].push(value);
            out_col += 1;
        }
    }

    if labels.is_empty() {
        return Err(DatasetError::EmptyTable);
    }

    info!(
        "loaded {} rows x {} columns (+ label '{label_column}')",
        labels.len(),
        names.len()
    );
    Ok(RawTable {
        names,
        columns,
        labels,
    })
}

/// Parse one feature cell. `None` means the cell is not numeric and not a
/// recognized missing marker.
fn parse_cell(cell: &str, decimal_comma: bool) -> Option<f32> {
    let cell = cell.trim();
    if cell.is_empty() || MISSING_MARKERS.contains(&cell) {
        return Some(f32::NAN);
    }
    if decimal_comma {
        cell.replace(',', ".").parse().ok()
    } else {
        cell.parse().ok()
    }
}

/// Pick the delimiter from the header line: semicolon dialect if any `;`
/// appears, comma otherwise.
fn detect_delimiter(file: &mut File) -> Result<u8, DatasetError> {
    let mut header = String::new();
    BufReader::new(file).read_line(&mut header)?;
    if header.contains(';') {
        Ok(b';')
    } else {
        Ok(b',')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_comma_dialect() {
        let path = write_temp(
            "stance_io_comma.csv",
            "x1,x2,classe\n1.5,2.0,sitting\n3.0,NA,walking\n",
        );
        let table = read_raw_csv(&path, "classe").unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.n_columns(), 2);
        assert_eq!(table.names(), &["x1".to_string(), "x2".to_string()]);
        assert_eq!(table.column(0), &[1.5, 3.0]);
        assert!(table.column(1)[1].is_nan());
        assert_eq!(table.labels(), &[0, 4]);
    }

    #[test]
    fn reads_semicolon_dialect_with_decimal_commas() {
        let path = write_temp(
            "stance_io_semi.csv",
            "x1;classe\n1,25;standing\n-0,5;sitting\n",
        );
        let table = read_raw_csv(&path, "classe").unwrap();
        assert_eq!(table.column(0), &[1.25, -0.5]);
        assert_eq!(table.labels(), &[2, 0]);
    }

    #[test]
    fn label_column_anywhere() {
        let path = write_temp(
            "stance_io_label_first.csv",
            "classe,x1\nwalking,7.0\n",
        );
        let table = read_raw_csv(&path, "classe").unwrap();
        assert_eq!(table.n_columns(), 1);
        assert_eq!(table.column(0), &[7.0]);
        assert_eq!(table.labels(), &[4]);
    }

    #[test]
    fn missing_markers_become_nan() {
        let path = write_temp(
            "stance_io_missing.csv",
            "x1,x2,classe\n#DIV/0!,,sitting\n",
        );
        let table = read_raw_csv(&path, "classe").unwrap();
        assert!(table.column(0)[0].is_nan());
        assert!(table.column(1)[0].is_nan());
    }

    #[test]
    fn unknown_label_is_an_error() {
        let path = write_temp("stance_io_badlabel.csv", "x1,classe\n1.0,jogging\n");
        let err = read_raw_csv(&path, "classe").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::UnknownClassLabel { row: 1, .. }
        ));
    }

    #[test]
    fn non_numeric_cell_is_an_error() {
        let path = write_temp("stance_io_badcell.csv", "x1,classe\nabc,sitting\n");
        let err = read_raw_csv(&path, "classe").unwrap_err();
        match err {
            DatasetError::InvalidNumber { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "x1");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ragged_row_is_an_error() {
        let path = write_temp("stance_io_ragged.csv", "x1,x2,classe\n1.0,sitting\n");
        let err = read_raw_csv(&path, "classe").unwrap_err();
        assert!(matches!(err, DatasetError::RaggedRow { row: 1, .. }));
    }

    #[test]
    fn missing_label_column_is_an_error() {
        let path = write_temp("stance_io_nolabel.csv", "x1,x2\n1.0,2.0\n");
        let err = read_raw_csv(&path, "classe").unwrap_err();
        assert!(matches!(err, DatasetError::MissingLabelColumn { .. }));
    }

    #[test]
    fn empty_table_is_an_error() {
        let path = write_temp("stance_io_empty.csv", "x1,classe\n");
        let err = read_raw_csv(&path, "classe").unwrap_err();
        assert!(matches!(err, DatasetError::EmptyTable));
    }
}
