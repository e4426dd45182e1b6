use std::fs::File;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PlotError, PlotResult};

/// One value of a tabular dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Parses a raw field: blanks and `nan` are missing, numbers are numbers,
    /// everything else stays text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return Self::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(value) => Self::Number(value),
            Err(_) => Self::Text(trimmed.to_owned()),
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) if !value.is_nan() => Some(*value),
            _ => None,
        }
    }

    /// Display text used for category labels.
    #[must_use]
    pub fn to_label(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text.clone(),
            Self::Missing => String::new(),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Self::Missing
        } else {
            Self::Number(value)
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Ordered rows with ordered named columns.
///
/// By convention the first column holds group labels and the remaining
/// columns hold numeric series; column order defines color order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    headers: Vec<String>,
    index: IndexMap<String, usize>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    #[must_use]
    pub fn from_rows<I, S>(headers: I, rows: Vec<Vec<Cell>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let mut index = IndexMap::with_capacity(headers.len());
        for (position, header) in headers.iter().enumerate() {
            index.entry(header.clone()).or_insert(position);
        }
        Self {
            headers,
            index,
            rows,
        }
    }

    /// Builds a label-plus-series table, one `(label, values)` pair per row.
    #[must_use]
    pub fn from_labeled_rows(headers: &[&str], rows: &[(&str, &[f64])]) -> Self {
        let rows = rows
            .iter()
            .map(|(label, values)| {
                std::iter::once(Cell::from(*label))
                    .chain(values.iter().copied().map(Cell::from))
                    .collect()
            })
            .collect();
        Self::from_rows(headers.iter().copied(), rows)
    }

    /// Builds a table from numeric columns of possibly different lengths;
    /// shorter columns are padded with missing cells.
    #[must_use]
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Self {
        let height = columns
            .iter()
            .map(|(_, values)| values.len())
            .max()
            .unwrap_or(0);
        let rows = (0..height)
            .map(|row| {
                columns
                    .iter()
                    .map(|(_, values)| values.get(row).copied().map_or(Cell::Missing, Cell::from))
                    .collect()
            })
            .collect();
        Self::from_rows(columns.into_iter().map(|(name, _)| name), rows)
    }

    /// Reads delimited text whose first record is the header row.
    ///
    /// Ragged records are kept as-is; consumers pair values zip-style.
    pub fn from_reader<R: Read>(reader: R) -> PlotResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(str::to_owned)
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(Cell::parse).collect());
        }

        let table = Self::from_rows(headers, rows);
        debug!(
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded table"
        );
        Ok(table)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> PlotResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| PlotError::io(path, err))?;
        Self::from_reader(file)
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of series columns after the label column.
    #[must_use]
    pub fn series_count(&self) -> usize {
        self.column_count().saturating_sub(1)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    /// First column rendered as text, one label per row.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|cells| cells.first().map(Cell::to_label).unwrap_or_default())
            .collect()
    }

    /// Column values with missing or non-numeric cells as NaN.
    #[must_use]
    pub fn numeric_column(&self, column: usize) -> Vec<f64> {
        self.rows
            .iter()
            .map(|cells| {
                cells
                    .get(column)
                    .and_then(Cell::as_f64)
                    .unwrap_or(f64::NAN)
            })
            .collect()
    }

    /// Values of one row after its label cell, NaN for non-numeric cells.
    #[must_use]
    pub fn row_values(&self, row: usize) -> Vec<f64> {
        self.rows
            .get(row)
            .map(|cells| {
                cells
                    .iter()
                    .skip(1)
                    .map(|cell| cell.as_f64().unwrap_or(f64::NAN))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, Table};

    #[test]
    fn cell_parse_classifies_fields() {
        assert_eq!(Cell::parse(" 1.5 "), Cell::Number(1.5));
        assert_eq!(Cell::parse("W1"), Cell::Text("W1".to_owned()));
        assert_eq!(Cell::parse(""), Cell::Missing);
        assert_eq!(Cell::parse("NaN"), Cell::Missing);
    }

    #[test]
    fn reader_keeps_column_order() {
        let csv = "label,b,a\nW1,1,2\nW2,3,4\n";
        let table = Table::from_reader(csv.as_bytes()).expect("table");
        assert_eq!(table.headers(), ["label", "b", "a"]);
        assert_eq!(table.column_index("a"), Some(2));
        assert_eq!(table.labels(), vec!["W1", "W2"]);
        assert_eq!(table.row_values(1), vec![3.0, 4.0]);
        assert_eq!(table.series_count(), 2);
    }

    #[test]
    fn ragged_rows_are_kept() {
        let csv = "label,a,b\nW1,1\nW2,3,4\n";
        let table = Table::from_reader(csv.as_bytes()).expect("table");
        assert_eq!(table.row_values(0), vec![1.0]);
        assert!(table.numeric_column(2)[0].is_nan());
    }

    #[test]
    fn columns_of_different_length_are_padded() {
        let table = Table::from_columns(vec![
            ("A".to_owned(), vec![1.0, 2.0, 3.0]),
            ("B".to_owned(), vec![4.0]),
        ]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell(2, 1), Some(&Cell::Missing));
    }
}
