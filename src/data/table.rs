//! Tab-separated result tables with named columns.

use crate::error::{ErmineError, Result};
use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Direction for [`ResultTable::sort_by_numeric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// An in-memory table with one row per gene-set term (or probe).
///
/// Cells are kept as text and parsed on demand, so identifier and name
/// columns survive untouched while numeric columns can still be sorted
/// and filtered. Every row has exactly one cell per column.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ResultTable {
    /// Create a table, checking that every row matches the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(ErmineError::EmptyData("Table has no columns".to_string()));
        }
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(ErmineError::RaggedRow {
                    row: row_idx,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Load a table from a TSV file whose first row names the columns.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse tab-separated text whose first row names the columns.
    ///
    /// Rows shorter than the header are padded with empty cells, which read
    /// as NaN. Rows wider than the header are an error.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|s| s.to_string())
            .collect();
        if columns.is_empty() || (columns.len() == 1 && columns[0].is_empty()) {
            return Err(ErmineError::EmptyData("Empty TSV file".to_string()));
        }

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            if row.len() < columns.len() {
                row.resize(columns.len(), String::new());
            }
            rows.push(row);
        }

        Self::new(columns, rows)
    }

    /// Write the table to a TSV file, header first.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.to_writer(BufWriter::new(file))
    }

    /// Write the table as tab-separated text, header first.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Column names in file order.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in current order.
    #[inline]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Position of a named column.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ErmineError::MissingColumn(name.to_string()))
    }

    /// Text of a single cell.
    pub fn cell(&self, row: usize, column: &str) -> Result<&str> {
        let col_idx = self.column_index(column)?;
        self.rows
            .get(row)
            .map(|r| r[col_idx].as_str())
            .ok_or_else(|| ErmineError::EmptyData(format!("No row at index {}", row)))
    }

    /// Numeric value of a single cell.
    pub fn numeric_cell(&self, row: usize, column: &str) -> Result<f64> {
        let text = self.cell(row, column)?;
        parse_numeric(text, row, column)
    }

    /// Text values of a column in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let col_idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| r[col_idx].as_str()).collect())
    }

    /// Parse a column as `f64`. Empty and `NA` cells become NaN.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let col_idx = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row_idx, r)| parse_numeric(&r[col_idx], row_idx, name))
            .collect()
    }

    /// Stable sort by a numeric column. NaN values always sort last.
    pub fn sort_by_numeric(&mut self, column: &str, order: SortOrder) -> Result<()> {
        let keys = self.numeric_column(column)?;
        let mut keyed: Vec<(f64, Vec<String>)> =
            keys.into_iter().zip(std::mem::take(&mut self.rows)).collect();
        keyed.sort_by(|a, b| compare_keys(a.0, b.0, order));
        self.rows = keyed.into_iter().map(|(_, row)| row).collect();
        Ok(())
    }

    /// Consuming variant of [`sort_by_numeric`](Self::sort_by_numeric).
    pub fn sorted_by_numeric(mut self, column: &str, order: SortOrder) -> Result<Self> {
        self.sort_by_numeric(column, order)?;
        Ok(self)
    }

    /// Keep rows whose numeric value in `column` satisfies the predicate.
    pub fn filter_numeric<F>(&self, column: &str, predicate: F) -> Result<Self>
    where
        F: Fn(f64) -> bool,
    {
        let values = self.numeric_column(column)?;
        let rows = self
            .rows
            .iter()
            .zip(values)
            .filter(|(_, v)| predicate(*v))
            .map(|(row, _)| row.clone())
            .collect();
        Ok(Self {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Project onto the named columns, in the given order.
    pub fn select(&self, columns: &[&str]) -> Result<Self> {
        let indices = columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Result<Vec<_>>>()?;
        let rows = self
            .rows
            .iter()
            .map(|r| indices.iter().map(|&i| r[i].clone()).collect())
            .collect();
        Ok(Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        })
    }

    /// Append a column. Replaces an existing column of the same name.
    pub fn push_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(ErmineError::RaggedRow {
                row: values.len().min(self.rows.len()),
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        match self.columns.iter().position(|c| c == name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }
}

fn parse_numeric(text: &str, row: usize, column: &str) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("nan")
    {
        return Ok(f64::NAN);
    }
    trimmed.parse::<f64>().map_err(|_| ErmineError::InvalidValue {
        value: text.to_string(),
        row,
        column: column.to_string(),
    })
}

fn compare_keys(a: f64, b: f64, order: SortOrder) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        }
    }
}
