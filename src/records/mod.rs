use std::cmp::Ordering;
use std::fmt;
use std::io::Write;
use std::path::Path;

use crate::error::{Context, Result};

pub mod rows;

pub use rows::{Bar, Greeks, OptionBar, OptionHistoryRow, OptionQuote, QuoteRow, Row, StockQuote};

/// Ordered rows sharing one schema. The header comes from the row type, so a
/// table with zero rows still knows its columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    rows: Vec<R>,
}

impl<R: Row> Table<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }

    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        R::COLUMNS
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    /// Concatenate tables in the order given. Zero tables yield an empty table.
    pub fn concat<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = Table<R>>,
    {
        let mut rows = Vec::new();
        for table in tables {
            rows.extend(table.rows);
        }
        Self { rows }
    }

    /// Re-shape every row into another schema, keeping row order.
    pub fn project<T, F>(&self, f: F) -> Table<T>
    where
        T: Row,
        F: FnMut(&R) -> T,
    {
        Table {
            rows: self.rows.iter().map(f).collect(),
        }
    }

    /// Stable sort; rows comparing equal keep their current relative order.
    pub fn sorted_by<F>(mut self, compare: F) -> Self
    where
        F: FnMut(&R, &R) -> Ordering,
    {
        self.rows.sort_by(compare);
        self
    }

    /// Stable sort by `(date, symbol)`.
    pub fn sorted_by_date_then_symbol(self) -> Self {
        self.sorted_by(|a, b| {
            a.date()
                .cmp(&b.date())
                .then_with(|| a.symbol().cmp(b.symbol()))
        })
    }

    /// Stable sort by `(symbol, date)`.
    pub fn sorted_by_symbol_then_date(self) -> Self {
        self.sorted_by(|a, b| {
            a.symbol()
                .cmp(b.symbol())
                .then_with(|| a.date().cmp(&b.date()))
        })
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(R::COLUMNS)?;
        for row in &self.rows {
            writer.write_record(row.cells())?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer)
            .context("CSV output was not valid UTF-8")
            .map_err(Into::into)
    }

    /// Persist the table to disk as CSV, header row included.
    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
        self.write_csv(file)
    }
}

impl<R: Row> Default for Table<R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<R: Row> FromIterator<R> for Table<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<R> IntoIterator for Table<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<R: Row> fmt::Display for Table<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self.rows.iter().map(Row::cells).collect();
        let mut widths: Vec<usize> = R::COLUMNS.iter().map(|name| name.len()).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header: Vec<String> = R::COLUMNS
            .iter()
            .zip(&widths)
            .map(|(name, &width)| format!("{name:>width$}"))
            .collect();
        writeln!(f, "{}", header.join("  "))?;

        for row in &cells {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:>width$}"))
                .collect();
            writeln!(f, "{}", line.join("  "))?;
        }

        write!(f, "[{} rows x {} columns]", self.rows.len(), R::COLUMNS.len())
    }
}
