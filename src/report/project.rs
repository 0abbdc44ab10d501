//! Declarative record-to-table projection.
//!
//! Every report is the same operation: project a slice of records through
//! an ordered list of columns, where each column pairs a header with an
//! extractor that null-coalesces optional fields into an empty cell. The
//! per-report differences live entirely in the column lists.

use super::table::{Cell, Table};

/// One output column: a header and an extractor.
pub struct Column<'a, T> {
    header: String,
    extract: Box<dyn Fn(&T) -> Cell + 'a>,
}

impl<'a, T> Column<'a, T> {
    /// Define a column.
    pub fn new(header: &str, extract: impl Fn(&T) -> Cell + 'a) -> Self {
        Self {
            header: header.to_string(),
            extract: Box::new(extract),
        }
    }
}

/// An ordered column set defining one report type.
pub struct Projection<'a, T> {
    columns: Vec<Column<'a, T>>,
}

impl<'a, T> Projection<'a, T> {
    /// Build a projection from its columns.
    pub fn new(columns: Vec<Column<'a, T>>) -> Self {
        Self { columns }
    }

    /// Project records into a table.
    ///
    /// Row 0 is the header; every data row has exactly one cell per column.
    pub fn table<'b, I>(&self, records: I) -> Table
    where
        I: IntoIterator<Item = &'b T>,
        T: 'b,
    {
        let mut table = Table::new(self.columns.iter().map(|c| c.header.clone()));

        for record in records {
            let row = self.columns.iter().map(|c| (c.extract)(record)).collect();
            table.push(row);
        }

        table
    }
}
