//! Table output.
//!
//! Reports render into named tabs through the [`TableSink`] trait; the
//! shipped implementation is a CSV workbook, a directory where each tab is
//! one CSV file. A tab is cleared and rewritten in a single operation, so a
//! failed report run never leaves a half-written tab behind.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::report::Table;

/// Errors that can occur while writing tables.
#[derive(Debug, Error)]
pub enum SheetError {
    /// The workbook directory could not be created.
    #[error("failed to create workbook directory '{0}': {1}")]
    CreateDir(PathBuf, std::io::Error),

    /// A tab file could not be written.
    #[error("failed to write tab '{0}': {1}")]
    Write(String, std::io::Error),
}

/// Result type for sheet operations.
pub type Result<T> = std::result::Result<T, SheetError>;

/// A destination for report tables.
///
/// A sink fully overwrites the named tab with the given table; a missing
/// tab is always created.
pub trait TableSink {
    /// Clear the tab and write the table into it.
    fn write_tab(&mut self, tab: &str, table: &Table) -> Result<()>;
}

/// A workbook directory holding one CSV file per tab.
#[derive(Debug, Clone)]
pub struct CsvWorkbook {
    dir: PathBuf,
}

impl CsvWorkbook {
    /// Create a workbook rooted at the given directory.
    ///
    /// The directory itself is created lazily on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The file path backing a tab.
    fn tab_path(&self, tab: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", tab))
    }
}

impl TableSink for CsvWorkbook {
    fn write_tab(&mut self, tab: &str, table: &Table) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| SheetError::CreateDir(self.dir.clone(), e))?;

        let path = self.tab_path(tab);
        let (rows, columns) = table.dim();
        debug!(tab = %tab, rows, columns, "Writing tab");

        let rendered = render_csv(table);
        fs::write(&path, rendered).map_err(|e| SheetError::Write(tab.to_string(), e))?;

        info!(tab = %tab, path = %path.display(), "Tab written");
        Ok(())
    }
}

/// Render the whole table as CSV text.
///
/// Rows are padded to the covering rectangle, so a ragged table still
/// produces a uniform grid.
fn render_csv(table: &Table) -> String {
    let columns = table.column_count();
    let mut lines = Vec::with_capacity(table.row_count());

    let header = pad_line(table.header().iter().map(|h| csv_escape(h)), columns);
    lines.push(header);

    for row in table.rows() {
        let line = pad_line(row.iter().map(|c| csv_escape(&c.to_string())), columns);
        lines.push(line);
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Join escaped cells, padding the line to the given width.
fn pad_line(cells: impl Iterator<Item = String>, columns: usize) -> String {
    let mut cells: Vec<String> = cells.collect();
    cells.resize(columns, String::new());
    cells.join(",")
}

/// Quote a CSV cell when it contains a delimiter, quote, or line break.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
