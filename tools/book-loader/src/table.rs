//! Lenient CSV loading into an in-memory table
//!
//! The first record is the header. Records with more fields than the header
//! are skipped, records with fewer are padded with empty cells. Invalid
//! UTF-8 anywhere in the input fails the whole load.

use csv::ReaderBuilder;
use std::{fs::File, io::Read, path::Path};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("no columns to parse from file")]
    Empty,
}

/// Parsed rows under a header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Records dropped for having too many fields
    pub skipped: usize,
}

impl BookTable {
    /// Load a CSV file from disk
    pub fn load(path: &Path, delimiter: u8) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file, delimiter)
    }

    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, LoadError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(LoadError::Empty);
        }

        let mut rows = Vec::new();
        let mut skipped = 0;
        for record in reader.records() {
            let record = record?;
            if record.len() > headers.len() {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                warn!(
                    "Skipping line {}: expected {} fields, saw {}",
                    line,
                    headers.len(),
                    record.len()
                );
                skipped += 1;
                continue;
            }

            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(BookTable {
            headers,
            rows,
            skipped,
        })
    }

    /// Render the header and the first `limit` rows as an aligned text table,
    /// followed by the table's dimensions
    pub fn preview(&self, limit: usize) -> String {
        let shown = &self.rows[..limit.min(self.rows.len())];

        let index_width = shown.len().saturating_sub(1).to_string().len();
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                shown
                    .iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let format_line = |index: &str, cells: &[String]| {
            let mut line = format!("{:<index_width$}", index);
            for (cell, width) in cells.iter().zip(&widths) {
                line.push_str("  ");
                line.push_str(cell);
                line.push_str(&" ".repeat(width - cell.chars().count()));
            }
            line.trim_end().to_string()
        };

        let mut out = String::new();
        out.push_str(&format_line("", &self.headers));
        out.push('\n');
        for (index, row) in shown.iter().enumerate() {
            out.push_str(&format_line(&index.to_string(), row));
            out.push('\n');
        }
        out.push_str(&format!(
            "\n[{} rows x {} columns]",
            self.rows.len(),
            self.headers.len()
        ));
        if self.skipped > 0 {
            out.push_str(&format!("\nSkipped {} malformed lines", self.skipped));
        }
        out
    }
}
