//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

/// Load a CSV file of books and print a preview of its structure.
#[derive(Parser, Debug)]
#[command(name = "book-loader", version)]
pub struct Cli {
    /// CSV file to read (UTF-8).
    #[arg(default_value = "books.csv")]
    pub path: PathBuf,

    /// Number of records to show.
    #[arg(long, short = 'n', default_value_t = 5)]
    pub rows: usize,

    /// Field delimiter.
    #[arg(long, short, default_value_t = ',')]
    pub delimiter: char,
}

impl Cli {
    /// The delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8, String> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                format!(
                    "delimiter must be a single ASCII character, got {:?}",
                    self.delimiter
                )
            })
    }
}
