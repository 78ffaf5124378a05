//! Preview a CSV file of books.

mod cli;
mod table;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::{cli::Cli, table::BookTable};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let delimiter = match cli.delimiter_byte() {
        Ok(delimiter) => delimiter,
        Err(e) => {
            eprintln!("Error loading CSV: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match BookTable::load(&cli.path, delimiter) {
        Ok(table) => {
            println!("{}", table.preview(cli.rows));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error loading CSV: {}", e);
            ExitCode::FAILURE
        }
    }
}
