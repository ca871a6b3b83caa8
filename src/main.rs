//! pqscan command line interface.

mod logging;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pqscan::{CancelToken, ParquetReader, ReadError};

#[derive(Parser)]
#[command(name = "pqscan")]
#[command(about = "Minimal Parquet reader: structure inspection and streaming column sums")]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the file structure (schema, row groups, column chunks, pages) as JSON
    Inspect {
        /// File path of the parquet file to inspect
        #[arg(long)]
        path: PathBuf,
    },

    /// Sum every value of an INT64 column across the file
    #[command(name = "sum-int64")]
    SumInt64 {
        /// File path of the parquet file to read
        #[arg(long)]
        path: PathBuf,

        /// Dotted path of the INT64 column to sum (e.g. `user.id`)
        #[arg(long)]
        field: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(1)
        }
    }
}

fn run(command: Commands) -> Result<(), ReadError> {
    let token = CancelToken::new();
    match command {
        Commands::Inspect { path } => {
            let reader = ParquetReader::open(open_file(&path)?, &token)?;
            let rendered = serde_json::to_string_pretty(reader.metadata()).map_err(|e| {
                ReadError::Format(format!("failed to render inspection result: {e}"))
            })?;
            println!("{rendered}");
        }
        Commands::SumInt64 { path, field } => {
            let mut reader = ParquetReader::open(open_file(&path)?, &token)?;
            let sum = reader.sum_int64(&field, &token)?;
            println!("Sum: {sum}");
        }
    }
    Ok(())
}

fn open_file(path: &Path) -> Result<File, ReadError> {
    File::open(path).map_err(|e| {
        ReadError::Io(e).context(format!("failed to open parquet file {}", path.display()))
    })
}
