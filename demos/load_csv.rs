//! Simple CLI tool to test chunked reading and schema inference
//!
//! Usage:
//!   cargo run --example load_csv -- --file cities.csv --delimiter ,
//!   cargo run --example load_csv -- --file data.tsv --dialect postgres --chunk-size 5000

use std::path::PathBuf;

use anyhow::{Context, bail};
use sqlstage::{ChunkedReader, Dialect, ReaderConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();

    let mut file: Option<PathBuf> = None;
    let mut delimiter = '\t';
    let mut dialect = Dialect::Sqlite;
    let mut chunk_size: Option<usize> = None;

    // Simple argument parsing
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--file" | "-f" => {
                if i + 1 < args.len() {
                    file = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    bail!("--file requires a value");
                }
            }
            "--delimiter" | "-d" => {
                if i + 1 < args.len() {
                    delimiter = args[i + 1]
                        .chars()
                        .next()
                        .context("--delimiter requires a single character")?;
                    i += 2;
                } else {
                    bail!("--delimiter requires a value");
                }
            }
            "--dialect" => {
                if i + 1 < args.len() {
                    dialect = args[i + 1].parse()?;
                    i += 2;
                } else {
                    bail!("--dialect requires a value");
                }
            }
            "--chunk-size" => {
                if i + 1 < args.len() {
                    chunk_size = Some(args[i + 1].parse().context("invalid chunk size")?);
                    i += 2;
                } else {
                    bail!("--chunk-size requires a value");
                }
            }
            other => bail!("unknown argument: {other}"),
        }
    }

    let Some(path) = file else {
        eprintln!("Usage: load_csv --file <path> [--delimiter <char>] [--dialect sqlite|postgres] [--chunk-size <n>]");
        std::process::exit(1);
    };

    let table_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("table")
        .to_string();

    let mut builder = ReaderConfig::builder()
        .table_name(table_name.as_str())
        .delimiter(delimiter)
        .dialect(dialect);
    if let Some(size) = chunk_size {
        builder = builder.chunk_size(size);
    }

    let reader = ChunkedReader::from_path(&path, builder.build())
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut total_rows = 0usize;
    let mut schema: Option<Vec<(String, String)>> = None;

    for fragment in reader {
        let table = fragment?;
        if schema.is_none() {
            schema = Some(
                table
                    .column_names()
                    .iter()
                    .cloned()
                    .zip(table.column_types().iter().cloned())
                    .collect(),
            );
            println!("{table}");
        }
        total_rows += table.len();
    }

    match schema {
        Some(columns) => {
            println!("\nCREATE TABLE {table_name} (");
            for (i, (name, col_type)) in columns.iter().enumerate() {
                let comma = if i + 1 < columns.len() { "," } else { "" };
                println!("    {name} {col_type}{comma}");
            }
            println!(");");
            println!("\n{total_rows} rows in {}", path.display());
        }
        None => println!("no data rows in {}", path.display()),
    }

    Ok(())
}
