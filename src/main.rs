//! Command-line bridge between the contract test harness and its logs.
//!
//! _Requires Cargo feature `cli`._

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use packlog::{
    avec::{
        log::Sink,
        render_row,
        text::{decode_hex, lookup, parse_tags},
    },
    schema::Dataset,
};
use tracing::info;

/// Decode packed test records and keep per-dataset logs
#[derive(Parser, Debug)]
#[command(name = "packlog")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the dataset logs
    #[arg(long, env = "PACKLOG_OUT_DIR", default_value = "test/simulations/out")]
    out_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clear dataset logs, leaving only their header rows
    Prepare {
        /// Datasets to prepare (all when omitted)
        #[arg(value_parser = parse_dataset)]
        datasets: Vec<Dataset>,
    },
    /// Decode a record and append it to its dataset's log
    Append {
        #[arg(value_parser = parse_dataset)]
        dataset: Dataset,
        /// Hex-encoded record, optionally prefixed with `0x`
        record: String,
    },
    /// Decode a record and print its row without logging it
    Decode {
        /// Registered dataset naming the record layout
        #[arg(long, value_parser = parse_dataset)]
        dataset: Option<Dataset>,
        /// Comma-separated Solidity types giving the record layout
        #[arg(
            long,
            value_delimiter = ',',
            conflicts_with = "dataset",
            required_unless_present = "dataset"
        )]
        types: Vec<String>,
        /// Hex-encoded record, optionally prefixed with `0x`
        record: String,
    },
}

fn parse_dataset(name: &str) -> Result<Dataset, String> {
    lookup(name).map_err(|err| err.to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let sink = Sink::new(&cli.out_dir);

    run(cli.command, &sink, &mut io::stdout().lock())
}

/// Execute a command against the logs of a sink, writing any output row.
fn run(command: Command, sink: &Sink, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Prepare { datasets } => {
            let datasets = if datasets.is_empty() {
                Dataset::ALL.to_vec()
            } else {
                datasets
            };

            for dataset in datasets {
                sink.prepare(dataset)
                    .with_context(|| format!("Failed to prepare the {dataset} log"))?;
            }

            info!(dir = %sink.dir().display(), "dataset logs prepared");
        }
        Command::Append { dataset, record } => {
            sink.append(dataset, &record)
                .with_context(|| format!("Failed to log a {dataset} record"))?;
        }
        Command::Decode {
            dataset,
            types,
            record,
        } => {
            let schema = match dataset {
                Some(dataset) => dataset.schema().to_vec(),
                None => parse_tags(types.iter().map(String::as_str))?,
            };

            let values = decode_hex(&record, &schema).context("Failed to decode the record")?;
            out.write_all(render_row(&values).as_bytes())?;
        }
    }

    Ok(())
}
