use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::info;
use thiserror::Error;

use nd_lookup_table::samples::{parse_point, read_samples};
use nd_lookup_table::{LookupError, LookupTable, LookupTable2, LookupTable3, SampleError, Table};

#[derive(Parser, Debug)]
#[command(name = "nd-lut", about = "Interpolate scattered N-D samples")]
struct Cli {
    /// Sample file: coordinates followed by the value on each line
    samples: PathBuf,
    /// Number of coordinates per sample
    #[arg(long, default_value_t = 1)]
    dim: usize,
    /// Query point, e.g. `--at 1.5,2`. May be repeated.
    #[arg(long = "at", required = true)]
    points: Vec<String>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Only 1 to 3 dimensions are supported, got {0}")]
    UnsupportedDimension(usize),

    #[error(transparent)]
    Samples(#[from] SampleError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

fn evaluate<T>(cli: &Cli) -> Result<Vec<f64>, CliError>
where
    T: Table<Key = f64, Value = f64>,
{
    let table: T = read_samples(&cli.samples)?;
    info!(
        "loaded {:?} with {} outer entries",
        cli.samples,
        table.len()
    );

    let mut values = Vec::with_capacity(cli.points.len());
    for text in &cli.points {
        let point = parse_point::<f64>(text)?;
        values.push(table.lookup_point(&point)?);
    }
    Ok(values)
}

fn run(cli: &Cli) -> Result<Vec<f64>, CliError> {
    match cli.dim {
        1 => evaluate::<LookupTable<f64, f64>>(cli),
        2 => evaluate::<LookupTable2<f64, f64>>(cli),
        3 => evaluate::<LookupTable3<f64, f64>>(cli),
        other => Err(CliError::UnsupportedDimension(other)),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(values) => {
            for (point, value) in cli.points.iter().zip(values) {
                println!("{}\t{}", point, value);
            }
        }
        Err(error) => {
            eprintln!("error: {}", error);
            process::exit(1);
        }
    }
}
