//! Rolling returns-based style analysis on a CSV file.
//!
//! The input holds a date column, the fund's returns and one column of
//! returns per style index.
//!
//! Usage: `cargo run --bin rbsa --features cli -- INPUT.csv --returns-col FUND [--window m]`
//! Example: `cargo run --bin rbsa --features cli -- funds.csv --returns-col fund --styles value,growth,bonds --window q -o exposures.csv`

use std::{fs::File, path::PathBuf, process};

use clap::Parser;
use polars::prelude::*;
use ppe::{
    model::{FailurePolicy, RollingConfig, RollingStyleAttribution, Window},
    utils::{fill_missing, numeric_columns, returns_from_frame, styles_from_frame},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rbsa")]
#[command(about = "Rolling returns-based style analysis", long_about = None)]
#[command(version)]
struct Cli {
    /// CSV file with a date column, fund returns and style returns
    input: PathBuf,

    /// Column holding the fund's returns
    #[arg(long)]
    returns_col: String,

    /// Date column, formatted as %Y-%m-%d
    #[arg(long, default_value = "date")]
    date_col: String,

    /// Style columns, comma separated (default: every other numeric column)
    #[arg(long, value_delimiter = ',')]
    styles: Vec<String>,

    /// Window length: observation count or period code (w, m, q, s, y)
    #[arg(long, default_value = "m")]
    window: Window,

    /// Handling of windows that cannot be fitted: fill, skip or abort
    #[arg(long, default_value = "fill")]
    on_failure: FailurePolicy,

    /// Fit windows in parallel
    #[arg(long)]
    parallel: bool,

    /// Forward fill missing values before fitting
    #[arg(long)]
    ffill: bool,

    /// Write exposures to this CSV file instead of printing them
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(cli.input.clone()))?
        .finish()?;

    let style_cols: Vec<String> = if cli.styles.is_empty() {
        numeric_columns(&df, &[cli.returns_col.as_str(), cli.date_col.as_str()])
    } else {
        cli.styles.clone()
    };
    let style_refs: Vec<&str> = style_cols.iter().map(String::as_str).collect();

    if cli.ffill {
        let mut fill_cols = style_refs.clone();
        fill_cols.push(&cli.returns_col);
        df = fill_missing(df.lazy(), &fill_cols, &cli.date_col).collect()?;
    }

    let returns = returns_from_frame(&df, &cli.date_col, &cli.returns_col)?;
    let styles = styles_from_frame(&df, &cli.date_col, &style_refs)?;
    info!(
        path = %cli.input.display(),
        observations = returns.len(),
        styles = ?style_refs,
        "loaded input"
    );

    let config = RollingConfig { failure_policy: cli.on_failure, parallel: cli.parallel };
    let result = RollingStyleAttribution::with_config(config).run(&returns, &styles, cli.window)?;

    match &cli.output {
        Some(path) => {
            let mut out = result.to_frame()?;
            let file = File::create(path)?;
            CsvWriter::new(file).include_header(true).finish(&mut out)?;
            info!(rows = out.height(), path = %path.display(), "wrote exposures");
        }
        None => result.print_summary(),
    }

    Ok(())
}
