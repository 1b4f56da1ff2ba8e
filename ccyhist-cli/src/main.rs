//! ccyhist CLI — daily crypto history download and run status.
//!
//! Commands:
//! - `download` — fetch daily history from CryptoCompare and write one CSV
//!   table per exchange, resuming past runs from the output directory
//! - `import` — reduce a per-trade dump to a daily table in the same format
//! - `status` — list exchanges that already have a completed output

use anyhow::{Context, Result};
use ccyhist_core::provider::cryptocompare::CryptoCompareClient;
use ccyhist_core::{
    finalize, read_ticks, reduce_ticks, run_pipeline, Affix, CompletedSet, CsvSink, RunConfig,
    StdoutProgress,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "ccyhist",
    about = "ccyhist — daily cryptocurrency price/volume history collector"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download exchange histories and write one CSV per exchange.
    Download {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Target currencies (repeatable). Defaults to USD and BTC.
        #[arg(long = "currency")]
        currencies: Vec<String>,

        /// Output directory. Defaults to ./exchanges.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Minimum milliseconds between requests to the source.
        #[arg(long)]
        pacing_ms: Option<u64>,

        /// Maximum chunks fetched per symbol.
        #[arg(long)]
        max_chunks: Option<usize>,

        /// Redo exchanges even if a previous output exists.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Reduce a per-trade CSV dump (unixtime,price,amount) to a daily table.
    Import {
        /// Path to the trades file.
        file: PathBuf,

        /// Symbol used as the column prefix.
        #[arg(long)]
        symbol: String,

        /// Comparison currency used as the column suffix.
        #[arg(long, default_value = "USD")]
        currency: String,

        /// Output directory. Defaults to ./exchanges.
        #[arg(long, default_value = "exchanges")]
        output_dir: PathBuf,
    },
    /// List exchanges with a completed output.
    Status {
        /// Output directory. Defaults to ./exchanges.
        #[arg(long, default_value = "exchanges")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Download {
            config,
            currencies,
            output_dir,
            pacing_ms,
            max_chunks,
            force,
        } => run_download(config, currencies, output_dir, pacing_ms, max_chunks, force),
        Commands::Import {
            file,
            symbol,
            currency,
            output_dir,
        } => run_import(&file, &symbol, &currency, &output_dir),
        Commands::Status { output_dir } => run_status(&output_dir),
    }
}

fn run_download(
    config_path: Option<PathBuf>,
    currencies: Vec<String>,
    output_dir: Option<PathBuf>,
    pacing_ms: Option<u64>,
    max_chunks: Option<usize>,
    force: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => RunConfig::from_file(&path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => RunConfig::default(),
    };
    if !currencies.is_empty() {
        config.target_currencies = currencies;
    }
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    if let Some(ms) = pacing_ms {
        config.pacing_ms = ms;
    }
    if let Some(n) = max_chunks {
        config.max_chunks = n;
    }

    let completed = if force {
        CompletedSet::empty()
    } else {
        CompletedSet::from_dir(&config.output_dir)
            .with_context(|| format!("scanning {}", config.output_dir.display()))?
    };
    if !completed.is_empty() {
        println!(
            "Resuming: {} exchange(s) already have an output in {}.",
            completed.len(),
            config.output_dir.display()
        );
    }

    let client = CryptoCompareClient::new(config.pacing());
    let sink = CsvSink::new(&config.output_dir);
    let progress = StdoutProgress;

    let summary = run_pipeline(&client, &client, &sink, &completed, &config, &progress)
        .context("fetching exchange catalog")?;

    println!(
        "\nRun complete: {} written, {} skipped, {} empty, {} failed",
        summary.completed, summary.skipped, summary.empty, summary.failed
    );

    if !summary.all_succeeded() {
        for (exchange, err) in &summary.errors {
            eprintln!("Error for {exchange}: {err}");
        }
        std::process::exit(1);
    }

    Ok(())
}

fn run_import(file: &Path, symbol: &str, currency: &str, output_dir: &Path) -> Result<()> {
    let reader =
        std::fs::File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let ticks =
        read_ticks(reader).with_context(|| format!("reading trades from {}", file.display()))?;
    if ticks.is_empty() {
        println!("No trades in {}; nothing written.", file.display());
        return Ok(());
    }

    let table = reduce_ticks(&ticks)
        .label(&symbol.to_uppercase(), "_", Affix::Prefix)
        .label(&currency.to_uppercase(), "_", Affix::Suffix);
    let finalized = finalize(table);

    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .context("trades file has no usable name")?;
    let sink = CsvSink::new(output_dir);
    sink.write(stem, &finalized)
        .with_context(|| format!("writing {}", sink.path_for(stem).display()))?;

    println!(
        "Wrote {} ({} rows, {} columns).",
        sink.path_for(stem).display(),
        finalized.row_count(),
        finalized.columns.len()
    );
    Ok(())
}

fn run_status(output_dir: &Path) -> Result<()> {
    let completed = CompletedSet::from_dir(output_dir)
        .with_context(|| format!("scanning {}", output_dir.display()))?;

    if completed.is_empty() {
        println!("No completed outputs in {}.", output_dir.display());
        return Ok(());
    }

    println!("{} completed exchange(s):", completed.len());
    for exchange in completed.iter() {
        println!("  {exchange}");
    }
    Ok(())
}
