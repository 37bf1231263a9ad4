//! Keswick CLI binary.
//!
//! Fetches market data through the Keswick data clients and writes the
//! press-release and ratio reports.

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use keswick::catalog::{IndexCatalog, InstrumentCategory};
use keswick_core::Dated;
use keswick_core::screener::working_capital_to_assets;
use keswick_data::cache::SqliteCache;
use keswick_data::fmp::{FmpClient, FmpConfig, extract_series};
use keswick_output::{ExportFormat, Exporter, PressEntry, PressReport, RatioTable};
use std::error::Error;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "keswick")]
#[command(about = "Keswick: market-data reports over public financial APIs", long_about = None)]
#[command(version)]
struct Cli {
    /// FMP API key; falls back to the FMP_API_KEY environment variable
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Disable the local cache (always fetch fresh data)
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the press-release return report for a ticker
    Press {
        /// Ticker symbol
        ticker: String,

        /// Output file; defaults to <TICKER>_press.<ext>
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },

    /// Build ratio tables for one or more tickers
    Ratios {
        /// Ticker symbols
        #[arg(required = true)]
        tickers: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },

    /// Check tickers against the FMP symbol list
    Check {
        /// Ticker symbols
        #[arg(required = true)]
        tickers: Vec<String>,
    },

    /// List the built-in index catalog
    Indexes {
        /// Filter by category
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,

        /// Filter by region (case-insensitive substring)
        #[arg(long)]
        region: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => Self::Csv,
            OutputFormat::Json => Self::PrettyJson,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CategoryArg {
    Index,
    Volatility,
    Etf,
    Commodity,
}

impl From<CategoryArg> for InstrumentCategory {
    fn from(category: CategoryArg) -> Self {
        match category {
            CategoryArg::Index => Self::Index,
            CategoryArg::Volatility => Self::Volatility,
            CategoryArg::Etf => Self::Etf,
            CategoryArg::Commodity => Self::Commodity,
        }
    }
}

/// Source endpoint for a ratio field.
#[derive(Debug, Clone, Copy)]
enum Source {
    Ratios,
    Metrics,
}

/// Ratio report fields: FMP key, display title, endpoint, 2-dp rounding.
const RATIO_FIELDS: &[(&str, &str, Source, bool)] = &[
    ("currentRatio", "Current Ratio", Source::Ratios, true),
    ("quickRatio", "Quick Ratio", Source::Ratios, true),
    ("returnOnAssets", "ROA", Source::Ratios, true),
    ("returnOnEquity", "ROE", Source::Ratios, true),
    ("roic", "ROIC", Source::Metrics, true),
    ("interestCoverage", "Interest Coverage", Source::Metrics, true),
    ("priceToSalesRatio", "Price to Sales", Source::Ratios, true),
    ("bookValuePerShare", "BVPS", Source::Metrics, true),
    ("debtToEquity", "Debt to Equity", Source::Metrics, true),
    ("debtToAssets", "Debt to Assets", Source::Metrics, true),
    ("freeCashFlowYield", "Free Cashflow Yield", Source::Metrics, true),
    ("assetTurnover", "Asset Turnover", Source::Ratios, true),
];

/// Cached data older than this is refetched.
fn cache_max_age() -> Duration {
    Duration::hours(24)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    // The catalog listing needs no client or credential.
    if let Commands::Indexes { category, region } = &cli.command {
        return run_indexes(category.map(Into::into), region.as_deref());
    }

    let api_key = resolve_api_key(cli.api_key.clone())?;
    let client = FmpClient::new(FmpConfig::new(api_key))?;
    let cache = open_cache(cli.no_cache);

    match cli.command {
        Commands::Press {
            ticker,
            output,
            format,
        } => run_press(&client, cache, &ticker, output, format.into()).await,
        Commands::Ratios { tickers, format } => {
            run_ratios(&client, &tickers, format.into()).await
        }
        Commands::Check { tickers } => run_check(&client, &tickers).await,
        Commands::Indexes { .. } => unreachable!("handled above"),
    }
}

fn resolve_api_key(cli_key: Option<String>) -> Result<String, Box<dyn Error>> {
    cli_key
        .or_else(|| std::env::var("FMP_API_KEY").ok())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| "an FMP API key is required (--api-key or FMP_API_KEY)".into())
}

fn open_cache(no_cache: bool) -> Option<SqliteCache> {
    if no_cache {
        return None;
    }
    let dir = dirs::cache_dir()?.join("keswick");
    std::fs::create_dir_all(&dir).ok()?;
    match SqliteCache::new(dir.join("cache.db")) {
        Ok(cache) => Some(cache),
        Err(err) => {
            eprintln!("warning: cache unavailable: {err}");
            None
        }
    }
}

async fn run_press(
    client: &FmpClient,
    mut cache: Option<SqliteCache>,
    ticker: &str,
    output: Option<PathBuf>,
    format: ExportFormat,
) -> Result<(), Box<dyn Error>> {
    let ticker = ticker.to_uppercase();

    let checked = client.check_symbols(std::slice::from_ref(&ticker)).await?;
    if !checked.contains(&ticker) {
        return Err(format!("symbol not found: {ticker}").into());
    }

    let spinner = spinner(&format!("fetching press releases for {ticker}"));

    let releases = match cache
        .as_ref()
        .and_then(|c| c.load_press_releases(&ticker, cache_max_age()).ok().flatten())
    {
        Some(releases) => releases,
        None => {
            let releases = client.press_releases(&ticker).await?;
            if let Some(cache) = cache.as_mut() {
                cache.store_press_releases(&ticker, &releases)?;
            }
            releases
        }
    };
    if releases.is_empty() {
        spinner.finish_and_clear();
        return Err(format!("no press releases found for {ticker}").into());
    }

    spinner.set_message(format!("fetching close history for {ticker}"));
    let table = match cache
        .as_ref()
        .and_then(|c| c.load_closes(&ticker, cache_max_age()).ok().flatten())
    {
        Some(table) => table,
        None => {
            let table = client.price_table(&ticker).await?;
            if let Some(cache) = cache.as_mut() {
                cache.store_closes(&ticker, &table)?;
            }
            table
        }
    };

    spinner.set_message("deriving returns");
    let entries: Vec<PressEntry> = releases
        .iter()
        .map(|release| PressEntry::new(Dated::date(release), release.title.clone()))
        .collect();
    let report = PressReport::build(&ticker, &entries, &table, Utc::now().date_naive())?;
    spinner.finish_and_clear();

    let path = output
        .unwrap_or_else(|| PathBuf::from(format!("{ticker}_press.{}", format.extension())));
    report.export_to_file(&path, format)?;

    println!("{}: {} releases -> {}", ticker, report.rows.len(), path.display());
    println!(
        "average days per release: {}",
        report.summary.average_days_between_releases
    );
    println!(
        "mean %: 1d {:.4}, 3d {:.4}, 5d {:.4}",
        report.summary.mean_pct_1, report.summary.mean_pct_3, report.summary.mean_pct_5
    );
    Ok(())
}

async fn run_ratios(
    client: &FmpClient,
    tickers: &[String],
    format: ExportFormat,
) -> Result<(), Box<dyn Error>> {
    let checked = client.check_symbols(tickers).await?;
    if checked.is_empty() {
        return Err("no matching tickers found".into());
    }
    for ticker in tickers {
        if !checked.contains(&ticker.to_uppercase()) {
            eprintln!("warning: symbol not found: {ticker}");
        }
    }

    let progress = ProgressBar::new(checked.len() as u64);
    for ticker in &checked {
        progress.set_message(ticker.clone());

        let ratios = client.ratios(ticker).await?;
        let metrics = client.key_metrics(ticker).await?;
        let balance = client.balance_sheet_annual(ticker).await?;

        let mut rows = Vec::with_capacity(RATIO_FIELDS.len() + 2);
        for (key, title, source, round2) in RATIO_FIELDS {
            let source_rows = match source {
                Source::Ratios => &ratios,
                Source::Metrics => &metrics,
            };
            rows.push((title.to_string(), extract_series(source_rows, key, *round2)));
        }

        let working_capital = extract_series(&metrics, "workingCapital", false);
        rows.push((
            "Working Capital (M)".to_string(),
            working_capital
                .iter()
                .map(|value| value.map(|v| (v / 1e6).round()))
                .collect(),
        ));

        let total_assets = zeros_for_missing(extract_series(&balance, "totalAssets", false));
        let ratios_row = working_capital_to_assets(
            &zeros_for_missing(working_capital),
            &total_assets,
        );
        rows.push((
            "Working Capital to Assets".to_string(),
            ratios_row.into_iter().map(Some).collect(),
        ));

        let table = RatioTable::new(ticker, rows);
        let path = PathBuf::from(format!("{ticker}_ratios.{}", format.extension()));
        table.export_to_file(&path, format)?;
        progress.inc(1);
    }
    progress.finish_and_clear();

    println!("wrote ratio tables for {} tickers", checked.len());
    Ok(())
}

async fn run_check(client: &FmpClient, tickers: &[String]) -> Result<(), Box<dyn Error>> {
    let checked = client.check_symbols(tickers).await?;
    for ticker in tickers {
        let upper = ticker.to_uppercase();
        if checked.contains(&upper) {
            println!("{upper}: ok");
        } else {
            println!("{upper}: not found");
        }
    }
    Ok(())
}

fn run_indexes(
    category: Option<InstrumentCategory>,
    region: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let catalog = IndexCatalog::new();
    let instruments: Vec<_> = match region {
        Some(region) => catalog.by_region(region),
        None => catalog.instruments().iter().collect(),
    };

    for instrument in instruments {
        if category.is_some_and(|c| instrument.category != c) {
            continue;
        }
        println!(
            "{:<10} {:<24} {:<22} {}",
            instrument.symbol, instrument.name, instrument.region, instrument.category
        );
    }
    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner
}

fn zeros_for_missing(values: Vec<Option<f64>>) -> Vec<f64> {
    values.into_iter().map(|v| v.unwrap_or(0.0)).collect()
}
