//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::metadata_adapter::FileMetadataAdapter;
use crate::domain::backtest::{BacktestConfig, BacktestResult, Simulator};
use crate::domain::config_validation::{
    load_analysis_config, load_backtest_config, parse_date, validate_backtest_config,
    validate_data_config, AnalysisConfig,
};
use crate::domain::error::ScoreTraderError;
use crate::domain::metrics::Metrics;
use crate::domain::opportunity::{build_opportunities, OpportunityReport};
use crate::domain::score_table::{build_score_table, ScoreTable};
use crate::domain::universe::{load_universe, parse_symbols, SkippedSymbol};
use crate::ports::config_port::ConfigPort;
use crate::ports::metadata_port::MetadataPort;
use crate::ports::price_port::PricePort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Parser, Debug)]
#[command(name = "scoretrader", about = "Technical-signal scoring and walk-forward backtest")]
pub struct Cli {
    /// Hide progress bars
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the score table and run the backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Overrides [backtest] start_date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Overrides [backtest] end_date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Comma-separated symbols, overrides [data] symbols
        #[arg(long)]
        symbols: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Score every instrument as of one day
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        /// Last day to include (YYYY-MM-DD); defaults to each file's last bar
        #[arg(long)]
        day: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List symbols found in the price directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show bar count and date range per symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Validate a configuration file without running anything
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let quiet = cli.quiet;
    let result = match cli.command {
        Command::Backtest {
            config,
            start,
            end,
            symbols,
            output,
        } => run_backtest(
            &config,
            start.as_deref(),
            end.as_deref(),
            symbols.as_deref(),
            output.as_deref(),
            quiet,
        ),
        Command::Analyze {
            config,
            day,
            output,
        } => run_analyze(&config, day.as_deref(), output.as_deref(), quiet),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ScoreTraderError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

/// Reads `[backtest]`, applies `--start`/`--end`, then range-checks.
pub fn resolve_backtest_config(
    config: &dyn ConfigPort,
    start_override: Option<&str>,
    end_override: Option<&str>,
) -> Result<BacktestConfig, ScoreTraderError> {
    let mut bt = load_backtest_config(config)?;
    if let Some(start) = start_override {
        bt.start_date = parse_date(start, "backtest", "start_date")?;
    }
    if let Some(end) = end_override {
        bt.end_date = parse_date(end, "backtest", "end_date")?;
    }
    validate_backtest_config(&bt)?;
    Ok(bt)
}

/// `--symbols`, then `[data] symbols`, then every file the price port lists.
pub fn resolve_symbols(
    symbols_override: Option<&str>,
    config: &dyn ConfigPort,
    prices: &dyn PricePort,
) -> Result<Vec<String>, ScoreTraderError> {
    let invalid = |e: crate::domain::universe::UniverseError| ScoreTraderError::ConfigInvalid {
        section: "data".into(),
        key: "symbols".into(),
        reason: e.to_string(),
    };

    if let Some(list) = symbols_override {
        return parse_symbols(list).map_err(invalid);
    }
    if let Some(list) = config.get_string("data", "symbols") {
        return parse_symbols(&list).map_err(invalid);
    }
    let symbols = prices.list_symbols()?;
    if symbols.is_empty() {
        return Err(ScoreTraderError::EmptyUniverse);
    }
    Ok(symbols)
}

pub fn price_dir(config: &dyn ConfigPort) -> Result<PathBuf, ScoreTraderError> {
    config
        .get_string("data", "price_dir")
        .map(PathBuf::from)
        .ok_or_else(|| ScoreTraderError::ConfigMissing {
            section: "data".into(),
            key: "price_dir".into(),
        })
}

pub fn output_dir(output_override: Option<&Path>, config: &dyn ConfigPort) -> PathBuf {
    match output_override {
        Some(path) => path.to_path_buf(),
        None => config
            .get_string("output", "dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
    }
}

pub fn build_metadata(config: &dyn ConfigPort) -> Result<FileMetadataAdapter, ScoreTraderError> {
    let description = config.get_string("data", "description_file").map(PathBuf::from);
    let fundamentals = config.get_string("data", "fundamentals_file").map(PathBuf::from);
    FileMetadataAdapter::from_files(description.as_deref(), fundamentals.as_deref())
}

fn progress_bar(len: u64, quiet: bool, label: &'static str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message(label);
    pb
}

/// Everything a backtest run produced.
#[derive(Debug)]
pub struct BacktestOutcome {
    pub table: ScoreTable,
    pub result: BacktestResult,
    pub metrics: Metrics,
    pub skipped: Vec<SkippedSymbol>,
    pub score_table_path: PathBuf,
    pub ledger_path: PathBuf,
}

/// Load universe, build the score table, simulate, write both artifacts.
pub fn run_backtest_pipeline(
    prices: &dyn PricePort,
    reports: &dyn ReportPort,
    bt_config: &BacktestConfig,
    symbols: &[String],
    parallel: bool,
    quiet: bool,
) -> Result<BacktestOutcome, ScoreTraderError> {
    let universe = load_universe(
        prices,
        symbols,
        Some(bt_config.start_date),
        Some(bt_config.end_date),
    )?;

    info!(
        instruments = universe.count(),
        start = %bt_config.start_date,
        end = %bt_config.end_date,
        parallel,
        "building score table"
    );
    let pb = progress_bar(universe.count() as u64, quiet, "scoring");
    let table = build_score_table(
        &universe.histories,
        bt_config.start_date,
        bt_config.end_date,
        parallel,
        |_| pb.inc(1),
    );
    pb.finish_and_clear();

    if table.is_empty() {
        warn!("score table is empty, the backtest will stay in cash");
    }

    let pb = progress_bar(bt_config.period_count(), quiet, "simulating");
    let result = Simulator::new(bt_config.clone(), &table, &universe.histories)
        .run_with_progress(|_| pb.inc(1));
    pb.finish_and_clear();

    let metrics = Metrics::compute(&result.ledger, bt_config.initial_capital);
    let score_table_path = reports.write_score_table(&table)?;
    let ledger_path = reports.write_ledger(&result.ledger)?;

    let mut skipped = universe.skipped;
    skipped.extend(table.skipped.iter().cloned());

    Ok(BacktestOutcome {
        table,
        result,
        metrics,
        skipped,
        score_table_path,
        ledger_path,
    })
}

fn run_backtest(
    config_path: &Path,
    start: Option<&str>,
    end: Option<&str>,
    symbols_override: Option<&str>,
    output: Option<&Path>,
    quiet: bool,
) -> Result<(), ScoreTraderError> {
    let config = load_config(config_path)?;
    validate_data_config(&config)?;
    let bt_config = resolve_backtest_config(&config, start, end)?;

    let prices = CsvPriceAdapter::new(price_dir(&config)?);
    let symbols = resolve_symbols(symbols_override, &config, &prices)?;
    let reports = CsvReportAdapter::new(output_dir(output, &config));
    let parallel = config.get_bool("backtest", "parallel", true);

    let outcome = run_backtest_pipeline(&prices, &reports, &bt_config, &symbols, parallel, quiet)?;
    print_backtest_summary(&bt_config, &outcome);
    Ok(())
}

fn print_backtest_summary(bt_config: &BacktestConfig, outcome: &BacktestOutcome) {
    let m = &outcome.metrics;
    eprintln!("\n=== Backtest Results ===");
    eprintln!("Period:           {} to {}", bt_config.start_date, bt_config.end_date);
    eprintln!("Initial Capital:  {:.2}", bt_config.initial_capital);
    eprintln!("Final Value:      {:.2}", m.final_value);
    eprintln!("Total Return:     {:.2}%", m.total_return * 100.0);
    eprintln!("Annualized:       {:.2}%", m.annualized_return * 100.0);
    eprintln!("Max Drawdown:     -{:.1}% ({} days)", m.max_drawdown * 100.0, m.max_drawdown_days);
    eprintln!(
        "Actions:          {} switches, {} stop-losses, {} reevaluations",
        m.switches, m.stop_losses, m.reevaluations
    );
    if let Some(position) = &outcome.result.final_position {
        eprintln!(
            "Holding:          {} ({:.4} shares since {})",
            position.symbol, position.shares, position.entry_date
        );
    }

    if !outcome.skipped.is_empty() {
        eprintln!("\n=== Skipped Instruments ===");
        for s in &outcome.skipped {
            eprintln!("  {}: {}", s.symbol, s.reason);
        }
    }

    eprintln!("\nScore table written to: {}", outcome.score_table_path.display());
    eprintln!("Ledger written to:      {}", outcome.ledger_path.display());
}

/// Load universe up to `day`, score each prefix, write the analysis CSV.
pub fn run_analysis_pipeline(
    prices: &dyn PricePort,
    metadata: &dyn MetadataPort,
    reports: &dyn ReportPort,
    symbols: &[String],
    day: Option<NaiveDate>,
    analysis: &AnalysisConfig,
) -> Result<(OpportunityReport, PathBuf), ScoreTraderError> {
    let universe = load_universe(prices, symbols, None, day)?;
    let report = build_opportunities(&universe.histories, metadata, day, analysis.cap_threshold);
    info!(rows = report.rows.len(), as_of = ?report.as_of, "opportunity snapshot built");
    let path = reports.write_opportunities(&report)?;
    Ok((report, path))
}

fn run_analyze(
    config_path: &Path,
    day: Option<&str>,
    output: Option<&Path>,
    quiet: bool,
) -> Result<(), ScoreTraderError> {
    let config = load_config(config_path)?;
    validate_data_config(&config)?;
    let analysis = load_analysis_config(&config)?;
    let day = day
        .map(|value| parse_date(value, "analysis", "day"))
        .transpose()?;

    let prices = CsvPriceAdapter::new(price_dir(&config)?);
    let metadata = build_metadata(&config)?;
    let symbols = resolve_symbols(None, &config, &prices)?;
    let reports = CsvReportAdapter::new(output_dir(output, &config));

    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_message(format!("analyzing {} instruments", symbols.len()));
    let (report, path) =
        run_analysis_pipeline(&prices, &metadata, &reports, &symbols, day, &analysis)?;
    spinner.finish_and_clear();

    let top = report.top_above_threshold(analysis.top_n);
    println!(
        "Top {} above market cap {:.0} as of {}:",
        analysis.top_n,
        analysis.cap_threshold,
        report
            .as_of
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    if top.is_empty() {
        println!("  (none)");
    }
    for (rank, row) in top.iter().enumerate() {
        println!(
            "{:>3}. {:<8} {:.2}  {:>10.2}  {}",
            rank + 1,
            row.symbol,
            row.composite,
            row.last_close,
            row.description
        );
    }
    eprintln!("\nAnalysis written to: {}", path.display());
    Ok(())
}

fn run_list_symbols(config_path: &Path) -> Result<(), ScoreTraderError> {
    let config = load_config(config_path)?;
    let prices = CsvPriceAdapter::new(price_dir(&config)?);
    let symbols = prices.list_symbols()?;

    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{symbol}");
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(())
}

fn run_info(config_path: &Path, symbol: Option<&str>) -> Result<(), ScoreTraderError> {
    let config = load_config(config_path)?;
    let prices = CsvPriceAdapter::new(price_dir(&config)?);
    let symbols = match symbol {
        Some(s) => vec![s.trim().to_uppercase()],
        None => resolve_symbols(None, &config, &prices)?,
    };

    for s in &symbols {
        match prices.fetch_history(s, None, None) {
            Ok(history) => match (history.first_date(), history.last_date()) {
                (Some(first), Some(last)) => {
                    println!("{}: {} bars, {} to {}", s, history.len(), first, last);
                }
                _ => eprintln!("{s}: no data found"),
            },
            Err(e) if e.is_per_instrument() => eprintln!("{s}: {e}"),
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), ScoreTraderError> {
    let config = load_config(config_path)?;
    validate_data_config(&config)?;
    let bt = resolve_backtest_config(&config, None, None)?;
    let analysis = load_analysis_config(&config)?;

    eprintln!("\nBacktest:");
    eprintln!("  period:            {} to {}", bt.start_date, bt.end_date);
    eprintln!("  initial capital:   {:.2}", bt.initial_capital);
    eprintln!("  stop loss:         {:.2}%", bt.stop_loss_fraction * 100.0);
    eprintln!("  reevaluation days: {}", bt.reevaluation_days);
    eprintln!("\nAnalysis:");
    eprintln!("  cap threshold:     {:.0}", analysis.cap_threshold);
    eprintln!("  top n:             {}", analysis.top_n);
    eprintln!("\nUniverse:");
    match config.get_string("data", "symbols") {
        Some(list) => eprintln!("  symbols: {}", list),
        None => eprintln!("  symbols: every CSV in price_dir"),
    }

    eprintln!("\nConfiguration is valid");
    Ok(())
}
