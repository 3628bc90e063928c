//! Hearth CLI binary.
//!
//! Classifies households and analyzes the volatility-tier portfolios from the
//! command line.

mod household;

use clap::{Parser, Subcommand, ValueEnum};
use hearth::universe::{StaticUniverse, Universe};
use hearth::{Engine, EngineConfig, portfolio_name, resolve_label};
use hearth_data::YahooQuoteProvider;
use hearth_factors::VolatilityTier;
use hearth_output::{AnalysisResult, ExportFormat, Exporter, format_currency};
use hearth_risk::{Household, RiskProfile};
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hearth")]
#[command(about = "Hearth: household risk profiles and tier portfolios", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/hearth/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dollar amount to invest
    #[arg(long, global = true)]
    amount: Option<f64>,

    /// Market index ticker
    #[arg(long, global = true)]
    market: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a household into a risk profile
    Classify {
        /// Five answers in question order, e.g. h,l,m,m,h (give three times)
        #[arg(long = "respondent", num_args = 1, conflicts_with = "form")]
        respondents: Vec<String>,

        /// JSON file of form fields such as "risk_profile1"
        #[arg(long)]
        form: Option<PathBuf>,

        /// Also fetch prices and analyze the matching portfolio
        #[arg(long)]
        analyze: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Fetch prices and list the three volatility tiers
    Tiers {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Analyze the portfolio for a risk profile
    Analyze {
        /// conservative, moderate or aggressive
        profile: String,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write the result to a file (.json or .csv)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the normalized value series to a CSV file
        #[arg(long)]
        series: Option<PathBuf>,
    },

    /// Fetch prices and write the aligned panel to CSV
    Panel {
        /// Destination CSV file
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Classify {
            respondents,
            form,
            analyze,
            format,
        } => {
            let household = match form {
                Some(path) => household::from_form_file(&path)?,
                None => household::from_respondents(&respondents)?,
            };
            classify_household(&household, analyze, format, config).await?;
        }
        Commands::Tiers { format } => {
            let engine = initialize(config).await?;
            print_tiers(&engine, format)?;
        }
        Commands::Analyze {
            profile,
            format,
            output,
            series,
        } => {
            let engine = initialize(config).await?;
            let result = engine.analyze_bounded(resolve_label(&profile)).await?;
            print_result(&result, format)?;
            if let Some(path) = output {
                result.export_to_file(&path, ExportFormat::from_path(&path))?;
                println!("Result written to {}", path.display());
            }
            if let Some(path) = series {
                result
                    .normalized_series
                    .export_to_file(&path, ExportFormat::Csv)?;
                println!("Series written to {}", path.display());
            }
        }
        Commands::Panel { output } => {
            let engine = initialize(config).await?;
            write_panel(&engine, &output)?;
        }
    }

    Ok(())
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hearth").join("config.json"))
}

fn load_config(cli: &Cli) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let mut config = match cli.config.as_deref() {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => match default_config_path() {
            Some(path) => EngineConfig::load_or_default(&path)?,
            None => EngineConfig::default(),
        },
    };

    if let Some(amount) = cli.amount {
        config.investment_amount = amount;
    }
    if let Some(market) = &cli.market {
        config.market_ticker = market.to_uppercase();
    }
    config.validate()?;
    Ok(config)
}

async fn initialize(config: EngineConfig) -> Result<Engine, Box<dyn std::error::Error>> {
    let provider = YahooQuoteProvider::with_rate_limit(config.fetch.rate_limit())?;
    let universe_size = config
        .universe
        .as_ref()
        .map_or_else(StaticUniverse::large_cap, StaticUniverse::from_symbols)
        .size();

    let pb = ProgressBar::new(universe_size as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Fetching {} and universe...", config.market_ticker));

    let result = Engine::initialize_with_progress(&provider, config, |ticker, ok| {
        pb.inc(1);
        if !ok {
            pb.println(format!("  {ticker}: no data, excluded"));
        }
    })
    .await;

    match result {
        Ok(engine) => {
            pb.finish_with_message(format!(
                "Fetched {} tickers ({} trading days)",
                engine.panel().tickers().len(),
                engine.panel().len()
            ));
            Ok(engine)
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            Err(e.into())
        }
    }
}

async fn classify_household(
    household: &Household,
    analyze: bool,
    format: OutputFormat,
    config: EngineConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let profile = hearth_risk::classify(household);
    let score = household.score();
    info!(profile = %profile, totals = ?score.totals, "household classified");

    if analyze {
        let engine = initialize(config).await?;
        let result = engine.analyze_bounded(profile).await?;
        return print_result(&result, format);
    }

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "profile": profile,
                "totals": score.totals,
                "mean": score.mean,
                "min_risk_tolerance": score.min_risk_tolerance,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text | OutputFormat::Markdown => {
            println!("Respondent totals: {:?}", score.totals);
            println!("Mean score:        {:.2}", score.mean);
            println!("Risk profile:      {}", profile.title());
            println!("Portfolio tier:    {}", VolatilityTier::from(profile));
        }
    }
    Ok(())
}

fn print_result(
    result: &AnalysisResult,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Text => println!("{}", result.to_ascii_table()),
        OutputFormat::Markdown => println!("{}", result.to_markdown()),
        OutputFormat::Json => println!("{}", result.export_to_string(ExportFormat::PrettyJson)?),
    }
    Ok(())
}

fn print_tiers(engine: &Engine, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let tiers = engine.tiers();

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(tiers)?);
        return Ok(());
    }

    let cutoffs = tiers.cutoffs();
    println!("Volatility cutoffs: {:.4} / {:.4}\n", cutoffs.lower, cutoffs.upper);
    for tier in VolatilityTier::ALL {
        let members = tiers.members(tier);
        println!("{} ({}, {} tickers)", portfolio_name(tier), tier, members.len());
        for member in members {
            println!("  {:8} {:>8.4}", member.ticker, member.volatility);
        }
        println!();
    }
    if !tiers.unclassified().is_empty() {
        println!("Unclassified: {}", tiers.unclassified().join(", "));
    }
    if !engine.panel().unavailable().is_empty() {
        println!("Unavailable:  {}", engine.panel().unavailable().join(", "));
    }

    let profiles = [RiskProfile::Conservative, RiskProfile::Moderate, RiskProfile::Aggressive];
    let amount = format_currency(engine.config().investment_amount);
    println!("\nEach profile invests {amount} equally across its tier:");
    for profile in profiles {
        println!("  {:13} -> {}", profile.title(), VolatilityTier::from(profile));
    }
    Ok(())
}

fn write_panel(engine: &Engine, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut frame = engine.panel().to_frame()?;
    let mut file = std::fs::File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)?;
    println!(
        "Panel written to {} ({} rows, {} columns)",
        path.display(),
        frame.height(),
        frame.width()
    );
    Ok(())
}
