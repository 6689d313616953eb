//! Options Analyzer CLI
//!
//! Usage:
//!   options-analyzer analyze --margin 15 --lot-multiplier 1 [--input instruments.csv]
//!       [--export] [--format csv|json|xlsx]
//!   options-analyzer sample

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use options_analyzer::config::DEFAULT_CONFIG_FILE;
use options_analyzer::{
    AnalysisConfig, AnalyzerError, AnalyzerSettings, CsvInstrumentSource, ExportFormat,
    InstrumentSource, OptionsAnalyzer, SampleSource, render_table,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const EXIT_BAD_INPUT: i32 = 2;
const EXIT_EXPORT_FAILED: i32 = 3;

#[derive(Parser)]
#[command(name = "options-analyzer")]
#[command(about = "Margin-offset CE/PE strike, premium and IRR analysis for NSE underlyings")]
#[command(version)]
struct Cli {
    /// Settings file (TOML); must exist when given
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse the instrument universe and print the result table
    Analyze {
        /// Margin percentage for strike offset (defaults to settings)
        #[arg(short, long, allow_hyphen_values = true)]
        margin: Option<String>,
        /// Lot size multiplier (defaults to settings)
        #[arg(short, long)]
        lot_multiplier: Option<String>,
        /// Instrument CSV file (defaults to settings, then the sample universe)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Also write the batch to a file
        #[arg(short, long)]
        export: bool,
        /// Export format
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,
        /// Export directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the built-in sample universe
    Sample,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "options_analyzer=debug"
    } else {
        "options_analyzer=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(explicit: Option<&str>) -> AnalyzerSettings {
    let (path, loaded) = match explicit {
        Some(path) => (path, AnalyzerSettings::from_required_file(path)),
        None => (DEFAULT_CONFIG_FILE, AnalyzerSettings::from_file(DEFAULT_CONFIG_FILE)),
    };

    match loaded {
        Ok(settings) => {
            if explicit.is_some() || Path::new(path).exists() {
                info!("Loaded configuration from: {}", path);
            } else {
                info!("No {} found, using defaults and environment", path);
            }
            settings
        }
        Err(e) => {
            warn!("Failed to load config from {}: {}", path, e);
            info!("Using default configuration");
            AnalyzerSettings::default()
        }
    }
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut settings = load_settings(cli.config.as_deref());

    match cli.command {
        Commands::Sample => {
            println!(
                "{:<12} {:>10} {:>10} {:>10} {:>8}",
                "Symbol", "Spot", "52W High", "52W Low", "Lot"
            );
            for r in SampleSource::records() {
                println!(
                    "{:<12} {:>10.2} {:>10.2} {:>10.2} {:>8}",
                    r.symbol, r.spot_price, r.high_52w, r.low_52w, r.lot_size
                );
            }
        }
        Commands::Analyze {
            margin,
            lot_multiplier,
            input,
            export,
            format,
            output_dir,
        } => {
            if let Some(format) = format {
                settings.export.format = format;
            }
            if let Some(dir) = output_dir {
                settings.export.output_dir = dir;
            }

            let margin = margin.unwrap_or_else(|| settings.analysis.margin_percent.to_string());
            let multiplier =
                lot_multiplier.unwrap_or_else(|| settings.analysis.lot_multiplier.to_string());

            let source: Box<dyn InstrumentSource> = match input {
                Some(path) => Box::new(CsvInstrumentSource::new(path)),
                None => settings.instrument_source(),
            };

            let batch = match analyse(&settings, source.as_ref(), &margin, &multiplier) {
                Ok(batch) => batch,
                Err(e) if e.is_bad_input() => {
                    error!("Invalid input: {}", e);
                    eprintln!("Invalid input: {e}");
                    process::exit(EXIT_BAD_INPUT);
                }
                Err(e) => return Err(e).context("Analysis failed"),
            };

            print!("{}", render_table(&batch.rows));

            if export {
                match settings.exporter().export(&batch) {
                    Ok(path) => println!("Exported to {}", path.display()),
                    Err(e) => {
                        error!("Export failed: {}", e);
                        eprintln!("Export failed: {e}");
                        process::exit(EXIT_EXPORT_FAILED);
                    }
                }
            }
        }
    }

    Ok(())
}

fn analyse(
    settings: &AnalyzerSettings,
    source: &dyn InstrumentSource,
    margin: &str,
    multiplier: &str,
) -> Result<options_analyzer::AnalysisBatch, AnalyzerError> {
    let config = AnalysisConfig::parse(margin, multiplier)?;
    let analyzer = OptionsAnalyzer::new(settings.engine.clone())?;
    analyzer.run(source, &config)
}
