//! Mission Control CLI - analyze flight telemetry CSV logs
//!
//! ```bash
//! mission-control analyze flight.csv --mode rocket        # Summary card
//! mission-control analyze flight.csv --mode drone -f json # JSON report
//! mission-control serve --port 3000                       # HTTP API
//! mission-control columns                                 # Required columns per mode
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use mission_control::{analyze_file, AnalysisConfig, AnalysisReport, FlightMode, Quoting};
use std::fs;
use std::path::{Path, PathBuf};

/// Malformed rows printed after a summary
const SHOWN_MALFORMED: usize = 5;

#[derive(Parser)]
#[command(name = "mission-control")]
#[command(about = "Analyze rocket and drone flight telemetry CSV logs", long_about = None)]
struct Cli {
    /// JSON config file (constants, delimiter, quoting)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a telemetry CSV file
    Analyze {
        /// Input CSV file
        input: PathBuf,

        /// Flight mode: rocket or drone
        #[arg(short, long)]
        mode: FlightMode,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Split fields on every delimiter, ignoring quotes
        #[arg(long)]
        naive: bool,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Show the columns each flight mode requires
    Columns,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Summary card
    Text,
    /// Full report as JSON
    Json,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            input,
            mode,
            format,
            output,
            naive,
        } => cmd_analyze(&input, mode, format, output.as_deref(), naive, cli.config.as_deref()),

        Commands::Serve { port } => cmd_serve(port, cli.config.as_deref()).await,

        Commands::Columns => cmd_columns(cli.config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_analyze(
    input: &Path,
    mode: FlightMode,
    format: OutputFormat,
    output: Option<&Path>,
    naive: bool,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AnalysisConfig::load(config_path)?;
    if naive {
        config.quoting = Quoting::Naive;
    }

    let report = analyze_file(input, mode, &config)?;

    let content = match format {
        OutputFormat::Text => render_text(&report),
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
    };
    write_output(&content, output)?;

    if report.skipped() > 0 {
        eprintln!("\n⚠️  {} of {} rows skipped:", report.skipped(), report.table.row_count);
        for row in report.malformed.iter().take(SHOWN_MALFORMED) {
            eprintln!("   - {}", row);
        }
        if report.skipped() > SHOWN_MALFORMED {
            eprintln!("   ... and {} more", report.skipped() - SHOWN_MALFORMED);
        }
    }

    Ok(())
}

fn render_text(report: &AnalysisReport) -> String {
    let mut lines = report.summary.display_lines();
    lines.push(format!(
        "Rows: {} valid / {} total",
        report.valid_rows, report.table.row_count
    ));
    lines.join("\n")
}

async fn cmd_serve(port: u16, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AnalysisConfig::load(config_path)?;
    mission_control::server::start_server(port, config).await?;
    Ok(())
}

fn cmd_columns(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AnalysisConfig::load(config_path)?;
    println!("Required columns (case-sensitive header names):\n");
    for mode in FlightMode::ALL {
        println!("  {:<7} {}", mode, mode.required_columns().join(", "));
    }
    println!();
    println!("  rocket  maxAcceleration = max(acceleration) / {}", config.standard_gravity);
    println!(
        "  drone   stabilityScore  = {} - {} * (maxRoll + maxPitch)",
        config.stability_baseline, config.stability_weight
    );
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
