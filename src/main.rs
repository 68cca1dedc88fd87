use anyhow::{Context, Result};
use brand_etl::{
    logging, validate_categories, Config, Pipeline, PipelineResult, TracingReporter,
    ValidationOutcome,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "brand_etl")]
#[command(about = "Validate brand and company records and export them to CSV, JSON, TOML, Excel and Parquet")]
#[command(version)]
struct Cli {
    /// Repository root; relative paths in the config resolve against it
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to $BRAND_ETL_CONFIG, then <root>/brand_etl.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export records to every output format
    Export,
    /// Validate records against their schemas; exits 1 if any record is invalid
    Validate,
    /// Validate, then export only if every record is valid
    Run,
}

fn print_validation(outcome: &ValidationOutcome) {
    for report in outcome.reports() {
        println!(
            "   {}: {} of {} valid",
            report.category,
            report.valid(),
            report.total
        );
        for id in &report.failed {
            println!("   - {}", id);
        }
    }
}

fn print_export(result: &PipelineResult) {
    println!("\n📊 Export Results:");
    println!("   Brands: {}", result.brands);
    println!("   Companies: {}", result.companies);
    println!("   Parquet rows: {}", result.parquet_rows);
    for path in &result.outputs {
        println!("   Output file: {}", path.display());
    }
}

fn validate(config: &Config) -> Result<bool> {
    println!("🔎 Validating records...");
    let mut reporter = TracingReporter;
    let outcome = validate_categories(config, &mut reporter).context("Validation run failed")?;
    print_validation(&outcome);
    if outcome.success() {
        println!("✅ All records are valid");
    } else {
        println!("❌ Some records failed validation");
    }
    Ok(outcome.success())
}

fn export(config: &Config) -> Result<()> {
    println!("🔄 Exporting records...");
    let result = Pipeline::run_exports(config).context("Export run failed")?;
    print_export(&result);
    Ok(())
}

fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::discover(&cli.root, cli.config.as_deref())
        .context("Failed to load configuration")?;
    let _log_guard = logging::init_logging(&config.logging);
    info!(root = %cli.root.display(), "Configuration loaded");

    let code = match cli.command {
        Commands::Export => {
            export(&config)?;
            ExitCode::SUCCESS
        }
        Commands::Validate => {
            if validate(&config)? {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Commands::Run => {
            if validate(&config)? {
                export(&config)?;
                ExitCode::SUCCESS
            } else {
                error!("Skipping export: validation failed");
                ExitCode::FAILURE
            }
        }
    };
    Ok(code)
}
