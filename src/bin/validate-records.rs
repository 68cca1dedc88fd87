use anyhow::{Context, Result};
use brand_etl::{logging, validate_categories, Config, TracingReporter};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Validate every brand and company record against its schema.
#[derive(Parser, Debug)]
#[command(name = "validate-records", version, about = "Validate brand and company YAML records against their schemas")]
struct Cli {
    /// Repository root containing data/ and schemas/
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Optional config file (defaults to <root>/brand_etl.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();
    let args = Cli::parse();

    let config = Config::discover(&args.root, args.config.as_deref())
        .with_context(|| format!("Failed to load configuration for {}", args.root.display()))?;
    let _log_guard = logging::init_logging(&config.logging);

    let outcome = validate_categories(&config, &mut TracingReporter)?;
    if outcome.success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}
