use anyhow::Context;
use clap::Parser;
use gbfs_etl::core::batch::run_all;
use gbfs_etl::utils::{logger, validation::Validate};
use gbfs_etl::ScrapeConfig;

#[derive(Parser)]
#[command(name = "toml-scrape")]
#[command(about = "Scrape every GBFS feed listed in a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "gbfs-scrape.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON log lines instead of the compact format
    #[arg(long)]
    json_logs: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Show what would be scraped without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("📁 Loading configuration from: {}", args.config);

    let config = match ScrapeConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config)?;

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No feeds will be fetched");
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let outcomes = run_all(&config, monitor_enabled)
        .await
        .context("failed to prepare scrape jobs")?;

    let failed: Vec<_> = outcomes.iter().filter(|o| !o.is_success()).collect();
    println!(
        "✅ {} of {} feeds scraped",
        outcomes.len() - failed.len(),
        outcomes.len()
    );
    for outcome in &failed {
        if let Err(e) = &outcome.result {
            eprintln!(
                "❌ {} / {}: {}",
                outcome.company_name,
                outcome.feed_type,
                e.user_friendly_message()
            );
        }
    }

    // 2: only feeds failed to download or parse; 3: output could not be written
    let storage_failed = failed
        .iter()
        .any(|o| matches!(&o.result, Err(e) if !e.is_feed_failure()));
    if storage_failed {
        std::process::exit(3);
    }
    if !failed.is_empty() {
        std::process::exit(2);
    }

    Ok(())
}

fn display_config_summary(config: &ScrapeConfig) -> anyhow::Result<()> {
    println!("📋 Configuration Summary:");
    println!("  Scrape: {}", config.scrape.name);
    if let Some(description) = &config.scrape.description {
        println!("  Description: {}", description);
    }
    println!("  Output: {}", config.output_path());
    println!("  CSV: {}", if config.write_csv() { "enabled" } else { "disabled" });
    match &config.database {
        Some(db) => println!(
            "  Database: {}:{}/{} (table prefix '{}')",
            db.host, db.port, db.database, db.table_prefix
        ),
        None => println!("  Database: disabled"),
    }

    for job in config.jobs().context("invalid feed table")? {
        println!("  {} / {} <- {}", job.company_name, job.feed_type, job.url);
    }
    println!();

    Ok(())
}
