use clap::Parser;
use skywatch::core::report::render_text;
use skywatch::core::ConfigProvider;
use skywatch::utils::error::ErrorSeverity;
use skywatch::utils::{logger, validation::Validate};
use skywatch::{AuroraPipeline, LocalStorage, SkywatchEngine, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-skywatch")]
#[command(about = "Aurora scoring driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "skywatch.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override table export setting from config
    #[arg(long)]
    export_tables: Option<bool>,

    /// Dry run - show what would be fetched without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let verbose = args.verbose || config.verbose();
    if config.json_logs() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("🚀 Starting TOML-based skywatch");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(export) = args.export_tables {
        config.output.export_tables = Some(export);
        tracing::info!("🔧 Table export overridden to: {}", export);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No requests will be made");
        perform_dry_run(&config);
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = AuroraPipeline::new(storage, config)?;
    let engine = SkywatchEngine::new(pipeline);

    match engine.run().await {
        Ok(outcome) => {
            println!("{}", render_text(&outcome.report));
            println!();
            println!("📁 Report saved to: {}", outcome.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Scoring run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let location = config.location();
    println!("📋 Configuration Summary:");
    println!(
        "  Location: {} ({:.3}, {:.3})",
        location.label(),
        location.lat,
        location.lon
    );
    println!("  Output: {}", config.output_path());
    println!("  Export tables: {}", config.export_tables());
    println!("  Request timeout: {}s", config.timeout_seconds());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 Feeds:");
    println!("  OVATION:           {}", config.ovation_url());
    println!("  Kp forecast:       {}", config.kp_forecast_url());
    println!("  Solar wind mag:    {}", config.mag_url());
    println!("  Solar wind plasma: {}", config.plasma_url());

    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!("  Files: aurora_report.json, aurora_report.txt");
    if config.export_tables() {
        println!(
            "  Tables: kp_forecast.csv, solar_wind_mag.csv, solar_wind_plasma.csv, ovation_grid.csv"
        );
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
