use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use skywatch::core::report::{format_metric, PLACEHOLDER};
use skywatch::core::stargazing::{compute_stargazing_score, normalize_weather};
use skywatch::utils::logger;
use skywatch::FeedClient;

const WEATHER_FORECAST_URL: &str = "https://api.weatherapi.com/v1/forecast.json";

#[derive(Parser)]
#[command(name = "stargazing")]
#[command(about = "Stargazing score for tonight from an hourly weather forecast")]
struct Args {
    /// WeatherAPI forecast JSON saved to disk
    #[arg(short, long, conflicts_with_all = ["lat", "lon"])]
    input: Option<String>,

    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    #[arg(long, default_value = WEATHER_FORECAST_URL)]
    forecast_url: String,

    #[arg(long, default_value_t = 10)]
    timeout_seconds: u64,

    #[arg(short, long)]
    verbose: bool,
}

async fn load_payload(args: &Args) -> Result<Value> {
    if let Some(path) = &args.input {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("read forecast file {}", path))?;
        return serde_json::from_str(&content).context("forecast file is not valid JSON");
    }

    let (Some(lat), Some(lon)) = (args.lat, args.lon) else {
        bail!("either --input or --lat/--lon is required");
    };
    let api_key = std::env::var("WEATHER_KEY").context("WEATHER_KEY is not set")?;

    let mut url = url::Url::parse(&args.forecast_url).context("invalid --forecast-url")?;
    url.query_pairs_mut()
        .append_pair("key", &api_key)
        .append_pair("q", &format!("{},{}", lat, lon))
        .append_pair("days", "1");

    let client = FeedClient::new(args.timeout_seconds)?;
    let payload = client
        .fetch_json(url.as_str())
        .await
        .context("weather forecast request failed")?;
    Ok(payload)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let payload = load_payload(&args).await?;
    let night = normalize_weather(&payload);
    tracing::debug!("{} night hours in forecast", night.hours.len());

    let score = compute_stargazing_score(&night);

    println!("✨ Stargazing score for tonight");
    match (score.overall, score.verdict) {
        (Some(overall), Some(verdict)) => {
            println!("Overall:          {:.0} / 100", overall);
            println!("Verdict:          {}", verdict.label());
        }
        _ => println!("Overall:          {} (no usable night hours)", PLACEHOLDER),
    }
    println!(
        "Moon:             {} ({})",
        night.moon_phase.as_deref().unwrap_or(PLACEHOLDER),
        format_metric(night.moon_illumination, 0, "% illuminated")
    );
    println!("Min cloud cover:  {}", format_metric(night.min_cloud_cover(), 0, "%"));
    println!("Max visibility:   {}", format_metric(night.max_visibility_km(), 1, "km"));
    println!("Sunset:           {}", night.sunset.as_deref().unwrap_or(PLACEHOLDER));

    for hour in &score.hourly {
        let label = hour
            .time
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        println!("  {}  {}", label, format_metric(hour.score, 0, ""));
    }

    Ok(())
}
