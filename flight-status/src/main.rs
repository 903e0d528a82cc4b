use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use flight_status::aviation::AviationClient;
use flight_status::cache::RequestCache;
use flight_status::config::Settings;
use flight_status::export;
use flight_status::format::{format_flights_list, format_realtime, format_single_flight};
use flight_status::query::FlightQueries;

/// Fetch aviation data and export it to JSON for offline sharing
#[derive(Parser)]
#[command(name = "flight-status")]
#[command(version)]
struct Args {
    /// Output path (default ./out/<command>.json)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Print the Base64-encoded payload for QR code generators
    #[arg(long, global = true)]
    b64: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Single flight by IATA code
    Flight {
        flight_iata: String,
        flight_date: String,
    },

    /// Next departures for an airport
    Departures {
        airport_iata: String,
        flight_date: String,
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Next arrivals for an airport
    Arrivals {
        airport_iata: String,
        flight_date: String,
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Live position of an active flight
    Realtime { flight_iata: String },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Flight { .. } => "flight",
            Command::Departures { .. } => "departures",
            Command::Arrivals { .. } => "arrivals",
            Command::Realtime { .. } => "realtime",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "flight-status failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let settings = Settings::from_env().context("failed to load configuration")?;
    info!(?settings, "configuration loaded");

    let output = args
        .output
        .unwrap_or_else(|| export::default_output_path(args.command.name()));

    let ttl = settings.cache_ttl();
    if export::is_fresh(&output, ttl) {
        println!("Recent file found (<{}s), skipping API call.", ttl.as_secs());
        if args.b64 {
            let stored = export::read_json(&output)?;
            println!("{}", export::encode_b64(&stored)?);
        }
        return Ok(());
    }

    let client = AviationClient::new(settings.aviation_config())
        .context("failed to create aviation client")?;
    let cache = RequestCache::new(client, &settings.cache_config());
    let queries = FlightQueries::new(cache, &settings.airline_iata, settings.default_limit);

    let payload: Value = match &args.command {
        Command::Flight {
            flight_iata,
            flight_date,
        } => {
            let raw = queries.flight(flight_iata, flight_date).await?;
            serde_json::to_value(format_single_flight(&raw))?
        }
        Command::Departures {
            airport_iata,
            flight_date,
            limit,
        } => {
            let raw = queries
                .next_departures(airport_iata, flight_date, *limit)
                .await?;
            serde_json::to_value(format_flights_list(&raw))?
        }
        Command::Arrivals {
            airport_iata,
            flight_date,
            limit,
        } => {
            let raw = queries.next_arrivals(airport_iata, flight_date, *limit).await?;
            serde_json::to_value(format_flights_list(&raw))?
        }
        Command::Realtime { flight_iata } => {
            let raw = queries.realtime_position(flight_iata).await?;
            serde_json::to_value(format_realtime(&raw))?
        }
    };

    export::write_json(&payload, &output)?;
    println!("JSON saved to {}", output.display());

    if args.b64 {
        println!("{}", export::encode_b64(&payload)?);
    }

    Ok(())
}
