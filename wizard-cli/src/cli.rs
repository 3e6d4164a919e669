use anyhow::Context;
use chrono::{Days, Local, NaiveDate};
use clap::{ArgAction, Args, Parser, Subcommand};
use wizard_core::{Config, Coordinates, Place, ProviderId, Services, WeatherRequest};

use crate::{console::Console, menu::MAX_DAYS_AHEAD, session::Session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-wizard",
    version,
    about = "Weather Wizard 3000: daily forecasts and outfit tips"
)]
pub struct Cli {
    /// Log more to stderr (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the interactive menus (the default).
    Run,

    /// Store an API key for a provider in the config file.
    Configure {
        /// Provider short name: "openweather" or "gemini".
        provider: String,
    },

    /// Print one daily summary and exit.
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// City name, e.g. "Tokyo".
    #[arg(long, conflicts_with_all = ["lat", "lon"], required_unless_present = "lat")]
    pub city: Option<String>,

    /// Latitude in degrees, -90 to 90.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in degrees, -180 to 180.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Days after today, 0 to 4.
    #[arg(
        long,
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=MAX_DAYS_AHEAD as i64)
    )]
    pub day: u8,

    /// Also ask for outfit suggestions.
    #[arg(long)]
    pub suggest: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Run) {
            Command::Run => run_interactive().await,
            Command::Configure { provider } => configure(&provider),
            Command::Show(args) => show(args).await,
        }
    }
}

async fn run_interactive() -> anyhow::Result<()> {
    let config = Config::load()?;
    let services = Services::from_config(&config);
    let mut session = Session::new(services, Console::stdio(), || Local::now().date_naive());

    let task = tokio::spawn(async move { session.run().await });

    tokio::select! {
        joined = task => {
            let outcome = joined.context("interactive session panicked").and_then(|r| r);
            if let Err(err) = outcome {
                tracing::error!(error = ?err, "session aborted");
                println!("\nAn unexpected error occurred: {err:#}");
                std::process::exit(1);
            }
            Ok(())
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\n\nProgram interrupted. Exiting...");
            // The session task may be blocked on stdin, so don't wait for it.
            std::process::exit(130);
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;

    let api_key = inquire::Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    let mut config = Config::load()?;
    config.upsert_provider_api_key(id, api_key.trim().to_string());
    let path = config.save()?;

    println!("Saved {id} API key to {}", path.display());
    println!("Note: {} overrides the stored key when set.", id.env_var());
    Ok(())
}

async fn show(args: ShowArgs) -> anyhow::Result<()> {
    let request = WeatherRequest {
        place: args.place()?,
        date: target_date(Local::now().date_naive(), args.day)?,
    };

    let config = Config::load()?;
    let services = Services::from_config(&config);

    let summary = services.forecast.daily_summary(&request).await?;
    println!("{summary}");

    if args.suggest {
        println!("{}", services.suggestions.suggest(&summary).await?);
    }
    Ok(())
}

impl ShowArgs {
    fn place(&self) -> anyhow::Result<Place> {
        match (&self.city, self.lat, self.lon) {
            (Some(city), _, _) => Ok(Place::City(city.trim().to_string())),
            (None, Some(lat), Some(lon)) => Ok(Place::Coordinates(Coordinates::new(lat, lon)?)),
            _ => anyhow::bail!("Either --city or both --lat and --lon are required"),
        }
    }
}

fn target_date(today: NaiveDate, days_ahead: u8) -> anyhow::Result<NaiveDate> {
    today
        .checked_add_days(Days::new(days_ahead.into()))
        .context("date out of range")
}
