use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::info;
use weather_probe_core::{
    Config, Expectations, FixedTransport, OpenWeatherTransport, ProbeRequest, ResponseValidator,
    Transport, ValidationReport, run_probe,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-probe", version, about = "OpenWeather current-weather API check")]
pub struct Cli {
    /// Log debug output, including the raw response body. Raises the level on top of `RUST_LOG`.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default city in the config file.
    Configure,

    /// Call the live API and validate the response.
    Check {
        #[command(flatten)]
        expect: ExpectArgs,

        /// OpenWeather API key; overrides the config file.
        #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Endpoint to call instead of the public OpenWeather URL.
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Validate a saved response body without touching the network.
    Validate {
        /// File holding the JSON body.
        file: PathBuf,

        /// HTTP status the body was served with.
        #[arg(long, default_value_t = 200)]
        status: u16,

        /// Response time to report for the saved body, checked against the latency limit.
        #[arg(long, default_value_t = 0)]
        elapsed_ms: u64,

        #[command(flatten)]
        expect: ExpectArgs,
    },
}

#[derive(Debug, Args)]
pub struct ExpectArgs {
    /// City to request and expect in `name`; defaults to the configured city.
    #[arg(long)]
    pub city: Option<String>,

    /// Latency limit in milliseconds; defaults to the configured limit.
    #[arg(long)]
    pub max_latency_ms: Option<u64>,
}

impl ExpectArgs {
    fn expectations(&self, config: &Config) -> Expectations {
        let mut expect = config.expectations();
        if let Some(city) = &self.city {
            expect.city = city.trim().to_string();
        }
        if let Some(ms) = self.max_latency_ms {
            expect.max_latency = Duration::from_millis(ms);
        }
        expect
    }

    /// Build the request and the expectations from the same city, so `name` is
    /// compared against exactly what was sent.
    fn prepare(&self, config: &Config, api_key: String) -> Result<(ProbeRequest, Expectations)> {
        let mut expectations = self.expectations(config);
        let request = ProbeRequest::new(expectations.city.clone(), api_key)?;
        expectations.city = request.city().to_string();
        Ok((request, expectations))
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Check { expect, api_key, base_url } => {
                let api_key = config.resolve_api_key(api_key.as_deref())?;
                let transport = match base_url.or_else(|| config.openweather.base_url.clone()) {
                    Some(url) => OpenWeatherTransport::with_base_url(&url)?,
                    None => OpenWeatherTransport::new(),
                };

                let (request, expectations) = expect.prepare(&config, api_key)?;
                check(&transport, &request, expectations).await
            }
            Command::Validate { file, status, elapsed_ms, expect } => {
                let body = fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read response body: {}", file.display()))?;

                // The key is never sent; the fixed transport only replays the file.
                let (request, expectations) = expect.prepare(&config, "offline".into())?;
                let transport = FixedTransport::new(status, body)
                    .with_elapsed(Duration::from_millis(elapsed_ms));
                check(&transport, &request, expectations).await
            }
        }
    }
}

async fn check(
    transport: &dyn Transport,
    request: &ProbeRequest,
    expectations: Expectations,
) -> Result<()> {
    let validator = ResponseValidator::new(expectations);
    let report = run_probe(transport, request, &validator).await?;

    print_report(request.city(), &report);
    report.into_result()?;

    Ok(())
}

fn print_report(city: &str, report: &ValidationReport) {
    println!("Weather API check for {city}");
    print!("{report}");

    let failed = report.failures().count();
    if failed == 0 {
        println!("All {} checks passed.", report.outcomes().len());
    } else {
        println!("{failed} of {} checks failed.", report.outcomes().len());
    }
}

fn configure(mut config: Config) -> Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let city = Text::new("Default city:")
        .with_default(config.city())
        .prompt()
        .context("Failed to read city")?;

    config.set_api_key(api_key.trim().to_string());
    config.check.city = Some(city.trim().to_string());

    let path = config.save()?;
    info!(path = %path.display(), "configuration saved");
    println!("Saved configuration to {}", path.display());

    Ok(())
}
