//! # AirAware command-line client
//!
//! A small front end over the AirAware API façade.
//!
//! ```bash
//! airaware aqi <location>
//! airaware history <location> <start YYYY-MM-DD> <end YYYY-MM-DD>
//! airaware sensors
//! airaware alerts
//! airaware contact <name> <email> <subject> <message>
//! ```
//!
//! Settings come from `airaware.json5` in the working directory (or the file
//! named by `AIRAWARE_CONFIG`), and the bearer token from the key-value
//! store. Log levels can be controlled through the `RUST_LOG` environment variable.

use airaware::api::client::ApiClient;
use airaware::api::service::AirAwareService;
use airaware::aqi::AqiCategory;
use airaware::config::{Config, CONFIG_FILE};
use airaware::contact::{ContactForm, ContactSubmitter, SubmissionResult};
use airaware::error::{AirAwareError, Result};
use airaware::storage::KeyValueStore;
use airaware::utils::{convert_temperature, format_date, format_number, TemperatureUnit};
use chrono::NaiveDate;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "usage: airaware <aqi|history|sensors|alerts|contact> [args...]";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(AirAwareError::Api(e)) => {
            eprintln!("{}", e.message);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String]) -> Result<()> {
    let Some(command) = args.first() else {
        return Err(AirAwareError::from(USAGE));
    };

    let config_path = env::var("AIRAWARE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE));
    let config = Config::load(&config_path)?;
    let tokens = KeyValueStore::new(config.storage_path.0.clone());
    let service = AirAwareService::new(ApiClient::from_config(&config.api, tokens)?);

    tracing::debug!("Running command {command}");

    match command.as_str() {
        "aqi" => {
            let location = arg(args, 1, "location")?;
            let reading = service.get_air_quality(location).await?;
            let category = reading.category();
            println!(
                "{location}: AQI {} - {} ({})",
                format_number(i64::from(reading.aqi)),
                category,
                category.color()
            );
            if let Some(celsius) = reading.temperature {
                let fahrenheit = convert_temperature(
                    celsius,
                    TemperatureUnit::Celsius,
                    TemperatureUnit::Fahrenheit,
                );
                println!("Temperature: {celsius:.1} C / {fahrenheit:.1} F");
            }
            if let Some(measured_at) = reading.measured_at {
                println!("Measured: {}", format_date(&measured_at));
            }
        }
        "history" => {
            let location = arg(args, 1, "location")?;
            let start = parse_date(arg(args, 2, "start date")?)?;
            let end = parse_date(arg(args, 3, "end date")?)?;
            for reading in service.get_air_quality_history(location, start, end).await? {
                let when = reading
                    .measured_at
                    .map(|t| format_date(&t))
                    .unwrap_or_else(|| "-".to_string());
                println!("{when}: AQI {} {}", reading.aqi, reading.category());
            }
        }
        "sensors" => {
            for sensor in service.get_sensors().await? {
                println!(
                    "{} {} [{}]",
                    sensor.id,
                    sensor.name.as_deref().unwrap_or("-"),
                    sensor.city.as_deref().unwrap_or("-")
                );
            }
        }
        "alerts" => {
            for alert in service.get_alerts().await? {
                let band = alert
                    .aqi_value
                    .map(|aqi| AqiCategory::from_aqi(aqi).to_string())
                    .unwrap_or_default();
                println!("[{}] {} {band}", alert.severity, alert.title);
            }
        }
        "contact" => {
            let form = ContactForm {
                name: arg(args, 1, "name")?.to_string(),
                email: arg(args, 2, "email")?.to_string(),
                subject: arg(args, 3, "subject")?.to_string(),
                message: arg(args, 4, "message")?.to_string(),
            };
            let submitter = ContactSubmitter::from_config(&config.contact, service);
            let result = submitter.submit(form)?.wait().await;
            if let Some(notice) = submitter.notice_for(&result) {
                println!("{}\n{}", notice.title, notice.description);
            }
            if let SubmissionResult::Failed(e) = result {
                println!("{}", config.contact.contact_details());
                return Err(e.into());
            }
        }
        other => {
            return Err(AirAwareError::from(format!("unknown command {other}\n{USAGE}")));
        }
    }

    Ok(())
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| AirAwareError::from(format!("missing {name}\n{USAGE}")))
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AirAwareError::from(format!("invalid date {value}: {e}")))
}
