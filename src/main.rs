#![allow(non_snake_case)]

use std::env;

use chrono_tz::Tz;
use log::{info, warn};

use calendarBot::cli;
use calendarBot::clients::caldav::{CaldavClient, CalendarBackend};
use calendarBot::config::{AppConfig, NamesConfig};
use calendarBot::handlers::intent::SkillContext;

const DEFAULT_TIMEZONE: &str = "America/New_York";

#[tokio::main]
async fn main() {
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")
        .and_then(|logger| logger.start())
        .expect("Unable to initialize logging.");

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    };

    let get_prop = |key: &str| -> Option<String> { config.get(key).or_else(|| env::var(key).ok()) };

    let names = match get_prop("NAMES_FILE") {
        Some(path) => NamesConfig::from_file(&path).expect("Unable to load the names file."),
        None => NamesConfig::reference(),
    };

    let tz_name = get_prop("TIMEZONE").unwrap_or(DEFAULT_TIMEZONE.to_string());
    let tz: Tz = match tz_name.parse() {
        Ok(tz) => tz,
        Err(_) => {
            warn!("unknown timezone {}, using {}", tz_name, DEFAULT_TIMEZONE);
            chrono_tz::America::New_York
        }
    };

    let ctx = SkillContext::new(&names, tz).expect("Invalid names configuration.");
    info!("loaded {} timezone and name tables", tz);

    let backend = match (
        get_prop("SERVER_URL"),
        get_prop("CALDAV_USER"),
        get_prop("CALDAV_PASSWORD"),
    ) {
        (Some(host), Some(user), Some(password)) => {
            Some(CaldavClient::new(&host, &user, &password))
        }
        _ => None,
    };

    cli::cli(
        &ctx,
        backend.as_ref().map(|b| b as &dyn CalendarBackend),
    )
    .await;
}
