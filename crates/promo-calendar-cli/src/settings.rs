//! Layered CLI settings and logging setup.
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. a TOML file (`--config FILE`, else `promocal.toml` in the working directory if present)
//! 3. `PROMOCAL__*` environment variables, e.g. `PROMOCAL__TIMEZONE=UTC`

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use config::{Config, Environment, File};
use promo_calendar::{parse_weekday, LeadTimeTable};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "promocal";
const ENV_PREFIX: &str = "PROMOCAL";

/// Korean e-commerce channels run on Korea Standard Time.
pub const DEFAULT_TIMEZONE: &str = "Asia/Seoul";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// IANA timezone used to decide what "today" is.
    pub timezone: String,
    pub week_start: String,
    pub log_level: String,
    pub log_json: bool,
    /// Per-channel overrides merged over the built-in lead-time table.
    #[serde(default = "LeadTimeTable::empty")]
    pub lead_times: LeadTimeTable,
}

impl Settings {
    /// Load settings from defaults, the config file and the environment.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("timezone", DEFAULT_TIMEZONE)?
            .set_default("week_start", "monday")?
            .set_default("log_level", "warn")?
            .set_default("log_json", false)?;

        builder = match path {
            Some(path) => builder.add_source(File::from(Path::new(path)).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| anyhow::anyhow!("Invalid timezone in configuration: '{}'", self.timezone))
    }

    pub fn week_start(&self) -> Result<Weekday> {
        parse_weekday(&self.week_start).context("Invalid week_start in configuration")
    }

    /// Today's date in the configured timezone.
    pub fn today(&self) -> Result<NaiveDate> {
        Ok(Utc::now().with_timezone(&self.timezone()?).date_naive())
    }

    /// Built-in lead times with configured overrides applied.
    pub fn lead_time_table(&self) -> LeadTimeTable {
        LeadTimeTable::default().merged_with(&self.lead_times)
    }
}

/// Map repeated `-v` flags to a level, falling back to the configured one.
pub fn log_level(configured: &str, verbose: u8) -> &str {
    match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays pure JSON.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let directive = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| format!("promo_calendar={level},promocal={level}"));

    let builder = fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(std::io::stderr);

    // A subscriber installed earlier (e.g. by a test harness) keeps priority.
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if installed.is_err() {
        tracing::debug!("global tracing subscriber already set; keeping it");
    }
}
