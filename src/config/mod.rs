pub mod cli;
pub mod toml_config;

use crate::core::aggregator::GroupingMode;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extensions, validate_path, validate_positive_number, validate_range,
    validate_url, Validate,
};
use std::time::Duration;
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_VEHICLES_PATH: &str = "cars.json";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_CURRENCY: &str = "AED";

/// Fully resolved settings: defaults, then the TOML file, then CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub request_timeout_seconds: u64,
    pub vehicles_path: String,
    pub output_path: String,
    pub export_report: bool,
    pub case_insensitive: bool,
    pub currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            vehicles_path: DEFAULT_VEHICLES_PATH.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            export_report: true,
            case_insensitive: false,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl Settings {
    pub fn merge_toml(mut self, file: TomlConfig) -> Self {
        if let Some(backend) = file.backend {
            if let Some(url) = backend.base_url {
                self.base_url = url;
            }
            if let Some(timeout) = backend.request_timeout_seconds {
                self.request_timeout_seconds = timeout;
            }
        }
        if let Some(interval) = file.polling.and_then(|p| p.interval_ms) {
            self.poll_interval_ms = interval;
        }
        if let Some(aggregation) = file.aggregation {
            if let Some(case_insensitive) = aggregation.case_insensitive {
                self.case_insensitive = case_insensitive;
            }
            if let Some(currency) = aggregation.currency {
                self.currency = currency;
            }
        }
        if let Some(path) = file.vehicles.and_then(|v| v.path) {
            self.vehicles_path = path;
        }
        if let Some(output) = file.output {
            if let Some(path) = output.path {
                self.output_path = path;
            }
            if let Some(export) = output.export {
                self.export_report = export;
            }
        }
        self
    }

    pub fn grouping_mode(&self) -> GroupingMode {
        if self.case_insensitive {
            GroupingMode::CaseInsensitive
        } else {
            GroupingMode::Exact
        }
    }
}

impl ConfigProvider for Settings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    fn vehicles_path(&self) -> &str {
        &self.vehicles_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn case_insensitive_grouping(&self) -> bool {
        self.case_insensitive
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("backend.base_url", &self.base_url)?;
        validate_range("polling.interval_ms", self.poll_interval_ms, 10, 600_000)?;
        validate_positive_number(
            "backend.request_timeout_seconds",
            self.request_timeout_seconds,
            1,
        )?;
        validate_path("vehicles.path", &self.vehicles_path)?;
        validate_file_extensions("vehicles.path", &[self.vehicles_path.clone()], &["json"])?;
        if self.export_report {
            validate_path("output.path", &self.output_path)?;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "car-price-lookup")]
#[command(about = "Submit a vehicle list for price lookup and show aggregated prices")]
pub struct CliConfig {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Base URL of the lookup backend
    #[arg(long, env = "CAR_PRICE_LOOKUP_URL")]
    pub base_url: Option<String>,

    /// Vehicle list file (JSON array of {make, model, selected})
    #[arg(long)]
    pub vehicles: Option<String>,

    /// Look up these vehicles instead of the list's selection (MAKE:MODEL, repeatable)
    #[arg(long = "vehicle", value_name = "MAKE:MODEL")]
    pub vehicle: Vec<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    /// Skip writing the CSV/JSON report
    #[arg(long)]
    pub no_export: bool,

    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Group "BMW X5" and "bmw x5" together
    #[arg(long)]
    pub case_insensitive: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Builds the effective settings, reading the TOML file when one is given.
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = Settings::default();
        if let Some(path) = &self.config {
            settings = settings.merge_toml(TomlConfig::from_file(path)?);
        }
        Ok(self.apply_overrides(settings))
    }

    pub fn apply_overrides(&self, mut settings: Settings) -> Settings {
        if let Some(url) = &self.base_url {
            settings.base_url = url.clone();
        }
        if let Some(path) = &self.vehicles {
            settings.vehicles_path = path.clone();
        }
        if let Some(path) = &self.output_path {
            settings.output_path = path.clone();
        }
        if let Some(interval) = self.poll_interval_ms {
            settings.poll_interval_ms = interval;
        }
        if self.no_export {
            settings.export_report = false;
        }
        if self.case_insensitive {
            settings.case_insensitive = true;
        }
        settings
    }
}
