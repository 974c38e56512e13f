use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub data: DataSettings,
    pub matching: MatchingSettings,
    pub scoring: ScoringSettings,
    pub tokens: TokenSettings,
    #[serde(default)]
    pub sms: Option<SmsSettings>,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    pub donors_path: String,
    pub hospitals_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    pub max_distance_km: Option<f64>,
    pub max_results: Option<usize>,
    pub low_stock_threshold: Option<u32>,
    pub hospital_distance_cutoff_km: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    /// "quality" ranks by the logistic model, "rule_based" by
    /// (hospital distance, recipient distance)
    #[serde(default = "default_scoring_mode")]
    pub mode: String,
    #[serde(default)]
    pub weights: WeightsConfig,
}

fn default_scoring_mode() -> String {
    "rule_based".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_bias_weight")]
    pub bias: f64,
    #[serde(default = "default_compatibility_weight")]
    pub compatibility: f64,
    #[serde(default = "default_distance_weight")]
    pub distance: f64,
    #[serde(default = "default_hospital_distance_weight")]
    pub hospital_distance: f64,
    #[serde(default = "default_urgency_weight")]
    pub urgency: f64,
    #[serde(default = "default_reliability_weight")]
    pub reliability: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            bias: default_bias_weight(),
            compatibility: default_compatibility_weight(),
            distance: default_distance_weight(),
            hospital_distance: default_hospital_distance_weight(),
            urgency: default_urgency_weight(),
            reliability: default_reliability_weight(),
        }
    }
}

fn default_bias_weight() -> f64 { -1.0 }
fn default_compatibility_weight() -> f64 { 1.5 }
fn default_distance_weight() -> f64 { -0.05 }
fn default_hospital_distance_weight() -> f64 { -0.001 }
fn default_urgency_weight() -> f64 { 0.25 }
fn default_reliability_weight() -> f64 { 1.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct TokenSettings {
    pub ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmsSettings {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    #[serde(default = "default_sms_base_url")]
    pub base_url: String,
}

fn default_sms_base_url() -> String {
    "https://api.twilio.com".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with LIFELINK_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with LIFELINK_)
            // e.g., LIFELINK_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("LIFELINK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_sms_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("LIFELINK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// SMS credentials usually live in the environment, not in a checked-in
/// config file; TWILIO_* variables take precedence when present
fn apply_sms_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let account_sid = env::var("TWILIO_ACCOUNT_SID").ok();
    let auth_token = env::var("TWILIO_AUTH_TOKEN").ok();
    let from_number = env::var("TWILIO_PHONE").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(sid) = account_sid {
        builder = builder.set_override("sms.account_sid", sid)?;
    }
    if let Some(token) = auth_token {
        builder = builder.set_override("sms.auth_token", token)?;
    }
    if let Some(number) = from_number {
        builder = builder.set_override("sms.from_number", number)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.bias, -1.0);
        assert_eq!(weights.compatibility, 1.5);
        assert_eq!(weights.distance, -0.05);
        assert_eq!(weights.hospital_distance, -0.001);
        assert_eq!(weights.urgency, 0.25);
        assert_eq!(weights.reliability, 1.0);
    }

    #[test]
    fn test_default_logging() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "json");
    }

    #[test]
    fn test_default_scoring_mode() {
        assert_eq!(default_scoring_mode(), "rule_based");
    }
}
