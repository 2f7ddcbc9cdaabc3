//! Process configuration.
//!
//! Values are layered with figment: an optional TOML file first, then the
//! environment. Spring-style `SPRING_DATASOURCE_*` variables are accepted as
//! aliases, but the plain `DATASOURCE_*` names win when both are set.

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use fundu::{DurationParser, TimeUnit};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;

/// Default path of the optional TOML config file.
pub const DEFAULT_CONFIG_PATH: &str = "dbprobe.toml";

const KEYS: &[&str] = &[
    "datasource_url",
    "datasource_username",
    "datasource_password",
    "port",
    "log_level",
    "shutdown_timeout",
];

const SPRING_ALIASES: &[&str] = &[
    "spring_datasource_url",
    "spring_datasource_username",
    "spring_datasource_password",
];

#[derive(Deserialize, custom_debug_derive::Debug, Clone)]
pub struct Config {
    /// Connection URL, e.g. `postgres://db.internal:5432/app`. A `jdbc:` prefix is tolerated.
    #[serde(deserialize_with = "deserialize_string")]
    pub datasource_url: String,
    #[serde(default, deserialize_with = "deserialize_string")]
    pub datasource_username: String,
    #[serde(default, deserialize_with = "deserialize_string")]
    #[debug(with = "crate::fmt::redacted")]
    pub datasource_password: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level", deserialize_with = "deserialize_string")]
    pub log_level: String,
    /// How long in-flight requests may take to drain after a shutdown signal.
    #[serde(
        default = "default_shutdown_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub shutdown_timeout: Duration,
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(8)
}

impl Config {
    /// Build the layered figment without extracting it.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(
                Env::raw()
                    .only(SPRING_ALIASES)
                    .map(|k| k.as_str()["spring_".len()..].into()),
            )
            .merge(Env::raw().only(KEYS))
    }

    /// Load configuration from `path` (skipped if missing) and the environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }
}

/// Accepts any scalar as a string.
///
/// Environment values are parsed by figment, so `DATASOURCE_PASSWORD=12345`
/// arrives as an integer.
fn deserialize_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Signed(n) => n.to_string(),
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    })
}

/// Parses durations like `8s`, `1500ms` or `2m`. Bare numbers are seconds.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw = deserialize_string(deserializer)?;
    let parser =
        DurationParser::with_time_units(&[TimeUnit::MilliSecond, TimeUnit::Second, TimeUnit::Minute]);
    let parsed = parser
        .parse(raw.trim())
        .map_err(|e| D::Error::custom(format!("invalid duration '{raw}': {e}")))?;
    Duration::try_from(parsed)
        .map_err(|e| D::Error::custom(format!("invalid duration '{raw}': {e}")))
}
