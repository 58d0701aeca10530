//! Server configuration, loaded from environment variables at startup.

use std::fmt;
use std::path::PathBuf;

use byby_core::db::DatabaseSettings;
use byby_core::env::{env_flag, env_opt, env_or};

/// A credential read from the environment. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

fn env_secret(key: &str) -> Option<Secret> {
    env_opt(key).map(Secret::new)
}

/// Extractive question-answering model reached over HTTP.
#[derive(Debug, Clone)]
pub struct QaSettings {
    /// Inference API base URL; the model is addressed as `{endpoint}/models/{model}`.
    pub endpoint: String,
    pub model: String,
    pub api_token: Option<Secret>,
}

/// Google Custom Search JSON API. Without both credentials every search
/// returns no results.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub endpoint: String,
    pub api_key: Option<Secret>,
    pub engine_id: Option<String>,
}

/// OpenWeatherMap current-weather API, queried once at startup.
#[derive(Debug, Clone)]
pub struct WeatherSettings {
    pub endpoint: String,
    pub api_key: Option<Secret>,
    pub city: String,
}

/// Runtime configuration for byby-chat-server.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:5001"`).
    pub bind_address: String,

    /// Users and chat log database (`BYBY_DATABASE_URL` or `MYSQL_*`).
    pub database: DatabaseSettings,

    /// `tracing` filter string, e.g. `"info"` or `"debug,sqlx=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Key material for the signed session cookie. At least 32 bytes when
    /// set; when unset a random key is generated per process.
    pub session_secret: Option<Secret>,

    /// Store new passwords as unsalted SHA-256 hex instead of argon2id.
    pub legacy_password_hash: bool,

    /// Username allowed into `/admin`. Public registration cannot claim it.
    pub admin_username: String,

    /// Email of the administrator account created at startup when it does
    /// not exist yet. Needs `admin_password` as well.
    pub admin_email: Option<String>,

    pub admin_password: Option<Secret>,

    /// Optional TOML file replacing the built-in FAQ entries.
    pub faq_file: Option<PathBuf>,

    pub qa: QaSettings,
    pub search: SearchSettings,
    pub weather: WeatherSettings,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("BYBY_BIND", "0.0.0.0:5001"),
            database: DatabaseSettings::from_env(),
            log_level: env_or("BYBY_LOG", "info"),
            log_json: env_flag("BYBY_LOG_JSON"),
            session_secret: env_secret("BYBY_SESSION_SECRET"),
            legacy_password_hash: env_flag("BYBY_LEGACY_PASSWORD_HASH"),
            admin_username: env_or("BYBY_ADMIN_USERNAME", "admin"),
            admin_email: env_opt("BYBY_ADMIN_EMAIL"),
            admin_password: env_secret("BYBY_ADMIN_PASSWORD"),
            faq_file: env_opt("BYBY_FAQ_FILE").map(PathBuf::from),
            qa: QaSettings {
                endpoint: env_or("BYBY_QA_ENDPOINT", "https://api-inference.huggingface.co"),
                model: env_or("BYBY_QA_MODEL", crate::services::qa::DEFAULT_QA_MODEL),
                api_token: env_secret("BYBY_QA_API_TOKEN"),
            },
            search: SearchSettings {
                endpoint: env_or(
                    "BYBY_SEARCH_ENDPOINT",
                    "https://www.googleapis.com/customsearch/v1",
                ),
                api_key: env_secret("BYBY_SEARCH_API_KEY"),
                engine_id: env_opt("BYBY_SEARCH_ENGINE_ID"),
            },
            weather: WeatherSettings {
                endpoint: env_or(
                    "BYBY_WEATHER_ENDPOINT",
                    "https://api.openweathermap.org/data/2.5/weather",
                ),
                api_key: env_secret("BYBY_WEATHER_API_KEY"),
                city: env_or("BYBY_WEATHER_CITY", "Hanoi"),
            },
        }
    }
}
