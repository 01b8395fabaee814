//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::LlmBackend;

/// Number the welcome summary tells the owner to share with customers.
pub const DEFAULT_ASSISTANT_NUMBER: &str = "07012345678";

/// Length of the free trial in days.
pub const DEFAULT_TRIAL_DAYS: i64 = 7;

/// Longest accepted trial, ten years.
pub const MAX_TRIAL_DAYS: i64 = 3650;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listen port.
    pub port: u16,
    /// libSQL database file.
    pub db_path: PathBuf,
    /// Optional directory for rolling log files.
    pub log_dir: Option<PathBuf>,
    /// Settings shared by the message router.
    pub router: RouterConfig,
    /// Language-model fallback, if an API key is configured.
    pub fallback: Option<FallbackConfig>,
}

/// Settings the message router needs at request time.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub assistant_number: String,
    pub trial_days: i64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            assistant_number: DEFAULT_ASSISTANT_NUMBER.to_string(),
            trial_days: DEFAULT_TRIAL_DAYS,
        }
    }
}

/// Language-model fallback configuration.
#[derive(Debug, Clone)]
pub struct FallbackConfig {
    pub backend: LlmBackend,
    pub api_key: SecretString,
    pub model: String,
    /// Upper bound on a single fallback call.
    pub timeout: Duration,
}

impl AppConfig {
    /// Build configuration from `SMARTBIZ_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = parse_env("SMARTBIZ_PORT", 8080u16)?;
        let db_path = std::env::var("SMARTBIZ_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/smartbiz.db"));
        let log_dir = std::env::var("SMARTBIZ_LOG_DIR").ok().map(PathBuf::from);

        let trial_days = check_trial_days(parse_env("SMARTBIZ_TRIAL_DAYS", DEFAULT_TRIAL_DAYS)?)?;
        let router = RouterConfig {
            assistant_number: std::env::var("SMARTBIZ_ASSISTANT_NUMBER")
                .unwrap_or_else(|_| DEFAULT_ASSISTANT_NUMBER.to_string()),
            trial_days,
        };

        Ok(Self {
            port,
            db_path,
            log_dir,
            router,
            fallback: FallbackConfig::from_env()?,
        })
    }
}

impl FallbackConfig {
    /// Returns `None` when no API key is set for the selected backend.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let backend = match std::env::var("SMARTBIZ_LLM_BACKEND")
            .unwrap_or_else(|_| "openai".to_string())
            .to_lowercase()
            .as_str()
        {
            "openai" => LlmBackend::OpenAi,
            "anthropic" => LlmBackend::Anthropic,
            other => {
                return Err(ConfigError::InvalidValue {
                    key: "SMARTBIZ_LLM_BACKEND".into(),
                    message: format!("unknown backend '{other}'"),
                });
            }
        };

        let key_var = match backend {
            LlmBackend::OpenAi => "OPENAI_API_KEY",
            LlmBackend::Anthropic => "ANTHROPIC_API_KEY",
        };
        let Ok(api_key) = std::env::var(key_var) else {
            return Ok(None);
        };

        let default_model = match backend {
            LlmBackend::OpenAi => "gpt-4o-mini",
            LlmBackend::Anthropic => "claude-3-5-haiku-latest",
        };
        let model =
            std::env::var("SMARTBIZ_LLM_MODEL").unwrap_or_else(|_| default_model.to_string());
        let timeout_secs = parse_env("SMARTBIZ_LLM_TIMEOUT_SECS", 20u64)?;

        Ok(Some(Self {
            backend,
            api_key: SecretString::from(api_key),
            model,
            timeout: Duration::from_secs(timeout_secs),
        }))
    }
}

fn check_trial_days(days: i64) -> Result<i64, ConfigError> {
    if !(1..=MAX_TRIAL_DAYS).contains(&days) {
        return Err(ConfigError::InvalidValue {
            key: "SMARTBIZ_TRIAL_DAYS".into(),
            message: format!("must be between 1 and {MAX_TRIAL_DAYS}, got {days}"),
        });
    }
    Ok(days)
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("cannot parse '{raw}'"),
        }),
        Err(_) => Ok(default),
    }
}
