use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

/// Explicit startup configuration for the pipeline. Constructed by the caller
/// and passed in; the library never reads ambient state on its own.
#[derive(Clone, Debug)]
pub struct AssistantConfig {
    pub generation: GenerationConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct GenerationConfig {
    /// Interchangeable credentials for the generation service. Empty is a
    /// valid state: the pipeline then runs in fallback-only mode.
    pub credentials: Vec<SecretString>,
    pub model: String,
    pub request_timeout_secs: u64,
    /// Pause between credential rotations within one query.
    pub rotation_pause_ms: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Comma-separated credential list, same shape as the env variable.
    pub credentials: Option<String>,
    pub model: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig {
                credentials: Vec::new(),
                model: "gemini-2.5-flash".to_string(),
                request_timeout_secs: 30,
                rotation_pause_ms: 500,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    generation: Option<GenerationPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerationPatch {
    api_keys: Option<Vec<String>>,
    model: Option<String>,
    request_timeout_secs: Option<u64>,
    rotation_pause_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl AssistantConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("permia.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(generation) = patch.generation {
            if let Some(api_keys) = generation.api_keys {
                self.generation.credentials =
                    api_keys.into_iter().map(SecretString::from).collect();
            }
            if let Some(model) = generation.model {
                self.generation.model = model;
            }
            if let Some(timeout) = generation.request_timeout_secs {
                self.generation.request_timeout_secs = timeout;
            }
            if let Some(pause) = generation.rotation_pause_ms {
                self.generation.rotation_pause_ms = pause;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("PERMIA_GEMINI_API_KEYS") {
            self.generation.credentials = parse_credential_list(&value);
        }
        if let Some(value) = read_env("PERMIA_GEMINI_MODEL") {
            self.generation.model = value;
        }
        if let Some(value) = read_env("PERMIA_REQUEST_TIMEOUT_SECS") {
            self.generation.request_timeout_secs =
                parse_u64("PERMIA_REQUEST_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("PERMIA_ROTATION_PAUSE_MS") {
            self.generation.rotation_pause_ms = parse_u64("PERMIA_ROTATION_PAUSE_MS", &value)?;
        }
        if let Some(value) = read_env("PERMIA_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("PERMIA_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(credentials) = overrides.credentials {
            self.generation.credentials = parse_credential_list(&credentials);
        }
        if let Some(model) = overrides.model {
            self.generation.model = model;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.model.trim().is_empty() {
            return Err(ConfigError::Validation("generation model must not be empty".to_owned()));
        }
        if self.generation.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "generation request timeout must be at least 1 second".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Splits a comma-separated credential string, trimming whitespace and
/// dropping empty entries.
pub fn parse_credential_list(raw: &str) -> Vec<SecretString> {
    raw.split(',')
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .map(|candidate| SecretString::from(candidate.to_owned()))
        .collect()
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("permia.toml"), PathBuf::from("config/permia.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_owned(),
        value: value.to_owned(),
    })
}
