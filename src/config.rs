use std::{collections::HashMap, env, path::Path};

use adamus_notification::RelayConfig;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use thiserror::Error;

/// Unprefixed variables kept for existing deployments, mapped to config keys.
/// Later entries win when both are set.
const LEGACY_VARS: &[(&str, &str)] = &[
    ("GMAIL_USER", "mail.username"),
    ("GMAIL_PASS", "mail.password"),
    ("DESTINO_EMAIL", "mail.destination"),
    ("SECRET_KEY", "session.secret"),
    ("PORT", "server.port"),
    ("FLASK_ENV", "environment"),
    ("ENVIRONMENT", "environment"),
];

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub mail: RelayConfig,
    /// Reserved for signing session cookies
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub environment: RunMode,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default)]
    pub secret: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: generate_secret(),
        }
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"***")
            .finish()
    }
}

fn generate_secret() -> String {
    STANDARD.encode(rand::random::<[u8; 24]>())
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[serde(alias = "dev")]
    Development,
    #[default]
    #[serde(alias = "prod")]
    Production,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ObservabilityConfig {
    /// Falls back to a level chosen by the run mode
    #[serde(default)]
    pub log_level: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("Missing required mail settings: {}", .0.join(", "))]
    MissingMail(Vec<&'static str>),

    #[error("Server port must be greater than 0")]
    ZeroPort,

    #[error("Relay timeout must be between 1 and 60 seconds, got {0}")]
    RelayTimeout(u64),
}

impl Config {
    /// Load configuration from file and the process environment
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy environment variables (GMAIL_USER, GMAIL_PASS, DESTINO_EMAIL, ...)
    /// 2. Prefixed environment variables (ADAMUS__MAIL__SMTP_HOST, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        Self::load_from(config_path, env::vars().collect())
    }

    /// Same as [`Config::load`] with an explicit set of environment variables
    pub fn load_from(
        config_path: Option<String>,
        vars: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("mail.username", "")?
            .set_default("mail.password", "")?
            .set_default("mail.destination", "")?;

        // Load config file if path provided or CONFIG_PATH set
        let config_file_path = config_path
            .or_else(|| vars.get("CONFIG_PATH").cloned())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Config file is optional - ignore if not found
        if Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("ADAMUS")
                .separator("__")
                .try_parsing(true)
                .source(Some(vars.clone().into_iter().collect())),
        );

        for (var, key) in LEGACY_VARS {
            if let Some(value) = vars.get(*var).filter(|value| !value.is_empty()) {
                builder = builder.set_override(*key, value.as_str())?;
            }
        }

        let mut config: Config = builder.build()?.try_deserialize()?;

        if config.session.secret.is_empty() {
            config.session.secret = generate_secret();
        }

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let missing = [
            ("GMAIL_USER (mail.username)", &self.mail.username),
            ("GMAIL_PASS (mail.password)", &self.mail.password),
            ("DESTINO_EMAIL (mail.destination)", &self.mail.destination),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect::<Vec<_>>();

        if !missing.is_empty() {
            return Err(ConfigValidationError::MissingMail(missing));
        }
        if self.server.port == 0 {
            return Err(ConfigValidationError::ZeroPort);
        }
        if !(1..=60).contains(&self.mail.timeout_secs) {
            return Err(ConfigValidationError::RelayTimeout(self.mail.timeout_secs));
        }

        Ok(())
    }

    pub fn log_level(&self) -> &str {
        match (&self.observability.log_level, self.environment) {
            (Some(level), _) => level,
            (None, RunMode::Development) => "debug",
            (None, RunMode::Production) => "info",
        }
    }
}
