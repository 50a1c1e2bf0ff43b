//! TOML settings file. Every section is optional; a missing file means
//! defaults everywhere.

use std::path::Path;
use std::time::Duration;

use chrono_tz::Tz;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};
use crate::provider::Provider;
use crate::theme::Theme;

pub const DEFAULT_SINGLE_SIGN_URL: &str =
    "http://widgets.fabulously40.com/horoscope.json?sign={sign}";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub provider: ProviderConfig,
    pub cache: CacheConfig,
    pub display: DisplayConfig,
    pub theme: ThemeConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    SingleSign,
    AllSigns,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::SingleSign,
            url: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub timezone: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub pager: bool,
    pub error_timeout_secs: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            pager: false,
            error_timeout_secs: 3,
        }
    }
}

/// Color names per screen element, blessed-style (`bright_white_on_blue`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub border: String,
    pub highlight: String,
    pub title: String,
    pub heading: String,
    pub text: String,
    pub prompt: String,
    pub key: String,
    pub error: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            border: "blue".into(),
            highlight: "bright_white_on_blue".into(),
            title: "bright_white".into(),
            heading: "bright_blue".into(),
            text: "normal".into(),
            prompt: "bright_blue".into(),
            key: "bright_white".into(),
            error: "bright_red".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "pretty".into(),
        }
    }
}

impl LoggingConfig {
    /// Logs go to stderr; stdout belongs to the menu.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
            _ => {
                fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.provider()?;
        self.timezone()?;
        Theme::from_config(&self.theme, true)?;
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "provider.timeout_secs",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        Ok(())
    }

    pub fn provider(&self) -> Result<Provider> {
        match self.provider.kind {
            ProviderKind::SingleSign => {
                let url_template = self
                    .provider
                    .url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SINGLE_SIGN_URL.to_string());
                if !url_template.contains("{sign}") {
                    return Err(ConfigError::InvalidValue {
                        field: "provider.url",
                        reason: "single_sign url needs a {sign} placeholder".into(),
                    }
                    .into());
                }
                Ok(Provider::SingleSign { url_template })
            }
            ProviderKind::AllSigns => match &self.provider.url {
                Some(url) if !url.trim().is_empty() => Ok(Provider::AllSigns { url: url.clone() }),
                _ => Err(ConfigError::InvalidValue {
                    field: "provider.url",
                    reason: "all_signs provider has no default endpoint".into(),
                }
                .into()),
            },
        }
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.cache.timezone.parse::<Tz>().map_err(|e| {
            ConfigError::InvalidValue {
                field: "cache.timezone",
                reason: e.to_string(),
            }
            .into()
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.provider.timeout_secs)
    }

    pub fn error_timeout(&self) -> Duration {
        Duration::from_secs(self.display.error_timeout_secs)
    }
}
