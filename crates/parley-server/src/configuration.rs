use crate::error::{to_env_var, ConfigError};
use config::{Config, Environment};
use parley::providers::configs::{
    AnthropicProviderConfig, ANTHROPIC_HOST, ANTHROPIC_MODEL, DEFAULT_MAX_TOKENS,
};
use serde::Deserialize;
use std::env;
use std::net::{AddrParseError, SocketAddr};

#[derive(Debug, Default, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[derive(Debug, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_anthropic_host")]
    pub host: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: Option<i32>,
}

impl ProviderSettings {
    pub fn into_config(self) -> AnthropicProviderConfig {
        AnthropicProviderConfig {
            host: self.host,
            api_key: self.api_key,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub provider: ProviderSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("provider.host", default_anthropic_host())?
            .set_default("provider.model", default_model())?
            .add_source(
                Environment::with_prefix("PARLEY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // the bare variables a plain deployment sets win over everything else
            .set_override_option("provider.api_key", env::var("ANTHROPIC_API_KEY").ok())?
            .set_override_option("server.port", env::var("PORT").ok())?
            .build()?;

        let settings: Self = config.try_deserialize().map_err(|err| {
            tracing::debug!("Configuration error: {:?}", &err);
            match err {
                config::ConfigError::NotFound(field) => ConfigError::MissingEnvVar {
                    env_var: to_env_var(&field),
                },
                err => ConfigError::Other(err),
            }
        })?;

        if settings.provider.api_key.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar {
                env_var: to_env_var("provider.api_key"),
            });
        }

        Ok(settings)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_model() -> String {
    ANTHROPIC_MODEL.to_string()
}

fn default_anthropic_host() -> String {
    ANTHROPIC_HOST.to_string()
}

fn default_max_tokens() -> Option<i32> {
    Some(DEFAULT_MAX_TOKENS)
}
