use crate::error::ApiError;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use config::builder::DefaultState;
use serde::Deserialize;
use std::time::Duration;

/// Connection settings for the recipe search service
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service root, e.g. "https://api.spoonacular.com"
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Key sent as the `apiKey` query parameter on every request
    pub api_key: String,
    /// Request timeout in seconds. Unset means the HTTP client's default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

pub fn default_base_url() -> String {
    "https://api.spoonacular.com".to_string()
}

impl ClientConfig {
    /// Configuration with the default endpoint and no timeout override
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            api_key: api_key.into(),
            timeout_secs: None,
        }
    }

    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_FINDER__ prefix
    /// 2. recipe_finder.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_FINDER__API_KEY
    pub fn load() -> Result<Self, ApiError> {
        load_config()
    }

    /// Like [`ClientConfig::load`], with `api_key` (when given) taking
    /// precedence over every other source
    pub fn load_with_api_key(api_key: Option<String>) -> Result<Self, ApiError> {
        let settings = layered_sources()
            .set_override_option("api_key", api_key)?
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Parse configuration from TOML text only, ignoring files and environment
    pub fn from_toml_str(toml: &str) -> Result<Self, ApiError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Load configuration from file and environment variables
///
/// See [`ClientConfig::load`] for the source priority.
pub fn load_config() -> Result<ClientConfig, ApiError> {
    let settings = layered_sources().build()?;
    Ok(settings.try_deserialize()?)
}

fn layered_sources() -> ConfigBuilder<DefaultState> {
    Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe_finder").required(false))
        // Use double underscore between prefix and key: RECIPE_FINDER__API_KEY
        .add_source(
            Environment::with_prefix("RECIPE_FINDER")
                .separator("__")
                .try_parsing(true),
        )
}
