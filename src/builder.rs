use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::{ApiError, ClientConfig, RecipeRepository, RecipeStore, SpoonacularClient};

/// Builder for wiring a client, repository and store together
#[derive(Debug, Default)]
pub struct RecipeFinderBuilder {
    config: Option<ClientConfig>,
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl RecipeFinderBuilder {
    /// Start from a loaded configuration. Individual setters still override it.
    ///
    /// # Example
    /// ```
    /// use recipe_finder::{ClientConfig, RecipeFinder};
    ///
    /// let builder = RecipeFinder::builder()
    ///     .config(ClientConfig::new("your-api-key"));
    /// ```
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the API key sent with every request
    ///
    /// # Example
    /// ```
    /// use recipe_finder::RecipeFinder;
    ///
    /// let builder = RecipeFinder::builder()
    ///     .api_key("your-api-key");
    /// ```
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Point the client at a different service root
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// # Example
    /// ```
    /// use recipe_finder::RecipeFinder;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeFinder::builder()
    ///     .api_key("your-api-key")
    ///     .timeout(Duration::from_secs(30));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Resolve the effective client configuration
    ///
    /// # Errors
    /// Returns `ApiError::Builder` if no API key was given either directly or
    /// through `config()`.
    pub fn client_config(&self) -> Result<ClientConfig, ApiError> {
        let mut config = match (&self.config, &self.api_key) {
            (Some(config), _) => config.clone(),
            (None, Some(key)) => ClientConfig::new(key.clone()),
            (None, None) => {
                return Err(ApiError::Builder(
                    "No API key specified. Use .api_key() or .config()".to_string(),
                ))
            }
        };

        if let Some(key) = &self.api_key {
            config.api_key = key.clone();
        }
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }

        if config.api_key.trim().is_empty() {
            return Err(ApiError::Builder("API key cannot be empty".to_string()));
        }
        Ok(config)
    }

    /// Request timeout the client will use: the `timeout()` setter if given,
    /// otherwise the configured `timeout_secs`
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout
            .or_else(|| self.config.as_ref().and_then(ClientConfig::timeout))
    }

    /// Build a store whose background tasks run on the current tokio runtime
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_finder::{RecipeFinder, SearchQuery};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let store = RecipeFinder::builder().api_key("your-api-key").build()?;
    /// store.search(SearchQuery::new().query("pasta")).await;
    /// for recipe in store.summaries() {
    ///     println!("{} {}", recipe.id, recipe.title);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<RecipeStore, ApiError> {
        let handle = Handle::try_current().map_err(|e| {
            ApiError::Builder(format!("build() must be called inside a tokio runtime: {}", e))
        })?;
        self.build_with_handle(handle)
    }

    /// Build a store whose background tasks run on `handle`
    pub fn build_with_handle(self, handle: Handle) -> Result<RecipeStore, ApiError> {
        let config = self.client_config()?;
        let client = SpoonacularClient::with_timeout(&config, self.request_timeout())?;
        let repository = RecipeRepository::new(Arc::new(client));
        Ok(RecipeStore::new(repository, handle))
    }
}

/// Main entry point for the builder API
pub struct RecipeFinder;

impl RecipeFinder {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use recipe_finder::RecipeFinder;
    ///
    /// let builder = RecipeFinder::builder();
    /// ```
    pub fn builder() -> RecipeFinderBuilder {
        RecipeFinderBuilder::default()
    }
}
