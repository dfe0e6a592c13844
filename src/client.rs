use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::model::{RecipeDetail, SearchQuery, SearchResult};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Remote recipe catalog operations
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// Search the catalog. Absent filters are not sent.
    async fn search_recipes(&self, query: &SearchQuery) -> Result<SearchResult, ApiError>;

    /// Fetch full information for one recipe
    async fn get_recipe_details(&self, id: i64) -> Result<RecipeDetail, ApiError>;
}

/// HTTP client for the Spoonacular recipe API
pub struct SpoonacularClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SpoonacularClient {
    /// Create a client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::with_timeout(config, config.timeout())
    }

    /// Create a client from configuration with an explicit request timeout,
    /// ignoring `config.timeout_secs`
    pub fn with_timeout(
        config: &ClientConfig,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Builder(format!("Failed to create HTTP client: {}", e)))?;

        Ok(SpoonacularClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        SpoonacularClient {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        debug!("GET {}", path);
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("{} returned {}: {}", path, status, body);
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl RecipeApi for SpoonacularClient {
    async fn search_recipes(&self, query: &SearchQuery) -> Result<SearchResult, ApiError> {
        let params = search_params(query, &self.api_key);
        self.get_json("/recipes/complexSearch", &params).await
    }

    async fn get_recipe_details(&self, id: i64) -> Result<RecipeDetail, ApiError> {
        let params = detail_params(&self.api_key);
        self.get_json(&format!("/recipes/{}/information", id), &params)
            .await
    }
}

/// Query parameters for a search request, in the order they are sent.
/// Absent filters produce no parameter at all.
pub fn search_params(query: &SearchQuery, api_key: &str) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(6);
    if let Some(text) = &query.query {
        params.push(("query", text.clone()));
    }
    if let Some(cuisine) = &query.cuisine {
        params.push(("cuisine", cuisine.clone()));
    }
    if let Some(diet) = &query.diet {
        params.push(("diet", diet.clone()));
    }
    if let Some(max_calories) = query.max_calories {
        params.push(("maxCalories", max_calories.to_string()));
    }
    params.push(("number", query.number.to_string()));
    params.push(("apiKey", api_key.to_string()));
    params
}

/// Query parameters for a detail request
pub fn detail_params(api_key: &str) -> Vec<(&'static str, String)> {
    vec![
        ("includeNutrition", "false".to_string()),
        ("apiKey", api_key.to_string()),
    ]
}
