//! Search a remote recipe catalog and view recipe details.
//!
//! Layers, leaf first:
//! - [`SpoonacularClient`] issues the two HTTP calls and decodes JSON
//!   ([`RecipeApi`] is the seam for other backends and test doubles).
//! - [`RecipeRepository`] turns every failure into an empty list or `None`
//!   and logs the cause.
//! - [`RecipeStore`] holds observable summaries, loading and detail state
//!   and drives the repository from background tasks.
//!
//! ```no_run
//! use recipe_finder::{RecipeFinder, SearchQuery};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = RecipeFinder::builder().api_key("your-api-key").build()?;
//! store.initiate_search(SearchQuery::new().query("pasta").diet("vegetarian")).await?;
//! for recipe in store.summaries() {
//!     println!("{}: {}", recipe.id, recipe.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod form;
pub mod model;
pub mod repository;
pub mod store;
pub mod uniffi_bindings;

use std::sync::Arc;

pub use builder::{RecipeFinder, RecipeFinderBuilder};
pub use client::{RecipeApi, SpoonacularClient};
pub use config::ClientConfig;
pub use error::ApiError;
pub use form::SearchForm;
pub use model::{Ingredient, RecipeDetail, RecipeSummary, SearchQuery, SearchResult};
pub use repository::RecipeRepository;
pub use store::{LoadingState, RecipeStore};

/// Search once with the given configuration, without keeping any state.
/// Failures yield an empty list.
pub async fn search_recipes(
    config: &ClientConfig,
    query: &SearchQuery,
) -> Result<Vec<RecipeSummary>, ApiError> {
    let repository = RecipeRepository::new(Arc::new(SpoonacularClient::new(config)?));
    Ok(repository.search_recipes(query).await)
}

/// Fetch one recipe with the given configuration, without keeping any state.
/// Failures yield `None`.
pub async fn get_recipe_details(
    config: &ClientConfig,
    id: i64,
) -> Result<Option<RecipeDetail>, ApiError> {
    let repository = RecipeRepository::new(Arc::new(SpoonacularClient::new(config)?));
    Ok(repository.get_recipe_details(id).await)
}
