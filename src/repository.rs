//! Failure-absorbing wrapper around [`RecipeApi`].
//!
//! Callers get either a value or an empty/absent result; the cause of a
//! failure is only written to the log.

use crate::client::RecipeApi;
use crate::model::{RecipeDetail, RecipeSummary, SearchQuery};
use log::{debug, error};
use std::sync::Arc;

#[derive(Clone)]
pub struct RecipeRepository {
    api: Arc<dyn RecipeApi>,
}

impl RecipeRepository {
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Self { api }
    }

    /// Summaries in display order, or an empty list if the search failed
    pub async fn search_recipes(&self, query: &SearchQuery) -> Vec<RecipeSummary> {
        match self.api.search_recipes(query).await {
            Ok(result) => {
                debug!(
                    "Search returned {} of {} recipes (offset {})",
                    result.results.len(),
                    result.total_results,
                    result.offset
                );
                result.results
            }
            Err(e) => {
                error!("Error fetching recipes: {}", e);
                Vec::new()
            }
        }
    }

    /// Recipe detail, or `None` if the fetch failed
    pub async fn get_recipe_details(&self, id: i64) -> Option<RecipeDetail> {
        match self.api.get_recipe_details(id).await {
            Ok(detail) => Some(detail),
            Err(e) => {
                error!("Error fetching recipe details for {}: {}", id, e);
                None
            }
        }
    }
}
