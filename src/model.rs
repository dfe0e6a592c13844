use serde::{Deserialize, Serialize};

/// Number of results requested per search unless overridden
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Filters for a catalog search. Every filter is optional; an absent filter
/// means "no constraint" and is left out of the request entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text term (recipe name or ingredients)
    pub query: Option<String>,
    /// Cuisine filter, e.g. "italian"
    pub cuisine: Option<String>,
    /// Diet filter, e.g. "vegetarian"
    pub diet: Option<String>,
    /// Upper bound on calories per serving
    pub max_calories: Option<u32>,
    /// Result count limit
    pub number: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: None,
            cuisine: None,
            diet: None,
            max_calories: None,
            number: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    pub fn diet(mut self, diet: impl Into<String>) -> Self {
        self.diet = Some(diet.into());
        self
    }

    pub fn max_calories(mut self, max_calories: u32) -> Self {
        self.max_calories = Some(max_calories);
        self
    }

    pub fn number(mut self, number: u32) -> Self {
        self.number = number;
        self
    }
}

/// One entry of a search response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub image_type: String,
}

/// A full search response. `results` is in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub results: Vec<RecipeSummary>,
    pub offset: u32,
    pub number: u32,
    pub total_results: u32,
}

/// An ingredient line as the catalog phrases it, e.g. "2 cups flour"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub original: String,
}

/// Recipe information as returned by the detail endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub servings: u32,
    pub ready_in_minutes: u32,
    /// `None` when the service sent `null` or omitted the field; an empty
    /// string is kept as `Some("")`.
    #[serde(default)]
    pub instructions: Option<String>,
    pub extended_ingredients: Vec<Ingredient>,
}

impl RecipeDetail {
    /// Instructions worth showing: absent and empty text are both `None`.
    pub fn display_instructions(&self) -> Option<&str> {
        self.instructions.as_deref().filter(|text| !text.is_empty())
    }
}
