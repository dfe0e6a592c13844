//! Plain-text rendering of search results and recipe details.

use crate::model::{RecipeDetail, RecipeSummary};

pub const NO_RESULTS: &str = "No recipes found.";
pub const NO_INSTRUCTIONS: &str = "No instructions available.";
pub const DETAIL_FAILED: &str = "Failed to load recipe details.";

/// One line per recipe, in the order given
pub fn format_results(recipes: &[RecipeSummary]) -> String {
    if recipes.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut out = String::from("Results:\n");
    for recipe in recipes {
        out.push_str(&format!("{:>8}  {}\n", recipe.id, recipe.title));
    }
    out
}

pub fn format_detail(detail: Option<&RecipeDetail>) -> String {
    let Some(detail) = detail else {
        return DETAIL_FAILED.to_string();
    };

    let mut out = format!("{}\n{}\n\n", detail.title, detail.image);
    out.push_str(&format!("Servings: {}\n", detail.servings));
    out.push_str(&format!("Ready in {} minutes\n\n", detail.ready_in_minutes));
    out.push_str("Ingredients:\n");
    for ingredient in &detail.extended_ingredients {
        out.push_str(&format!("- {}\n", ingredient.original));
    }
    out.push('\n');
    match detail.display_instructions() {
        Some(instructions) => out.push_str(&format!("Instructions:\n{}\n", instructions)),
        None => out.push_str(&format!("{}\n", NO_INSTRUCTIONS)),
    }
    out
}
