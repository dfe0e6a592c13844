//! UniFFI bindings for recipe-finder
//!
//! This module provides FFI-compatible types and an object wrapping
//! [`RecipeStore`] for use from iOS and Android. The object owns its own
//! tokio runtime; state changes are pushed to a foreign listener.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Runtime;
use tokio::sync::watch;

use crate::model::DEFAULT_PAGE_SIZE;
use crate::{
    ApiError, Ingredient, LoadingState, RecipeDetail, RecipeFinder, RecipeStore, RecipeSummary,
    SearchForm, SearchQuery,
};

// Re-export UniFFI macro
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible search result entry
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipeSummary {
    pub id: i64,
    pub title: String,
    /// Image URL
    pub image: String,
    /// Image format, e.g. "jpg"
    pub image_type: String,
}

impl From<RecipeSummary> for FfiRecipeSummary {
    fn from(summary: RecipeSummary) -> Self {
        FfiRecipeSummary {
            id: summary.id,
            title: summary.title,
            image: summary.image,
            image_type: summary.image_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiIngredient {
    pub id: i64,
    /// Ingredient line as written, e.g. "2 cups flour"
    pub original: String,
}

impl From<Ingredient> for FfiIngredient {
    fn from(ingredient: Ingredient) -> Self {
        FfiIngredient {
            id: ingredient.id,
            original: ingredient.original,
        }
    }
}

/// FFI-compatible recipe detail
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipeDetail {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub servings: u32,
    pub ready_in_minutes: u32,
    /// `None` when the catalog has no instructions; may also be empty
    pub instructions: Option<String>,
    pub ingredients: Vec<FfiIngredient>,
}

impl From<RecipeDetail> for FfiRecipeDetail {
    fn from(detail: RecipeDetail) -> Self {
        FfiRecipeDetail {
            id: detail.id,
            title: detail.title,
            image: detail.image,
            servings: detail.servings,
            ready_in_minutes: detail.ready_in_minutes,
            instructions: detail.instructions,
            ingredients: detail
                .extended_ingredients
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

/// Search filters; unset fields are not sent
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiSearchQuery {
    pub query: Option<String>,
    pub cuisine: Option<String>,
    pub diet: Option<String>,
    pub max_calories: Option<u32>,
    /// Result count (defaults to 10)
    pub number: Option<u32>,
}

impl From<FfiSearchQuery> for SearchQuery {
    fn from(ffi: FfiSearchQuery) -> Self {
        SearchQuery {
            query: ffi.query,
            cuisine: ffi.cuisine,
            diet: ffi.diet,
            max_calories: ffi.max_calories,
            number: ffi.number.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

/// Raw text from a search form; blank fields are ignored
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiSearchForm {
    pub query: String,
    pub cuisine: String,
    pub diet: String,
    pub max_calories: String,
}

impl From<FfiSearchForm> for SearchForm {
    fn from(ffi: FfiSearchForm) -> Self {
        SearchForm {
            query: ffi.query,
            cuisine: ffi.cuisine,
            diet: ffi.diet,
            max_calories: ffi.max_calories,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiLoadingState {
    pub searching: bool,
    pub fetching_detail: bool,
}

impl From<LoadingState> for FfiLoadingState {
    fn from(state: LoadingState) -> Self {
        FfiLoadingState {
            searching: state.searching,
            fetching_detail: state.fetching_detail,
        }
    }
}

/// Connection settings passed in by the host app
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiClientConfig {
    pub api_key: String,
    /// Optional service root (uses the public endpoint if not specified)
    pub base_url: Option<String>,
    /// Optional timeout in seconds (no timeout if not specified)
    pub timeout_seconds: Option<u64>,
}

/// FFI-compatible error type
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiRecipeError {
    /// Invalid configuration (missing key, unusable HTTP settings)
    ConfigError { message: String },
    /// Runtime error (tokio)
    RuntimeError { message: String },
}

impl fmt::Display for FfiRecipeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiRecipeError::ConfigError { message } => write!(f, "Config error: {}", message),
            FfiRecipeError::RuntimeError { message } => write!(f, "Runtime error: {}", message),
        }
    }
}

impl std::error::Error for FfiRecipeError {}

impl From<ApiError> for FfiRecipeError {
    fn from(err: ApiError) -> Self {
        FfiRecipeError::ConfigError {
            message: err.to_string(),
        }
    }
}

/// Receives state changes. Each callback is invoked once with the current
/// value on registration and then after every replacement.
#[cfg_attr(feature = "uniffi", uniffi::export(callback_interface))]
pub trait FfiStateListener: Send + Sync {
    fn on_summaries_changed(&self, summaries: Vec<FfiRecipeSummary>);
    fn on_loading_changed(&self, loading: FfiLoadingState);
    fn on_detail_changed(&self, detail: Option<FfiRecipeDetail>);
}

/// Search and detail state for one screen session
#[cfg_attr(feature = "uniffi", derive(uniffi::Object))]
pub struct FfiRecipeFinder {
    runtime: Runtime,
    store: RecipeStore,
}

#[cfg_attr(feature = "uniffi", uniffi::export)]
impl FfiRecipeFinder {
    #[cfg_attr(feature = "uniffi", uniffi::constructor)]
    pub fn new(config: FfiClientConfig) -> Result<Arc<Self>, FfiRecipeError> {
        let runtime = Runtime::new().map_err(|e| FfiRecipeError::RuntimeError {
            message: format!("Failed to create async runtime: {}", e),
        })?;

        let mut builder = RecipeFinder::builder().api_key(config.api_key);
        if let Some(base_url) = config.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(timeout_secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let store = builder.build_with_handle(runtime.handle().clone())?;

        Ok(Arc::new(FfiRecipeFinder { runtime, store }))
    }

    /// Start a search in the background
    pub fn initiate_search(&self, query: FfiSearchQuery) {
        drop(self.store.initiate_search(query.into()));
    }

    /// Start a search from raw form text in the background
    pub fn initiate_form_search(&self, form: FfiSearchForm) {
        let form: SearchForm = form.into();
        drop(self.store.initiate_search(form.to_query()));
    }

    /// Start a detail fetch in the background
    pub fn initiate_detail_fetch(&self, id: i64) {
        drop(self.store.initiate_detail_fetch(id));
    }

    /// Search and block the calling thread until results are published
    pub fn search_blocking(&self, query: FfiSearchQuery) -> Vec<FfiRecipeSummary> {
        self.runtime.block_on(self.store.search(query.into()));
        self.summaries()
    }

    /// Fetch details and block the calling thread until they are published
    pub fn fetch_detail_blocking(&self, id: i64) -> Option<FfiRecipeDetail> {
        self.runtime.block_on(self.store.fetch_detail(id));
        self.detail()
    }

    pub fn summaries(&self) -> Vec<FfiRecipeSummary> {
        self.store.summaries().into_iter().map(Into::into).collect()
    }

    pub fn loading(&self) -> FfiLoadingState {
        self.store.loading().into()
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn detail(&self) -> Option<FfiRecipeDetail> {
        self.store.detail().map(Into::into)
    }

    /// Push every state change to `listener` until this object is dropped
    pub fn observe(&self, listener: Box<dyn FfiStateListener>) {
        let listener: Arc<dyn FfiStateListener> = Arc::from(listener);

        let target = Arc::clone(&listener);
        self.forward(self.store.subscribe_summaries(), move |summaries| {
            target.on_summaries_changed(summaries.into_iter().map(Into::into).collect())
        });

        let target = Arc::clone(&listener);
        self.forward(self.store.subscribe_loading(), move |loading| {
            target.on_loading_changed(loading.into())
        });

        self.forward(self.store.subscribe_detail(), move |detail| {
            listener.on_detail_changed(detail.map(Into::into))
        });
    }
}

impl FfiRecipeFinder {
    fn forward<T, F>(&self, mut rx: watch::Receiver<T>, notify: F)
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(T) + Send + 'static,
    {
        self.runtime.spawn(async move {
            let current = rx.borrow_and_update().clone();
            notify(current);
            while rx.changed().await.is_ok() {
                let value = rx.borrow_and_update().clone();
                notify(value);
            }
        });
    }
}

/// Get the library version
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
