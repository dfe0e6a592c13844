//! Observable search and detail state.
//!
//! Three cells (summaries, loading, detail) are held in `tokio::sync::watch`
//! channels. Every update replaces a whole value, so observers never see a
//! half-applied change.
//!
//! Each initiation takes a ticket from a per-concern counter. A completion is
//! published only if no newer request of the same kind was issued in the
//! meantime, so the latest request wins regardless of completion order.
//! A request dropped before it completes still clears its loading flag.

use crate::model::{RecipeDetail, RecipeSummary, SearchQuery};
use crate::repository::RecipeRepository;
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// In-flight flags, one per concern
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingState {
    pub searching: bool,
    pub fetching_detail: bool,
}

impl LoadingState {
    /// True while either a search or a detail fetch is outstanding
    pub fn is_loading(&self) -> bool {
        self.searching || self.fetching_detail
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Concern {
    Search,
    Detail,
}

struct Shared {
    repository: RecipeRepository,
    summaries: watch::Sender<Vec<RecipeSummary>>,
    loading: watch::Sender<LoadingState>,
    detail: watch::Sender<Option<RecipeDetail>>,
    search_ticket: Mutex<u64>,
    detail_ticket: Mutex<u64>,
}

impl Shared {
    fn ticket(&self, concern: Concern) -> MutexGuard<'_, u64> {
        let lock = match concern {
            Concern::Search => &self.search_ticket,
            Concern::Detail => &self.detail_ticket,
        };
        // A counter stays valid after a panic elsewhere
        lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_loading(&self, concern: Concern, value: bool) {
        self.loading.send_modify(|state| match concern {
            Concern::Search => state.searching = value,
            Concern::Detail => state.fetching_detail = value,
        });
    }

    /// Issue a ticket and mark the concern as loading
    fn begin(self: &Arc<Self>, concern: Concern) -> InFlight {
        let mut latest = self.ticket(concern);
        *latest += 1;
        self.set_loading(concern, true);
        InFlight {
            shared: Arc::clone(self),
            concern,
            ticket: *latest,
            settled: false,
        }
    }
}

/// One outstanding request. Dropping it unsettled (the future was cancelled
/// or the task aborted) clears the loading flag if it is still the latest.
struct InFlight {
    shared: Arc<Shared>,
    concern: Concern,
    ticket: u64,
    settled: bool,
}

impl InFlight {
    /// Run `publish` and clear loading if this is still the latest request
    fn complete(mut self, publish: impl FnOnce()) -> bool {
        self.settled = true;
        let latest = self.shared.ticket(self.concern);
        if *latest != self.ticket {
            return false;
        }
        publish();
        self.shared.set_loading(self.concern, false);
        true
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let latest = self.shared.ticket(self.concern);
        if *latest == self.ticket {
            debug!("{:?} request #{} dropped before completing", self.concern, self.ticket);
            self.shared.set_loading(self.concern, false);
        }
    }
}

/// State holder driving the repository on behalf of a presentation layer
#[derive(Clone)]
pub struct RecipeStore {
    shared: Arc<Shared>,
    handle: Handle,
}

impl RecipeStore {
    /// Create a store whose background tasks run on `handle`
    pub fn new(repository: RecipeRepository, handle: Handle) -> Self {
        let (summaries, _) = watch::channel(Vec::new());
        let (loading, _) = watch::channel(LoadingState::default());
        let (detail, _) = watch::channel(None);

        Self {
            shared: Arc::new(Shared {
                repository,
                summaries,
                loading,
                detail,
                search_ticket: Mutex::new(0),
                detail_ticket: Mutex::new(0),
            }),
            handle,
        }
    }

    /// Start a search in the background
    pub fn initiate_search(&self, query: SearchQuery) -> JoinHandle<()> {
        let request = self.shared.begin(Concern::Search);
        let store = self.clone();
        self.handle
            .spawn(async move { store.finish_search(request, query).await })
    }

    /// Start a detail fetch in the background
    pub fn initiate_detail_fetch(&self, id: i64) -> JoinHandle<()> {
        let request = self.shared.begin(Concern::Detail);
        let store = self.clone();
        self.handle
            .spawn(async move { store.finish_detail_fetch(request, id).await })
    }

    /// Run a search on the current task and publish its outcome
    pub async fn search(&self, query: SearchQuery) {
        let request = self.shared.begin(Concern::Search);
        self.finish_search(request, query).await
    }

    /// Run a detail fetch on the current task and publish its outcome
    pub async fn fetch_detail(&self, id: i64) {
        let request = self.shared.begin(Concern::Detail);
        self.finish_detail_fetch(request, id).await
    }

    async fn finish_search(&self, request: InFlight, query: SearchQuery) {
        let recipes = self.shared.repository.search_recipes(&query).await;
        let ticket = request.ticket;
        let published = request.complete(|| {
            self.shared.summaries.send_replace(recipes);
        });
        if !published {
            debug!("Discarding results of superseded search #{}", ticket);
        }
    }

    async fn finish_detail_fetch(&self, request: InFlight, id: i64) {
        let detail = self.shared.repository.get_recipe_details(id).await;
        let published = request.complete(|| {
            self.shared.detail.send_replace(detail);
        });
        if !published {
            debug!("Discarding details of recipe {} from superseded fetch", id);
        }
    }

    pub fn summaries(&self) -> Vec<RecipeSummary> {
        self.shared.summaries.borrow().clone()
    }

    pub fn loading(&self) -> LoadingState {
        *self.shared.loading.borrow()
    }

    pub fn is_loading(&self) -> bool {
        self.loading().is_loading()
    }

    pub fn detail(&self) -> Option<RecipeDetail> {
        self.shared.detail.borrow().clone()
    }

    pub fn subscribe_summaries(&self) -> watch::Receiver<Vec<RecipeSummary>> {
        self.shared.summaries.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<LoadingState> {
        self.shared.loading.subscribe()
    }

    pub fn subscribe_detail(&self) -> watch::Receiver<Option<RecipeDetail>> {
        self.shared.detail.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RecipeApi;
    use crate::error::ApiError;
    use crate::model::SearchResult;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn summary(id: i64, title: &str) -> RecipeSummary {
        RecipeSummary {
            id,
            title: title.to_string(),
            image: format!("{}.jpg", id),
            image_type: "jpg".to_string(),
        }
    }

    fn detail(id: i64) -> RecipeDetail {
        RecipeDetail {
            id,
            title: format!("Recipe {}", id),
            image: format!("{}.jpg", id),
            servings: 1,
            ready_in_minutes: 10,
            instructions: None,
            extended_ingredients: Vec::new(),
        }
    }

    /// Each request waits until the test releases its response
    #[derive(Default)]
    struct GatedApi {
        searches: Mutex<HashMap<String, oneshot::Receiver<Option<Vec<RecipeSummary>>>>>,
        details: Mutex<HashMap<i64, oneshot::Receiver<Option<RecipeDetail>>>>,
    }

    impl GatedApi {
        fn gate_search(&self, text: &str) -> oneshot::Sender<Option<Vec<RecipeSummary>>> {
            let (tx, rx) = oneshot::channel();
            self.searches.lock().unwrap().insert(text.to_string(), rx);
            tx
        }

        fn gate_detail(&self, id: i64) -> oneshot::Sender<Option<RecipeDetail>> {
            let (tx, rx) = oneshot::channel();
            self.details.lock().unwrap().insert(id, rx);
            tx
        }
    }

    #[async_trait]
    impl RecipeApi for GatedApi {
        async fn search_recipes(&self, query: &SearchQuery) -> Result<SearchResult, ApiError> {
            let key = query.query.clone().unwrap_or_default();
            let gate = self.searches.lock().unwrap().remove(&key).unwrap();
            match gate.await.unwrap() {
                Some(results) => Ok(SearchResult {
                    number: results.len() as u32,
                    total_results: results.len() as u32,
                    offset: 0,
                    results,
                }),
                None => Err(ApiError::Http { status: 503 }),
            }
        }

        async fn get_recipe_details(&self, id: i64) -> Result<RecipeDetail, ApiError> {
            let gate = self.details.lock().unwrap().remove(&id).unwrap();
            gate.await.unwrap().ok_or(ApiError::Http { status: 404 })
        }
    }

    fn store(api: Arc<GatedApi>) -> RecipeStore {
        RecipeStore::new(RecipeRepository::new(api), Handle::current())
    }

    #[tokio::test]
    async fn test_initial_state() {
        let store = store(Arc::new(GatedApi::default()));
        assert!(store.summaries().is_empty());
        assert_eq!(store.loading(), LoadingState::default());
        assert!(!store.is_loading());
        assert!(store.detail().is_none());
    }

    #[tokio::test]
    async fn test_search_sets_and_clears_loading() {
        let api = Arc::new(GatedApi::default());
        let release = api.gate_search("pasta");
        let store = store(api);

        let task = store.initiate_search(SearchQuery::new().query("pasta"));
        assert!(store.loading().searching);
        assert!(store.is_loading());

        release.send(Some(vec![summary(1, "Pasta")])).unwrap();
        task.await.unwrap();

        assert!(!store.is_loading());
        assert_eq!(store.summaries(), vec![summary(1, "Pasta")]);
    }

    #[tokio::test]
    async fn test_failed_search_publishes_empty_list() {
        let api = Arc::new(GatedApi::default());
        let first = api.gate_search("soup");
        let second = api.gate_search("stew");
        let store = store(api);

        let task = store.initiate_search(SearchQuery::new().query("soup"));
        first.send(Some(vec![summary(1, "Soup")])).unwrap();
        task.await.unwrap();
        assert_eq!(store.summaries().len(), 1);

        let task = store.initiate_search(SearchQuery::new().query("stew"));
        second.send(None).unwrap();
        task.await.unwrap();

        assert!(store.summaries().is_empty());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_latest_search_wins_over_late_completion() {
        let api = Arc::new(GatedApi::default());
        let first = api.gate_search("first");
        let second = api.gate_search("second");
        let store = store(api);

        let first_task = store.initiate_search(SearchQuery::new().query("first"));
        let second_task = store.initiate_search(SearchQuery::new().query("second"));

        second.send(Some(vec![summary(2, "Second")])).unwrap();
        second_task.await.unwrap();
        assert_eq!(store.summaries(), vec![summary(2, "Second")]);
        assert!(!store.loading().searching);

        first.send(Some(vec![summary(1, "First")])).unwrap();
        first_task.await.unwrap();
        assert_eq!(store.summaries(), vec![summary(2, "Second")]);
        assert!(!store.loading().searching);
    }

    #[tokio::test]
    async fn test_loading_stays_on_until_latest_search_completes() {
        let api = Arc::new(GatedApi::default());
        let first = api.gate_search("first");
        let second = api.gate_search("second");
        let store = store(api);

        let first_task = store.initiate_search(SearchQuery::new().query("first"));
        let second_task = store.initiate_search(SearchQuery::new().query("second"));

        first.send(Some(vec![summary(1, "First")])).unwrap();
        first_task.await.unwrap();
        assert!(store.loading().searching);
        assert!(store.summaries().is_empty());

        second.send(Some(vec![summary(2, "Second")])).unwrap();
        second_task.await.unwrap();
        assert!(!store.loading().searching);
    }

    #[tokio::test]
    async fn test_detail_fetch() {
        let api = Arc::new(GatedApi::default());
        let release = api.gate_detail(5);
        let store = store(api);

        let task = store.initiate_detail_fetch(5);
        assert!(store.loading().fetching_detail);
        assert!(!store.loading().searching);

        release.send(Some(detail(5))).unwrap();
        task.await.unwrap();

        assert_eq!(store.detail(), Some(detail(5)));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_failed_detail_fetch_clears_detail() {
        let api = Arc::new(GatedApi::default());
        let ok = api.gate_detail(1);
        let missing = api.gate_detail(2);
        let store = store(api);

        let task = store.initiate_detail_fetch(1);
        ok.send(Some(detail(1))).unwrap();
        task.await.unwrap();
        assert!(store.detail().is_some());

        let task = store.initiate_detail_fetch(2);
        missing.send(None).unwrap();
        task.await.unwrap();
        assert!(store.detail().is_none());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_search_and_detail_loading_are_independent() {
        let api = Arc::new(GatedApi::default());
        let search = api.gate_search("pie");
        let fetch = api.gate_detail(3);
        let store = store(api);

        let search_task = store.initiate_search(SearchQuery::new().query("pie"));
        let detail_task = store.initiate_detail_fetch(3);

        fetch.send(Some(detail(3))).unwrap();
        detail_task.await.unwrap();

        // The search is still outstanding
        assert!(store.loading().searching);
        assert!(!store.loading().fetching_detail);
        assert!(store.is_loading());

        search.send(Some(vec![summary(3, "Pie")])).unwrap();
        search_task.await.unwrap();
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_observers_see_whole_value_replacements() {
        let api = Arc::new(GatedApi::default());
        let release = api.gate_search("tacos");
        let store = store(api);

        let mut summaries = store.subscribe_summaries();
        let mut loading = store.subscribe_loading();
        assert!(summaries.borrow().is_empty());

        let task = store.initiate_search(SearchQuery::new().query("tacos"));
        assert!(loading.has_changed().unwrap());
        assert!(loading.borrow_and_update().searching);

        release
            .send(Some(vec![summary(1, "Tacos"), summary(2, "Tacos al pastor")]))
            .unwrap();
        summaries.changed().await.unwrap();
        assert_eq!(summaries.borrow_and_update().len(), 2);

        task.await.unwrap();
        assert!(!loading.borrow_and_update().searching);
    }

    #[tokio::test]
    async fn test_inline_search_and_fetch() {
        let api = Arc::new(GatedApi::default());
        let release_search = api.gate_search("curry");
        let release_detail = api.gate_detail(9);
        release_search.send(Some(vec![summary(9, "Curry")])).unwrap();
        release_detail.send(Some(detail(9))).unwrap();
        let store = store(api);

        store.search(SearchQuery::new().query("curry")).await;
        store.fetch_detail(9).await;

        assert_eq!(store.summaries()[0].id, 9);
        assert_eq!(store.detail().map(|d| d.id), Some(9));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_cancelled_search_clears_loading() {
        let api = Arc::new(GatedApi::default());
        let _never = api.gate_search("slow");
        let store = store(api);

        let outcome = tokio::time::timeout(
            Duration::from_millis(50),
            store.search(SearchQuery::new().query("slow")),
        )
        .await;

        assert!(outcome.is_err());
        assert!(!store.loading().searching);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_cancelled_detail_fetch_clears_loading() {
        let api = Arc::new(GatedApi::default());
        let _never = api.gate_detail(4);
        let store = store(api);

        let outcome = tokio::time::timeout(Duration::from_millis(50), store.fetch_detail(4)).await;

        assert!(outcome.is_err());
        assert!(!store.loading().fetching_detail);
        assert!(store.detail().is_none());
    }

    #[tokio::test]
    async fn test_aborted_background_search_clears_loading() {
        let api = Arc::new(GatedApi::default());
        let _never = api.gate_search("slow");
        let store = store(api);

        let task = store.initiate_search(SearchQuery::new().query("slow"));
        assert!(store.loading().searching);

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert!(!store.loading().searching);
    }

    #[tokio::test]
    async fn test_aborting_superseded_search_keeps_latest_loading() {
        let api = Arc::new(GatedApi::default());
        let _first = api.gate_search("first");
        let second = api.gate_search("second");
        let store = store(api);

        let first_task = store.initiate_search(SearchQuery::new().query("first"));
        let second_task = store.initiate_search(SearchQuery::new().query("second"));

        first_task.abort();
        assert!(first_task.await.unwrap_err().is_cancelled());
        assert!(store.loading().searching);

        second.send(Some(vec![summary(2, "Second")])).unwrap();
        second_task.await.unwrap();
        assert!(!store.loading().searching);
        assert_eq!(store.summaries(), vec![summary(2, "Second")]);
    }
}
