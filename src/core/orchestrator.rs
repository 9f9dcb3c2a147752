use crate::core::api::DEFAULT_NEWS_LOCATION;
use crate::core::{DisasterApi, MapWidget, Renderer};
use crate::domain::model::{AidRequest, DataSource, MessageKind, Page, PageState, SosAlert};
use crate::utils::error::{ApiError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Outcome of one independent source in a parallel load.
#[derive(Debug)]
pub enum FetchResult<T> {
    Success(T),
    Failure(ApiError),
}

impl<T> From<Result<T>> for FetchResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => FetchResult::Success(value),
            Err(e) => FetchResult::Failure(e),
        }
    }
}

impl<T> FetchResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success(_))
    }
}

impl<T: Default> FetchResult<T> {
    /// The value, or the empty default with the failed source reported back.
    pub fn degrade(self, source: DataSource) -> (T, Option<DataSource>) {
        match self {
            FetchResult::Success(value) => (value, None),
            FetchResult::Failure(e) => {
                tracing::error!("Failed to load {:?}: {}", source, e);
                (T::default(), Some(source))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Data was fetched; `degraded` lists sources rendered empty after failing.
    Loaded { degraded: Vec<DataSource> },
    AlreadyLoaded,
    /// Another activation of the same page is still running.
    InProgress,
    UnknownPage,
}

/// Everything the orchestrator remembers for one session.
#[derive(Debug, Clone)]
pub struct SessionState {
    pages: HashMap<Page, PageState>,
    map_initialized: bool,
    current_page: Page,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            pages: Page::ALL
                .into_iter()
                .map(|page| (page, PageState::NotLoaded))
                .collect(),
            map_initialized: false,
            current_page: Page::Dashboard,
        }
    }
}

impl SessionState {
    pub fn page_state(&self, page: Page) -> PageState {
        self.pages.get(&page).copied().unwrap_or(PageState::NotLoaded)
    }

    fn set(&mut self, page: Page, state: PageState) {
        self.pages.insert(page, state);
    }
}

fn lock_session(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Rolls a page back to `NotLoaded` and hides the loader if the load future
/// is dropped before it finishes.
struct LoadGuard<'a, R: Renderer> {
    state: &'a Mutex<SessionState>,
    renderer: &'a R,
    page: Page,
    armed: bool,
}

impl<'a, R: Renderer> LoadGuard<'a, R> {
    fn new(state: &'a Mutex<SessionState>, renderer: &'a R, page: Page) -> Self {
        Self {
            state,
            renderer,
            page,
            armed: true,
        }
    }

    fn finish(mut self) {
        self.armed = false;
    }
}

impl<R: Renderer> Drop for LoadGuard<'_, R> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::warn!("⚠️ Load of {} was cancelled", self.page);
        let mut state = lock_session(self.state);
        if state.page_state(self.page) == PageState::Loading {
            state.set(self.page, PageState::NotLoaded);
        }
        drop(state);
        self.renderer.set_loading(false);
    }
}

pub struct PageOrchestrator<A: DisasterApi, R: Renderer, M: MapWidget> {
    api: A,
    renderer: R,
    map: M,
    state: Mutex<SessionState>,
}

impl<A: DisasterApi, R: Renderer, M: MapWidget> PageOrchestrator<A, R, M> {
    pub fn new(api: A, renderer: R, map: M) -> Self {
        Self {
            api,
            renderer,
            map,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub async fn page_state(&self, page: Page) -> PageState {
        lock_session(&self.state).page_state(page)
    }

    pub async fn is_loaded(&self, page: Page) -> bool {
        self.page_state(page).await == PageState::Loaded
    }

    pub async fn current_page(&self) -> Page {
        lock_session(&self.state).current_page
    }

    /// Forgets a page's data so the next activation fetches again.
    /// A load already in flight is left alone.
    pub async fn invalidate(&self, page: Page) {
        let mut state = lock_session(&self.state);
        if state.page_state(page) == PageState::Loaded {
            tracing::debug!("invalidating {}", page);
            state.set(page, PageState::NotLoaded);
        }
    }

    /// String entry point; unknown ids are logged and ignored.
    pub async fn load_page_by_id(&self, page_id: &str) -> Result<LoadOutcome> {
        match page_id.parse::<Page>() {
            Ok(page) => self.load_page(page).await,
            Err(reason) => {
                tracing::warn!("⚠️ {}", reason);
                Ok(LoadOutcome::UnknownPage)
            }
        }
    }

    pub async fn load_page(&self, page: Page) -> Result<LoadOutcome> {
        {
            let mut state = lock_session(&self.state);
            state.current_page = page;
            match state.page_state(page) {
                PageState::Loaded => {
                    drop(state);
                    if page == Page::Dashboard {
                        self.map.invalidate_map_size();
                    }
                    return Ok(LoadOutcome::AlreadyLoaded);
                }
                PageState::Loading => {
                    tracing::debug!("{} is already loading, ignoring activation", page);
                    return Ok(LoadOutcome::InProgress);
                }
                PageState::NotLoaded => state.set(page, PageState::Loading),
            }
        }

        tracing::info!("📥 Loading page data for: {}", page);
        self.renderer.set_loading(true);
        let guard = LoadGuard::new(&self.state, &self.renderer, page);

        let result = match page {
            Page::Dashboard => self.load_dashboard().await,
            Page::Prepare => self.load_prepare().await,
            Page::Respond => Ok(Vec::new()),
            Page::Recovery => self.load_recovery().await,
        };

        guard.finish();
        self.renderer.set_loading(false);

        let mut state = lock_session(&self.state);
        match result {
            Ok(degraded) => {
                state.set(page, PageState::Loaded);
                drop(state);
                if degraded.is_empty() {
                    tracing::info!("✅ Page data loaded successfully for: {}", page);
                } else {
                    tracing::warn!("Page {} loaded with degraded sources: {:?}", page, degraded);
                    self.renderer.show_message(
                        &format!("Some {} data could not be loaded", page),
                        MessageKind::Error,
                    );
                }
                Ok(LoadOutcome::Loaded { degraded })
            }
            Err(e) => {
                state.set(page, PageState::NotLoaded);
                drop(state);
                tracing::error!("❌ Failed to load data for {}: {}", page, e);
                self.renderer
                    .show_message(&e.user_friendly_message(), MessageKind::Error);
                Err(e)
            }
        }
    }

    async fn load_dashboard(&self) -> Result<Vec<DataSource>> {
        let needs_init = {
            let mut state = lock_session(&self.state);
            !std::mem::replace(&mut state.map_initialized, true)
        };
        if needs_init {
            tracing::debug!("Initializing map...");
            self.map.init_map();
        }

        let news = async {
            let (articles, failed) =
                FetchResult::from(self.api.get_news(DEFAULT_NEWS_LOCATION).await)
                    .degrade(DataSource::News);
            tracing::debug!("News data loaded: {} articles", articles.len());
            self.renderer.render_news(&articles);
            failed
        };
        let shelters = async {
            let (shelters, failed) =
                FetchResult::from(self.api.get_shelters().await).degrade(DataSource::Shelters);
            tracing::debug!("Shelters data loaded: {} shelters", shelters.len());
            self.map.add_shelter_markers(&shelters);
            failed
        };
        let (news_failed, shelters_failed) = tokio::join!(news, shelters);

        self.map.invalidate_map_size();
        Ok(news_failed.into_iter().chain(shelters_failed).collect())
    }

    async fn load_prepare(&self) -> Result<Vec<DataSource>> {
        let kit = async {
            let (items, failed) =
                FetchResult::from(self.api.get_kit_items().await).degrade(DataSource::KitItems);
            self.renderer.render_kit_items(&items);
            failed
        };
        let instructions = async {
            let (instructions, failed) = FetchResult::from(self.api.get_instructions().await)
                .degrade(DataSource::Instructions);
            self.renderer.render_instructions(&instructions);
            failed
        };
        let (kit_failed, instructions_failed) = tokio::join!(kit, instructions);

        Ok(kit_failed.into_iter().chain(instructions_failed).collect())
    }

    async fn load_recovery(&self) -> Result<Vec<DataSource>> {
        match self.api.get_organizations().await {
            Ok(organizations) => {
                tracing::debug!("Organizations loaded: {}", organizations.len());
                self.renderer.render_organizations(&organizations);
                Ok(Vec::new())
            }
            Err(e) => {
                self.renderer.render_organizations(&[]);
                Err(e)
            }
        }
    }

    /// Refreshes the location-specific news panel. A blank category means `disaster`.
    pub async fn update_location_news(&self, location: &str, category: &str) -> Result<usize> {
        let location = location.trim();
        if location.is_empty() {
            self.renderer
                .show_message("Please enter a location", MessageKind::Error);
            return Err(ApiError::validation(
                vec!["location".to_string()],
                "Location is required",
            ));
        }

        match self
            .api
            .get_location_news(location, category)
            .await
        {
            Ok(articles) => {
                self.renderer.render_location_news(&articles);
                self.renderer.show_message(
                    &format!("News updated for {}", location),
                    MessageKind::Success,
                );
                Ok(articles.len())
            }
            Err(e) => {
                tracing::error!("Error fetching location news: {}", e);
                self.renderer.render_location_news(&[]);
                self.renderer
                    .show_message("Failed to fetch location news", MessageKind::Error);
                Err(e)
            }
        }
    }

    pub async fn submit_sos(&self, alert: &SosAlert) -> Result<Value> {
        match self.api.send_sos_alert(alert).await {
            Ok(ack) => {
                tracing::info!("SOS alert sent successfully");
                self.renderer.show_message(
                    "SOS ALERT SENT! Emergency services have been notified. Help is on the way!",
                    MessageKind::Success,
                );
                Ok(ack)
            }
            Err(e) => {
                tracing::error!("Error sending SOS alert: {}", e);
                self.renderer
                    .show_message(&e.user_friendly_message(), MessageKind::Error);
                Err(e)
            }
        }
    }

    pub async fn submit_aid_request(&self, request: &AidRequest) -> Result<Value> {
        match self.api.submit_aid_request(request).await {
            Ok(ack) => {
                tracing::info!("Aid request submitted successfully");
                self.renderer.show_message(
                    "Your aid request has been submitted successfully! Our team will contact you soon.",
                    MessageKind::Success,
                );
                Ok(ack)
            }
            Err(e) => {
                tracing::error!("Error submitting aid request: {}", e);
                self.renderer
                    .show_message(&e.user_friendly_message(), MessageKind::Error);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Instruction, KitItem, NewsArticle, NewsSource, Organization, Shelter};
    use crate::utils::error::ErrorKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex as StdMutex};
    use std::time::Duration;
    use tokio::sync::{Barrier, Notify};

    #[derive(Default)]
    struct FakeApi {
        calls: AtomicUsize,
        fail_news: bool,
        fail_shelters: bool,
        fail_kit: bool,
        fail_instructions: bool,
        fail_organizations: bool,
        organizations_gate: Option<Arc<Notify>>,
        // both sources of a page must be in flight to get past this
        rendezvous: Option<Arc<Barrier>>,
    }

    fn server_error() -> ApiError {
        ApiError::HttpStatus {
            code: 500,
            message: "HTTP 500: Internal Server Error".to_string(),
        }
    }

    impl FakeApi {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        async fn meet(&self) {
            if let Some(barrier) = &self.rendezvous {
                barrier.wait().await;
            }
        }

        fn answer<T>(&self, fail: bool, value: T) -> Result<T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if fail {
                Err(server_error())
            } else {
                Ok(value)
            }
        }
    }

    fn article(title: &str) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            url: "https://example.com".to_string(),
            published_at: "2024-05-24T10:00:00Z".to_string(),
            source: NewsSource {
                name: "Example".to_string(),
            },
            description: None,
        }
    }

    #[async_trait]
    impl DisasterApi for FakeApi {
        async fn get_news(&self, _location: &str) -> Result<Vec<NewsArticle>> {
            self.meet().await;
            self.answer(self.fail_news, vec![article("Flood alert")])
        }

        async fn get_location_news(&self, location: &str, _category: &str) -> Result<Vec<NewsArticle>> {
            self.answer(self.fail_news, vec![article(location)])
        }

        async fn get_kit_items(&self) -> Result<Vec<KitItem>> {
            self.meet().await;
            self.answer(
                self.fail_kit,
                vec![KitItem {
                    item_name: "Water".to_string(),
                    category: None,
                    description: None,
                }],
            )
        }

        async fn get_instructions(&self) -> Result<Vec<Instruction>> {
            self.meet().await;
            self.answer(
                self.fail_instructions,
                vec![Instruction {
                    title: "Drop, cover, hold".to_string(),
                    content: "Get under a table".to_string(),
                    disaster_type: Some("earthquake".to_string()),
                }],
            )
        }

        async fn get_shelters(&self) -> Result<Vec<Shelter>> {
            self.meet().await;
            self.answer(
                self.fail_shelters,
                vec![Shelter {
                    name: "Town hall".to_string(),
                    latitude: 20.29,
                    longitude: 85.82,
                    capacity: 200,
                    is_open: true,
                }],
            )
        }

        async fn send_sos_alert(&self, alert: &SosAlert) -> Result<Value> {
            crate::utils::validation::Validate::validate(alert)?;
            self.answer(false, serde_json::json!({"status": "sent"}))
        }

        async fn get_organizations(&self) -> Result<Vec<Organization>> {
            if let Some(gate) = &self.organizations_gate {
                gate.notified().await;
            }
            self.answer(
                self.fail_organizations,
                vec![Organization {
                    name: "Red Cross".to_string(),
                    org_type: Some("ngo".to_string()),
                    description: None,
                    contact: None,
                    email: None,
                    website: None,
                    address: None,
                }],
            )
        }

        async fn submit_aid_request(&self, request: &AidRequest) -> Result<Value> {
            crate::utils::validation::Validate::validate(request)?;
            self.answer(false, serde_json::json!({"id": 7}))
        }

        async fn health_check(&self) -> Result<Value> {
            self.answer(false, serde_json::json!({"status": "ok"}))
        }

        async fn test_database_connection(&self) -> Result<Value> {
            self.answer(false, serde_json::json!({"db": "ok"}))
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        events: StdMutex<Vec<String>>,
    }

    impl RecordingRenderer {
        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn has(&self, event: &str) -> bool {
            self.events().iter().any(|e| e == event)
        }
    }

    impl Renderer for RecordingRenderer {
        fn render_news(&self, articles: &[NewsArticle]) {
            self.push(format!("news:{}", articles.len()));
        }

        fn render_location_news(&self, articles: &[NewsArticle]) {
            self.push(format!("location_news:{}", articles.len()));
        }

        fn render_kit_items(&self, items: &[KitItem]) {
            self.push(format!("kit:{}", items.len()));
        }

        fn render_instructions(&self, instructions: &[Instruction]) {
            self.push(format!("instructions:{}", instructions.len()));
        }

        fn render_organizations(&self, organizations: &[Organization]) {
            self.push(format!("organizations:{}", organizations.len()));
        }

        fn show_message(&self, message: &str, kind: MessageKind) {
            self.push(format!("{:?}:{}", kind, message));
        }

        fn set_loading(&self, loading: bool) {
            self.push(format!("loading:{}", loading));
        }
    }

    #[derive(Default)]
    struct RecordingMap {
        inits: AtomicUsize,
        resizes: AtomicUsize,
        markers: StdMutex<Vec<usize>>,
    }

    impl MapWidget for RecordingMap {
        fn init_map(&self) {
            self.inits.fetch_add(1, Ordering::SeqCst);
        }

        fn add_shelter_markers(&self, shelters: &[Shelter]) {
            self.markers.lock().unwrap().push(shelters.len());
        }

        fn invalidate_map_size(&self) {
            self.resizes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn orchestrator(api: FakeApi) -> PageOrchestrator<FakeApi, RecordingRenderer, RecordingMap> {
        PageOrchestrator::new(api, RecordingRenderer::default(), RecordingMap::default())
    }

    #[tokio::test]
    async fn test_dashboard_loads_both_sources() {
        let orch = orchestrator(FakeApi::default());

        let outcome = orch.load_page(Page::Dashboard).await.unwrap();

        assert_eq!(outcome, LoadOutcome::Loaded { degraded: vec![] });
        assert!(orch.is_loaded(Page::Dashboard).await);
        assert_eq!(orch.api().calls(), 2);
        assert!(orch.renderer().has("news:1"));
        assert_eq!(*orch.map().markers.lock().unwrap(), vec![1]);
        assert_eq!(orch.map().inits.load(Ordering::SeqCst), 1);
        assert_eq!(
            orch.renderer().events().first().map(String::as_str),
            Some("loading:true")
        );
        assert!(orch.renderer().has("loading:false"));
    }

    #[tokio::test]
    async fn test_one_failed_source_degrades_but_page_loads() {
        let orch = orchestrator(FakeApi {
            fail_shelters: true,
            ..FakeApi::default()
        });

        let outcome = orch.load_page(Page::Dashboard).await.unwrap();

        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                degraded: vec![DataSource::Shelters]
            }
        );
        assert!(orch.is_loaded(Page::Dashboard).await);
        assert!(orch.renderer().has("news:1"));
        assert_eq!(*orch.map().markers.lock().unwrap(), vec![0]);
    }

    #[tokio::test]
    async fn test_prepare_both_sources_failing_still_loaded() {
        let orch = orchestrator(FakeApi {
            fail_kit: true,
            fail_instructions: true,
            ..FakeApi::default()
        });

        let outcome = orch.load_page(Page::Prepare).await.unwrap();

        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                degraded: vec![DataSource::KitItems, DataSource::Instructions]
            }
        );
        assert!(orch.renderer().has("kit:0"));
        assert!(orch.renderer().has("instructions:0"));
        assert!(orch.is_loaded(Page::Prepare).await);
    }

    #[tokio::test]
    async fn test_second_activation_makes_no_calls() {
        let orch = orchestrator(FakeApi::default());

        orch.load_page(Page::Dashboard).await.unwrap();
        let calls = orch.api().calls();
        let outcome = orch.load_page(Page::Dashboard).await.unwrap();

        assert_eq!(outcome, LoadOutcome::AlreadyLoaded);
        assert_eq!(orch.api().calls(), calls);
        assert_eq!(orch.map().inits.load(Ordering::SeqCst), 1);
        // once after the load, once as the refresh hook
        assert_eq!(orch.map().resizes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_single_source_failure_leaves_page_not_loaded() {
        let orch = orchestrator(FakeApi {
            fail_organizations: true,
            ..FakeApi::default()
        });

        let err = orch.load_page(Page::Recovery).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::HttpStatus(500));
        assert_eq!(orch.page_state(Page::Recovery).await, PageState::NotLoaded);
        assert!(orch.renderer().has("organizations:0"));
        assert!(orch.renderer().has("loading:false"));
        assert!(orch
            .renderer()
            .events()
            .iter()
            .any(|e| e.starts_with("Error:")));

        // a later activation retries from scratch
        orch.load_page(Page::Recovery).await.unwrap_err();
        assert_eq!(orch.api().calls(), 2);
    }

    #[tokio::test]
    async fn test_respond_page_has_no_sources() {
        let orch = orchestrator(FakeApi::default());

        let outcome = orch.load_page(Page::Respond).await.unwrap();

        assert_eq!(outcome, LoadOutcome::Loaded { degraded: vec![] });
        assert_eq!(orch.api().calls(), 0);
        assert!(orch.is_loaded(Page::Respond).await);
        assert_eq!(orch.current_page().await, Page::Respond);
    }

    #[tokio::test]
    async fn test_unknown_page_is_ignored() {
        let orch = orchestrator(FakeApi::default());

        let outcome = orch.load_page_by_id("settings").await.unwrap();

        assert_eq!(outcome, LoadOutcome::UnknownPage);
        assert_eq!(orch.api().calls(), 0);
        assert!(orch.renderer().events().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_activation_is_rejected_while_loading() {
        let gate = Arc::new(Notify::new());
        let orch = orchestrator(FakeApi {
            organizations_gate: Some(gate.clone()),
            ..FakeApi::default()
        });

        let (first, second) = tokio::join!(orch.load_page(Page::Recovery), async {
            let outcome = orch.load_page(Page::Recovery).await;
            gate.notify_one();
            outcome
        });

        assert_eq!(first.unwrap(), LoadOutcome::Loaded { degraded: vec![] });
        assert_eq!(second.unwrap(), LoadOutcome::InProgress);
        assert_eq!(orch.api().calls(), 1);
    }

    #[tokio::test]
    async fn test_dashboard_sources_are_fetched_concurrently() {
        let orch = orchestrator(FakeApi {
            rendezvous: Some(Arc::new(Barrier::new(2))),
            ..FakeApi::default()
        });

        let outcome = tokio::time::timeout(Duration::from_secs(1), orch.load_page(Page::Dashboard))
            .await
            .expect("news and shelters should be in flight together");

        assert_eq!(outcome.unwrap(), LoadOutcome::Loaded { degraded: vec![] });
        assert_eq!(orch.api().calls(), 2);
    }

    #[tokio::test]
    async fn test_prepare_sources_are_fetched_concurrently() {
        let orch = orchestrator(FakeApi {
            rendezvous: Some(Arc::new(Barrier::new(2))),
            ..FakeApi::default()
        });

        let outcome = tokio::time::timeout(Duration::from_secs(1), orch.load_page(Page::Prepare))
            .await
            .expect("kit and instructions should be in flight together");

        assert_eq!(outcome.unwrap(), LoadOutcome::Loaded { degraded: vec![] });
        assert!(orch.renderer().has("kit:1"));
        assert!(orch.renderer().has("instructions:1"));
    }

    #[tokio::test]
    async fn test_cancelled_load_can_be_retried() {
        let gate = Arc::new(Notify::new());
        let orch = orchestrator(FakeApi {
            organizations_gate: Some(gate.clone()),
            ..FakeApi::default()
        });

        let first =
            tokio::time::timeout(Duration::from_millis(50), orch.load_page(Page::Recovery)).await;
        assert!(first.is_err());
        assert_eq!(orch.page_state(Page::Recovery).await, PageState::NotLoaded);
        assert_eq!(orch.renderer().events(), vec!["loading:true", "loading:false"]);

        gate.notify_one();
        let outcome = orch.load_page(Page::Recovery).await.unwrap();

        assert_eq!(outcome, LoadOutcome::Loaded { degraded: vec![] });
        assert!(orch.is_loaded(Page::Recovery).await);
        assert!(orch.renderer().has("organizations:1"));
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let orch = orchestrator(FakeApi::default());

        orch.load_page(Page::Prepare).await.unwrap();
        orch.invalidate(Page::Prepare).await;
        assert_eq!(orch.page_state(Page::Prepare).await, PageState::NotLoaded);

        orch.load_page(Page::Prepare).await.unwrap();
        assert_eq!(orch.api().calls(), 4);
    }

    #[tokio::test]
    async fn test_location_news_requires_location() {
        let orch = orchestrator(FakeApi::default());

        let err = orch.update_location_news("   ", "disaster").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(orch.api().calls(), 0);
        assert!(orch.renderer().has("Error:Please enter a location"));
    }

    #[tokio::test]
    async fn test_location_news_failure_renders_empty() {
        let orch = orchestrator(FakeApi {
            fail_news: true,
            ..FakeApi::default()
        });

        assert!(orch.update_location_news("Puri", "disaster").await.is_err());
        assert!(orch.renderer().has("location_news:0"));
        assert!(orch.renderer().has("Error:Failed to fetch location news"));
    }

    #[tokio::test]
    async fn test_location_news_success() {
        let orch = orchestrator(FakeApi::default());

        assert_eq!(orch.update_location_news(" Puri ", "").await.unwrap(), 1);
        assert!(orch.renderer().has("Success:News updated for Puri"));
    }

    #[tokio::test]
    async fn test_invalid_aid_request_is_reported() {
        let orch = orchestrator(FakeApi::default());
        let request = AidRequest {
            name: String::new(),
            location: "x".to_string(),
            aid_needed: "y".to_string(),
        };

        let err = orch.submit_aid_request(&request).await.unwrap_err();

        assert_eq!(err.invalid_fields(), ["name".to_string()]);
        assert_eq!(orch.api().calls(), 0);
        assert!(orch
            .renderer()
            .has("Error:Please fill in all required fields: name"));
    }

    #[tokio::test]
    async fn test_sos_success_notifies() {
        let orch = orchestrator(FakeApi::default());
        let alert = SosAlert {
            name: "Asha".to_string(),
            phone: "9876543210".to_string(),
            location: "Puri".to_string(),
            emergency_type: "flood".to_string(),
            message: "Help".to_string(),
        };

        let ack = orch.submit_sos(&alert).await.unwrap();

        assert_eq!(ack["status"], "sent");
        assert!(orch
            .renderer()
            .events()
            .iter()
            .any(|e| e.starts_with("Success:SOS ALERT SENT!")));
    }
}
