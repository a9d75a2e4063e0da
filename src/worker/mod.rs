//! Versioned offline cache driven by worker lifecycle events.
//!
//! A [`CacheController`] owns one cache bucket, named after the worker's
//! version string, and reacts to the three lifecycle events of its host:
//!
//! - **install** fetches the whole precache list and stores it, all or nothing;
//! - **activate** deletes every bucket belonging to another version;
//! - **fetch** answers GET requests from the bucket, falling back to the
//!   network on a miss without writing the result back.
//!
//! Storage and network are injected through the [`CacheStorage`] and
//! [`Network`] traits.

pub mod host;
pub mod network;
pub mod storage;

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use futures::future::try_join_all;
use reqwest::Method;
use url::Url;

use crate::config::WorkerConfig;
use crate::error::{Error, Result};

pub use host::{WorkerHandle, spawn_worker};
pub use network::{HttpNetwork, Network};
pub use storage::{CacheStorage, MemoryCacheStorage};

/// Lifecycle state of a worker version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Not installed yet, or the last install failed.
    Uninstalled,
    /// Precache fetch in progress.
    Installing,
    /// Bucket populated, waiting for activation.
    Installed,
    /// Stale buckets being deleted.
    Activating,
    /// Serving fetch events from the bucket.
    Active,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninstalled => "uninstalled",
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Activating => "activating",
            Self::Active => "active",
        };
        f.write_str(name)
    }
}

/// A request seen by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// HTTP method.
    pub method: Method,
    /// Request URL, absolute or relative to the worker scope.
    pub url: String,
    /// Request body, empty for GET.
    pub body: Bytes,
}

impl FetchRequest {
    /// Creates a request with an empty body.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: Bytes::new(),
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// A stored or freshly fetched response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in arrival order, values kept as raw bytes.
    pub headers: Vec<(String, Bytes)>,
    /// Response body.
    pub body: Bytes,
}

impl CachedResponse {
    /// Creates a response without headers.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Bytes>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns the first value of header `name`, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&Bytes> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Where a fetch answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    /// Served from the current bucket.
    Cache,
    /// Fetched from the network.
    Network,
}

/// Answer to an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// The response handed back to the page.
    pub response: CachedResponse,
    /// Whether the response came from the bucket or the network.
    pub source: ResponseSource,
}

/// Cache controller for one worker version.
pub struct CacheController<S: CacheStorage, N: Network> {
    cache_name: String,
    precache: Vec<String>,
    scope: Url,
    storage: Arc<S>,
    network: N,
    state: Mutex<WorkerState>,
}

impl<S: CacheStorage, N: Network> CacheController<S, N> {
    /// Creates a controller for the version described by `config`.
    ///
    /// `storage` is shared with other versions of the worker so that
    /// activation can see and delete their buckets.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured scope is unset or not an absolute
    /// URL.
    pub fn new(config: &WorkerConfig, storage: Arc<S>, network: N) -> Result<Self> {
        let scope = config
            .scope
            .as_deref()
            .ok_or(url::ParseError::RelativeUrlWithoutBase)?;
        Ok(Self {
            cache_name: config.cache_name.clone(),
            precache: config.precache.clone(),
            scope: Url::parse(scope)?,
            storage,
            network,
            state: Mutex::new(WorkerState::Uninstalled),
        })
    }

    /// Returns the name of the bucket this version owns.
    #[must_use]
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> WorkerState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolves `url` against the worker scope. The result is the cache key.
    ///
    /// Fragments never reach the server and are not part of the key.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` cannot be resolved.
    pub fn resolve(&self, url: &str) -> Result<String> {
        let mut resolved = self.scope.join(url)?;
        resolved.set_fragment(None);
        Ok(resolved.into())
    }

    /// Moves from `from` to `to`, or reports that `event` is not allowed now.
    fn transition(&self, event: &'static str, from: WorkerState, to: WorkerState) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != from {
            return Err(Error::InvalidState {
                event,
                state: *state,
            });
        }
        *state = to;
        Ok(())
    }

    fn set_state(&self, to: WorkerState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }

    /// Handles the install event.
    ///
    /// Returns once every precached resource has been fetched and stored, or
    /// as soon as one of them failed. Nothing is stored on failure and the
    /// worker goes back to [`WorkerState::Uninstalled`], so the host may
    /// retry.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker is not uninstalled, if any resource
    /// cannot be fetched or answers with a non-2xx status, or if storing
    /// the bucket fails.
    pub async fn install(&self) -> Result<()> {
        self.transition("install", WorkerState::Uninstalled, WorkerState::Installing)?;
        log::info!("Installing cache {}", self.cache_name);

        match self.fill_bucket().await {
            Ok(count) => {
                self.set_state(WorkerState::Installed);
                log::info!("Installed cache {} ({count} entries)", self.cache_name);
                Ok(())
            }
            Err(e) => {
                self.set_state(WorkerState::Uninstalled);
                log::error!("Install of cache {} failed: {e}", self.cache_name);
                Err(e)
            }
        }
    }

    async fn fill_bucket(&self) -> Result<usize> {
        let requests = self
            .precache
            .iter()
            .map(|url| self.resolve(url).map(FetchRequest::get))
            .collect::<Result<Vec<_>>>()?;

        let entries = try_join_all(requests.into_iter().map(|request| async move {
            let response = self.network.fetch(&request).await?;
            if !response.is_success() {
                return Err(Error::Fetch {
                    url: request.url,
                    status: response.status,
                });
            }
            Ok::<_, Error>((request.url, response))
        }))
        .await?;

        let count = entries.len();
        self.storage.put_all(&self.cache_name, entries).await?;
        Ok(count)
    }

    /// Handles the activate event and returns the names of deleted buckets.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker is not installed, or if listing or
    /// deleting buckets fails. The worker then stays installed.
    pub async fn activate(&self) -> Result<Vec<String>> {
        self.transition("activate", WorkerState::Installed, WorkerState::Activating)?;
        log::info!("Activating cache {}", self.cache_name);

        match self.delete_stale_buckets().await {
            Ok(deleted) => {
                self.set_state(WorkerState::Active);
                log::info!("Cache {} is active", self.cache_name);
                Ok(deleted)
            }
            Err(e) => {
                self.set_state(WorkerState::Installed);
                log::error!("Activation of cache {} failed: {e}", self.cache_name);
                Err(e)
            }
        }
    }

    async fn delete_stale_buckets(&self) -> Result<Vec<String>> {
        let stale: Vec<String> = self
            .storage
            .keys()
            .await?
            .into_iter()
            .filter(|name| *name != self.cache_name)
            .collect();

        try_join_all(stale.iter().map(|name| self.storage.delete(name))).await?;
        for name in &stale {
            log::info!("Deleted stale cache {name}");
        }
        Ok(stale)
    }

    /// Handles a fetch event.
    ///
    /// GET requests are answered from the bucket when present, otherwise
    /// from a single network fetch whose result is returned as is and not
    /// stored. Other methods go to the network without touching the bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker is not active, if the URL cannot be
    /// resolved, or if the network fetch fails.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome> {
        let state = self.state();
        if state != WorkerState::Active {
            return Err(Error::InvalidState {
                event: "fetch",
                state,
            });
        }

        let url = self.resolve(&request.url)?;
        if request.method != Method::GET {
            let forwarded = FetchRequest {
                method: request.method.clone(),
                url,
                body: request.body.clone(),
            };
            return self.from_network(&forwarded).await;
        }

        if let Some(response) = self.storage.match_url(&self.cache_name, &url).await? {
            log::debug!("Cache hit: {url}");
            return Ok(FetchOutcome {
                response,
                source: ResponseSource::Cache,
            });
        }

        log::debug!("Cache miss: {url}");
        self.from_network(&FetchRequest::get(url)).await
    }

    async fn from_network(&self, request: &FetchRequest) -> Result<FetchOutcome> {
        let response = self.network.fetch(request).await?;
        Ok(FetchOutcome {
            response,
            source: ResponseSource::Network,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Network double serving a fixed URL → response map.
    #[derive(Default)]
    struct FakeNetwork {
        responses: HashMap<String, CachedResponse>,
        offline: AtomicBool,
        unreachable: Option<String>,
        calls: AtomicUsize,
        seen: Mutex<Vec<FetchRequest>>,
    }

    const SCOPE: &str = "http://dash.test/app/";

    impl FakeNetwork {
        fn serving(urls: &[&str]) -> Self {
            let responses = urls
                .iter()
                .map(|u| {
                    let url = Url::parse(SCOPE).unwrap().join(u).unwrap().to_string();
                    let body = format!("body of {u}");
                    (url, CachedResponse::new(200, body))
                })
                .collect();
            Self {
                responses,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl Network for FakeNetwork {
        async fn fetch(&self, request: &FetchRequest) -> Result<CachedResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(request.clone());
            let unreachable = self.unreachable.as_deref() == Some(request.url.as_str());
            if unreachable || self.offline.load(Ordering::SeqCst) {
                return Err(Error::Network {
                    url: request.url.clone(),
                    reason: "offline".to_string(),
                });
            }
            Ok(self
                .responses
                .get(&request.url)
                .cloned()
                .unwrap_or_else(|| CachedResponse::new(404, "not found")))
        }
    }

    fn config(name: &str, precache: &[&str]) -> WorkerConfig {
        WorkerConfig::new()
            .with_cache_name(name)
            .with_precache(precache.iter().copied())
            .with_scope(SCOPE)
    }

    fn controller(
        name: &str,
        precache: &[&str],
        storage: &Arc<MemoryCacheStorage>,
        network: &Arc<FakeNetwork>,
    ) -> CacheController<MemoryCacheStorage, Arc<FakeNetwork>> {
        CacheController::new(&config(name, precache), Arc::clone(storage), Arc::clone(network))
            .unwrap()
    }

    async fn active(
        name: &str,
        precache: &[&str],
        storage: &Arc<MemoryCacheStorage>,
        network: &Arc<FakeNetwork>,
    ) -> CacheController<MemoryCacheStorage, Arc<FakeNetwork>> {
        let worker = controller(name, precache, storage, network);
        worker.install().await.unwrap();
        worker.activate().await.unwrap();
        worker
    }

    #[test]
    fn relative_scope_is_rejected() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let result = CacheController::new(
            &config("v1", &[]).with_scope("app/"),
            storage,
            FakeNetwork::default(),
        );
        assert!(matches!(result, Err(Error::Url(_))));
    }

    #[test]
    fn unset_scope_is_rejected() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let result = CacheController::new(&WorkerConfig::new(), storage, FakeNetwork::default());
        assert!(matches!(result, Err(Error::Url(_))));
    }

    #[tokio::test]
    async fn lifecycle_walks_through_states() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let network = Arc::new(FakeNetwork::serving(&["./", "a.css"]));
        let worker = controller("v1", &["./", "a.css"], &storage, &network);

        assert_eq!(worker.state(), WorkerState::Uninstalled);
        worker.install().await.unwrap();
        assert_eq!(worker.state(), WorkerState::Installed);
        worker.activate().await.unwrap();
        assert_eq!(worker.state(), WorkerState::Active);
    }

    #[tokio::test]
    async fn install_stores_every_precached_url() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let network = Arc::new(FakeNetwork::serving(&["./", "a.css", "js/app.js"]));
        let worker = controller("v1", &["./", "a.css", "js/app.js"], &storage, &network);

        worker.install().await.unwrap();

        assert_eq!(storage.entry_count("v1").await, Some(3));
        let index = storage
            .match_url("v1", "http://dash.test/app/")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(index.body, "body of ./");
    }

    #[tokio::test]
    async fn failed_fetch_fails_install_and_creates_no_bucket() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let network = Arc::new(FakeNetwork::serving(&["./", "a.css"]));
        network.offline.store(true, Ordering::SeqCst);
        let worker = controller("v1", &["./", "a.css"], &storage, &network);

        let err = worker.install().await.unwrap_err();

        assert!(matches!(err, Error::Network { .. }));
        assert_eq!(worker.state(), WorkerState::Uninstalled);
        assert!(!storage.has("v1").await);
    }

    #[tokio::test]
    async fn one_transport_failure_fails_the_whole_install() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let mut served = FakeNetwork::serving(&["./", "a.css"]);
        served.unreachable = Some("http://dash.test/app/a.css".to_string());
        let network = Arc::new(served);
        let worker = controller("v1", &["./", "a.css"], &storage, &network);

        let err = worker.install().await.unwrap_err();

        match err {
            Error::Network { url, .. } => assert_eq!(url, "http://dash.test/app/a.css"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(worker.state(), WorkerState::Uninstalled);
        assert!(storage.keys().await.unwrap().is_empty());
        let seen = network.seen.lock().unwrap();
        assert!(seen.iter().any(|r| r.url == "http://dash.test/app/"));
    }

    #[tokio::test]
    async fn missing_resource_fails_install() {
        let storage = Arc::new(MemoryCacheStorage::new());
        // a.css is not served and comes back as 404.
        let network = Arc::new(FakeNetwork::serving(&["./"]));
        let worker = controller("v1", &["./", "a.css"], &storage, &network);

        let err = worker.install().await.unwrap_err();

        match err {
            Error::Fetch { url, status } => {
                assert_eq!(url, "http://dash.test/app/a.css");
                assert_eq!(status, 404);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(storage.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_install_can_be_retried() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let network = Arc::new(FakeNetwork::serving(&["./"]));
        network.offline.store(true, Ordering::SeqCst);
        let worker = controller("v1", &["./"], &storage, &network);

        assert!(worker.install().await.is_err());
        network.offline.store(false, Ordering::SeqCst);
        worker.install().await.unwrap();

        assert_eq!(worker.state(), WorkerState::Installed);
        assert!(storage.has("v1").await);
    }

    #[tokio::test]
    async fn events_out_of_order_are_rejected() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let network = Arc::new(FakeNetwork::serving(&["./"]));
        let worker = controller("v1", &["./"], &storage, &network);

        let err = worker.activate().await.unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidState {
                event: "activate",
                state: WorkerState::Uninstalled
            }
        ));
        let err = worker.fetch(&FetchRequest::get("./")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidState { event: "fetch", .. }));

        worker.install().await.unwrap();
        let err = worker.install().await.unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidState {
                event: "install",
                state: WorkerState::Installed
            }
        ));
        assert_eq!(network.calls(), 1);
    }

    #[tokio::test]
    async fn upgrade_leaves_only_the_new_bucket() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let network = Arc::new(FakeNetwork::serving(&["./"]));

        let _v1 = active("V1", &["./"], &storage, &network).await;
        assert_eq!(storage.keys().await.unwrap(), vec!["V1"]);

        let v2 = controller("V2", &["./"], &storage, &network);
        v2.install().await.unwrap();
        assert_eq!(storage.keys().await.unwrap(), vec!["V1", "V2"]);

        let deleted = v2.activate().await.unwrap();
        assert_eq!(deleted, vec!["V1"]);
        assert_eq!(storage.keys().await.unwrap(), vec!["V2"]);
    }

    #[tokio::test]
    async fn activation_deletes_every_foreign_bucket() {
        let storage = Arc::new(MemoryCacheStorage::new());
        storage
            .put_all("old-a", vec![("x".to_string(), CachedResponse::new(200, ""))])
            .await
            .unwrap();
        storage.put_all("old-b", Vec::new()).await.unwrap();
        let network = Arc::new(FakeNetwork::serving(&["./"]));

        let _worker = active("current", &["./"], &storage, &network).await;

        assert_eq!(storage.keys().await.unwrap(), vec!["current"]);
    }

    #[tokio::test]
    async fn precached_urls_are_served_offline() {
        let precache = ["./", "a.css", "b.js"];
        let storage = Arc::new(MemoryCacheStorage::new());
        let network = Arc::new(FakeNetwork::serving(&precache));
        let worker = active("v1", &precache, &storage, &network).await;

        network.offline.store(true, Ordering::SeqCst);
        let calls_before = network.calls();
        for url in precache {
            let outcome = worker.fetch(&FetchRequest::get(url)).await.unwrap();
            assert_eq!(outcome.source, ResponseSource::Cache);
            assert_eq!(outcome.response.body, format!("body of {url}"));
        }
        assert_eq!(network.calls(), calls_before);
    }

    #[tokio::test]
    async fn absolute_request_url_hits_the_same_entry() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let network = Arc::new(FakeNetwork::serving(&["a.css"]));
        let worker = active("v1", &["a.css"], &storage, &network).await;

        let outcome = worker
            .fetch(&FetchRequest::get("http://dash.test/app/a.css"))
            .await
            .unwrap();
        assert_eq!(outcome.source, ResponseSource::Cache);
    }

    #[tokio::test]
    async fn fragment_does_not_change_the_cache_key() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let network = Arc::new(FakeNetwork::serving(&["a.css"]));
        let worker = active("v1", &["a.css"], &storage, &network).await;

        network.offline.store(true, Ordering::SeqCst);
        let outcome = worker.fetch(&FetchRequest::get("a.css#top")).await.unwrap();

        assert_eq!(outcome.source, ResponseSource::Cache);
        assert_eq!(outcome.response.body, "body of a.css");
        assert_eq!(
            worker.resolve("a.css#top").unwrap(),
            "http://dash.test/app/a.css"
        );
    }

    #[tokio::test]
    async fn miss_fetches_once_and_does_not_store() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let mut served = FakeNetwork::serving(&["./"]);
        served.responses.insert(
            "http://dash.test/app/late.json".to_string(),
            CachedResponse::new(201, "[1,2]").with_header("x-test", "yes"),
        );
        let network = Arc::new(served);
        let worker = active("v1", &["./"], &storage, &network).await;

        let entries_before = storage.entry_count("v1").await;
        let calls_before = network.calls();
        let outcome = worker.fetch(&FetchRequest::get("late.json")).await.unwrap();

        assert_eq!(outcome.source, ResponseSource::Network);
        assert_eq!(
            outcome.response,
            CachedResponse::new(201, "[1,2]").with_header("x-test", "yes")
        );
        assert_eq!(network.calls(), calls_before + 1);
        assert_eq!(storage.entry_count("v1").await, entries_before);
    }

    #[tokio::test]
    async fn miss_while_offline_propagates_network_error() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let network = Arc::new(FakeNetwork::serving(&["./"]));
        let worker = active("v1", &["./"], &storage, &network).await;

        network.offline.store(true, Ordering::SeqCst);
        let err = worker.fetch(&FetchRequest::get("nope")).await.unwrap_err();
        assert!(matches!(err, Error::Network { .. }));
    }

    #[tokio::test]
    async fn non_get_bypasses_the_cache() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let network = Arc::new(FakeNetwork::serving(&["./"]));
        let worker = active("v1", &["./"], &storage, &network).await;

        let entries_before = storage.entry_count("v1").await;
        let calls_before = network.calls();
        // "./" is cached, but a POST must still go to the network.
        let outcome = worker
            .fetch(&FetchRequest::new(Method::POST, "./").with_body("payload"))
            .await
            .unwrap();

        assert_eq!(outcome.source, ResponseSource::Network);
        assert_eq!(network.calls(), calls_before + 1);
        let last = network.seen.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.method, Method::POST);
        assert_eq!(last.body, "payload");
        assert_eq!(storage.entry_count("v1").await, entries_before);
    }

    #[test]
    fn success_range() {
        assert!(CachedResponse::new(200, "").is_success());
        assert!(CachedResponse::new(204, "").is_success());
        assert!(!CachedResponse::new(304, "").is_success());
        assert!(!CachedResponse::new(500, "").is_success());
    }

    #[test]
    fn state_display() {
        assert_eq!(WorkerState::Activating.to_string(), "activating");
        let err = Error::InvalidState {
            event: "fetch",
            state: WorkerState::Installed,
        };
        assert_eq!(err.to_string(), "cannot handle fetch while worker is installed");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone, Copy)]
        enum Event {
            Install,
            Activate,
            Fetch,
        }

        fn event() -> impl Strategy<Value = Event> {
            prop_oneof![Just(Event::Install), Just(Event::Activate), Just(Event::Fetch)]
        }

        proptest! {
            #[test]
            fn active_only_after_install_then_activate(events in proptest::collection::vec(event(), 0..8)) {
                let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
                rt.block_on(async {
                    let storage = Arc::new(MemoryCacheStorage::new());
                    let network = Arc::new(FakeNetwork::serving(&["./"]));
                    let worker = controller("v1", &["./"], &storage, &network);
                    let mut installed = false;
                    let mut activated = false;

                    for event in events {
                        match event {
                            Event::Install => {
                                let ok = worker.install().await.is_ok();
                                prop_assert_eq!(ok, !installed);
                                installed = true;
                            }
                            Event::Activate => {
                                let ok = worker.activate().await.is_ok();
                                prop_assert_eq!(ok, installed && !activated);
                                activated |= ok;
                            }
                            Event::Fetch => {
                                let ok = worker.fetch(&FetchRequest::get("./")).await.is_ok();
                                prop_assert_eq!(ok, activated);
                            }
                        }
                    }
                    prop_assert_eq!(worker.state() == WorkerState::Active, activated);
                    Ok(())
                })?;
            }
        }
    }
}
