//! Traversal engine - walks the related-artists graph.
//!
//! A session has two phases:
//!
//! 1. **Seeding** - featured collections are listed, their tracks' artists
//!    become the initial frontier, and the same ids are queued for batched
//!    detail lookups.
//! 2. **Exploring** - one catalog operation per iteration: drain the pending
//!    batches first, then expand one frontier id through its related artists,
//!    recording and enqueueing every artist not seen before.
//!
//! Rate limiting and token expiry never end the session; the interrupted
//! operation is retried after sleeping or refreshing the credential. Other
//! failures follow the configured [`FailurePolicy`].
//!
//! # Usage
//!
//! ```ignore
//! let mut explorer = Explorer::new(client, ExplorerConfig::default());
//! explorer.seed().await?;
//! let summary = explorer.explore().await?;
//! println!("{} artists", summary.artists_recorded);
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::Instant;

use super::batch::PendingBatches;
use super::budget::CooldownSchedule;
use super::frontier::Frontier;
use super::registry::{ArtistStore, Registry};
use super::shutdown::Shutdown;
use crate::catalog::{
    ArtistRecord, CatalogApi, CatalogError, FetchOutcome, MAX_ARTISTS_PER_REQUEST,
    MAX_FEATURED_LIMIT,
};

/// What to do when a lookup fails with an error that is not a rate limit or
/// an expired token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// End the session with the error
    #[default]
    Abort,
    /// Log the failure, drop the batch or id, and carry on
    Skip,
}

/// Configuration for an exploration session.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Featured collections to seed from (default: 50, the API maximum)
    pub featured_limit: u32,
    /// Ids per several-artists lookup (default: 50, the API maximum)
    pub batch_size: usize,
    /// Cool down every this many requests (default: 1500, 0 disables)
    pub cooldown_every: u64,
    /// Length of each cooldown (default: 30 seconds)
    pub cooldown: Duration,
    /// Handling of non-recoverable lookup failures (default: abort)
    pub failure_policy: FailurePolicy,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            featured_limit: MAX_FEATURED_LIMIT,
            batch_size: MAX_ARTISTS_PER_REQUEST,
            cooldown_every: 1500,
            cooldown: Duration::from_secs(30),
            failure_policy: FailurePolicy::Abort,
        }
    }
}

/// Where the explorer is in its control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorerState {
    /// Not started
    Idle,
    /// Listing featured collections and their artists
    Seeding,
    /// Looking up details for a pending batch
    DrainingBatch,
    /// Fetching related artists for one frontier id
    Expanding,
    /// Paused to stay under the request budget
    Cooldown,
    /// Re-acquiring an expired token
    RefreshingCredential,
    /// Frontier exhausted, or the session was cancelled
    Done,
}

/// Events emitted by the explorer.
#[derive(Debug, Clone)]
pub enum ExplorerEvent {
    /// Seeding finished
    SeedsReady { collections: usize, artists: usize },
    /// A new artist was added to the registry
    ArtistRecorded(ArtistRecord),
    /// The catalog asked us to back off
    RateLimited { retry_after: Duration },
    /// A fresh token was acquired after a 401
    CredentialRefreshed,
    /// Periodic self-imposed pause
    Cooldown {
        elapsed: Duration,
        requests_sent: u64,
        artists: usize,
    },
    /// A failing lookup was dropped (skip policy)
    ItemSkipped { item: String, error: String },
    /// The session ended
    Finished(SessionSummary),
}

/// Totals for a finished (or cancelled) session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Wall-clock start of the session
    pub started_at: Option<DateTime<Utc>>,
    pub requests_sent: u64,
    pub artists_recorded: usize,
    pub seeds: usize,
    pub expansions: u64,
    pub rate_limits: u64,
    pub credential_refreshes: u64,
    pub cooldowns: u64,
    pub skipped: u64,
    pub elapsed: Duration,
    pub cancelled: bool,
}

/// How an attempted operation resolved
enum Resolution<T> {
    /// Completed with a payload
    Done(T),
    /// Interrupted by a recoverable signal; try the same operation again
    Retry,
    /// Failed and dropped under the skip policy
    Skip,
}

/// The traversal engine.
pub struct Explorer<C, S = Registry> {
    catalog: C,
    registry: S,
    frontier: Frontier,
    batches: PendingBatches,
    /// Expansion interrupted by a recoverable signal
    retry_slot: Option<String>,
    cooldown: CooldownSchedule,
    config: ExplorerConfig,
    state: ExplorerState,
    summary: SessionSummary,
    started: Option<Instant>,
    shutdown: Option<Shutdown>,
    event_tx: Option<mpsc::Sender<ExplorerEvent>>,
}

impl<C: CatalogApi> Explorer<C, Registry> {
    /// Create an explorer with an empty in-memory registry.
    pub fn new(catalog: C, config: ExplorerConfig) -> Self {
        Self::with_store(catalog, Registry::new(), config)
    }
}

impl<C: CatalogApi, S: ArtistStore> Explorer<C, S> {
    /// Create an explorer recording into `registry`.
    pub fn with_store(catalog: C, registry: S, config: ExplorerConfig) -> Self {
        Self {
            catalog,
            registry,
            frontier: Frontier::new(),
            batches: PendingBatches::default(),
            retry_slot: None,
            cooldown: CooldownSchedule::new(config.cooldown_every, config.cooldown),
            config,
            state: ExplorerState::Idle,
            summary: SessionSummary::default(),
            started: None,
            shutdown: None,
            event_tx: None,
        }
    }

    /// Set the event sender for receiving updates.
    pub fn set_event_sender(&mut self, tx: mpsc::Sender<ExplorerEvent>) {
        self.event_tx = Some(tx);
    }

    /// Drop the event sender so the listener sees the channel close.
    pub fn close_events(&mut self) {
        self.event_tx = None;
    }

    /// Stop at the next checkpoint once `shutdown` is triggered.
    pub fn set_shutdown(&mut self, shutdown: Shutdown) {
        self.shutdown = Some(shutdown);
    }

    pub fn state(&self) -> ExplorerState {
        self.state
    }

    pub fn registry(&self) -> &S {
        &self.registry
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Seed, then explore until the frontier is exhausted.
    pub async fn run(&mut self) -> Result<SessionSummary, CatalogError> {
        self.seed().await?;
        self.explore().await
    }

    /// Discover seed artists from the featured collections.
    ///
    /// Returns the number of ids placed on the frontier.
    pub async fn seed(&mut self) -> Result<usize, CatalogError> {
        self.mark_started();
        self.state = ExplorerState::Seeding;

        let collections = self
            .discover_seed_collections()
            .await
            .map_err(|e| self.fail(e))?;
        let artist_ids = self
            .extract_artists_from_collections(&collections)
            .await
            .map_err(|e| self.fail(e))?;

        tracing::info!(
            target: "explorer",
            collections = collections.len(),
            "{} initial artists to start exploring from",
            artist_ids.len()
        );
        self.emit(ExplorerEvent::SeedsReady {
            collections: collections.len(),
            artists: artist_ids.len(),
        })
        .await;

        Ok(self.seed_with(artist_ids))
    }

    /// Seed from known artist ids, bypassing featured discovery.
    ///
    /// Ids go onto the frontier, and those not yet recorded are queued for
    /// detail lookups. Returns the number of ids newly placed on the frontier.
    pub fn seed_with(&mut self, ids: impl IntoIterator<Item = String>) -> usize {
        self.mark_started();

        let mut to_lookup = Vec::new();
        let mut added = 0;
        for id in ids {
            if self.frontier.push(id.clone()) {
                added += 1;
                if !self.registry.contains(&id) {
                    to_lookup.push(id);
                }
            }
        }

        self.batches.extend(to_lookup, self.config.batch_size);
        self.summary.seeds += added;
        added
    }

    /// Run the main loop until the frontier is exhausted or shutdown is requested.
    pub async fn explore(&mut self) -> Result<SessionSummary, CatalogError> {
        self.mark_started();

        loop {
            if self.is_cancelled() {
                tracing::info!(target: "explorer", "Shutdown requested, stopping");
                self.summary.cancelled = true;
                break;
            }

            if self.batches.head().is_some() {
                self.state = ExplorerState::DrainingBatch;
                self.drain_batch().await.map_err(|e| self.fail(e))?;
            } else if let Some(id) = self.retry_slot.take().or_else(|| self.frontier.pop()) {
                self.state = ExplorerState::Expanding;
                self.expand(id).await.map_err(|e| self.fail(e))?;
            } else {
                break;
            }

            self.maybe_cool_down().await;
        }

        self.state = ExplorerState::Done;
        let summary = self.snapshot();
        tracing::info!(
            target: "explorer",
            requests_sent = summary.requests_sent,
            artists = summary.artists_recorded,
            expansions = summary.expansions,
            elapsed = ?summary.elapsed,
            cancelled = summary.cancelled,
            "Exploration finished"
        );
        self.emit(ExplorerEvent::Finished(summary.clone())).await;
        Ok(summary)
    }

    /// Current totals
    pub fn snapshot(&self) -> SessionSummary {
        SessionSummary {
            requests_sent: self.catalog.requests_sent(),
            artists_recorded: self.registry.len(),
            elapsed: self.elapsed(),
            ..self.summary.clone()
        }
    }

    async fn discover_seed_collections(&mut self) -> Result<Vec<String>, CatalogError> {
        let limit = self.config.featured_limit;
        loop {
            if self.is_cancelled() {
                return Ok(Vec::new());
            }
            let outcome = self.catalog.featured_collections(limit).await;
            let resolution = self.resolve("featured collections", outcome).await?;
            self.maybe_cool_down().await;
            match resolution {
                Resolution::Done(ids) => return Ok(ids),
                Resolution::Retry => continue,
                Resolution::Skip => return Ok(Vec::new()),
            }
        }
    }

    async fn extract_artists_from_collections(
        &mut self,
        collections: &[String],
    ) -> Result<Vec<String>, CatalogError> {
        let mut artist_ids = IndexSet::new();

        for collection in collections {
            loop {
                if self.is_cancelled() {
                    return Ok(artist_ids.into_iter().collect());
                }
                let outcome = self.catalog.collection_artist_ids(collection).await;
                let label = format!("collection {}", collection);
                let resolution = self.resolve(&label, outcome).await?;
                self.maybe_cool_down().await;
                match resolution {
                    Resolution::Done(ids) => {
                        tracing::debug!(
                            target: "explorer",
                            collection = %collection,
                            artists = ids.len(),
                            "Collection listed"
                        );
                        artist_ids.extend(ids);
                        break;
                    }
                    Resolution::Retry => continue,
                    Resolution::Skip => break,
                }
            }
        }

        Ok(artist_ids.into_iter().collect())
    }

    /// Look up details for the head batch; it is only dropped once handled.
    ///
    /// Batch results are recorded but not enqueued: seed ids are already on
    /// the frontier.
    async fn drain_batch(&mut self) -> Result<(), CatalogError> {
        let Some(batch) = self.batches.head().map(<[String]>::to_vec) else {
            return Ok(());
        };

        let outcome = self.catalog.several_artists(&batch).await;
        let label = format!("batch of {} starting at {}", batch.len(), batch[0]);
        match self.resolve(&label, outcome).await? {
            Resolution::Done(artists) => {
                for artist in artists {
                    self.record(artist, false).await;
                }
                self.batches.complete();
            }
            Resolution::Retry => {}
            Resolution::Skip => {
                self.batches.complete();
            }
        }
        Ok(())
    }

    /// Expand one id through the related-artists edge.
    async fn expand(&mut self, id: String) -> Result<(), CatalogError> {
        let outcome = self.catalog.related_artists(&id).await;
        let label = format!("related artists of {}", id);
        match self.resolve(&label, outcome).await? {
            Resolution::Done(artists) => {
                self.summary.expansions += 1;
                for artist in artists {
                    self.record(artist, true).await;
                }
            }
            Resolution::Retry => self.retry_slot = Some(id),
            Resolution::Skip => {}
        }
        Ok(())
    }

    /// Insert if absent; newly recorded artists are enqueued when `enqueue` is set.
    async fn record(&mut self, artist: ArtistRecord, enqueue: bool) {
        if self.registry.contains(&artist.id) {
            return;
        }

        let id = artist.id.clone();
        tracing::info!(
            target: "explorer",
            id = %artist.id,
            name = %artist.name,
            genres = ?artist.genres,
            popularity = artist.popularity,
            "Recorded artist"
        );
        self.emit(ExplorerEvent::ArtistRecorded(artist.clone())).await;
        self.registry.insert(artist);

        if enqueue {
            self.frontier.push(id);
        }
    }

    /// Turn a fetch result into a resolution, recovering from signals.
    async fn resolve<T>(
        &mut self,
        label: &str,
        outcome: Result<FetchOutcome<T>, CatalogError>,
    ) -> Result<Resolution<T>, CatalogError> {
        match outcome {
            Ok(FetchOutcome::Success(value)) => Ok(Resolution::Done(value)),
            Ok(FetchOutcome::RateLimited { retry_after }) => {
                self.summary.rate_limits += 1;
                tracing::warn!(
                    target: "explorer",
                    operation = label,
                    "Rate limit hit, sleeping for {} seconds",
                    retry_after.as_secs()
                );
                self.emit(ExplorerEvent::RateLimited { retry_after }).await;
                self.pause(retry_after).await;
                Ok(Resolution::Retry)
            }
            Ok(FetchOutcome::CredentialExpired) => {
                let previous = self.state;
                self.state = ExplorerState::RefreshingCredential;
                tracing::info!(target: "explorer", operation = label, "Refreshing access token");
                self.catalog.refresh_credential().await?;
                self.summary.credential_refreshes += 1;
                self.emit(ExplorerEvent::CredentialRefreshed).await;
                self.state = previous;
                Ok(Resolution::Retry)
            }
            Err(e) if self.config.failure_policy == FailurePolicy::Skip && e.is_item_scoped() => {
                self.summary.skipped += 1;
                tracing::warn!(target: "explorer", operation = label, error = %e, "Skipping failed lookup");
                self.emit(ExplorerEvent::ItemSkipped {
                    item: label.to_string(),
                    error: e.to_string(),
                })
                .await;
                Ok(Resolution::Skip)
            }
            Err(e) => {
                tracing::error!(target: "explorer", operation = label, error = %e, "Lookup failed");
                Err(e)
            }
        }
    }

    /// A fatal error ends the session
    fn fail(&mut self, error: CatalogError) -> CatalogError {
        self.state = ExplorerState::Done;
        error
    }

    /// Cool down when the request counter hits the next budget multiple.
    async fn maybe_cool_down(&mut self) {
        let requests_sent = self.catalog.requests_sent();
        if !self.cooldown.is_due(requests_sent) {
            return;
        }

        let previous = self.state;
        self.state = ExplorerState::Cooldown;
        self.summary.cooldowns += 1;

        let elapsed = self.elapsed();
        let artists = self.registry.len();
        let duration = self.cooldown.duration();
        tracing::info!(
            target: "explorer",
            elapsed = ?elapsed,
            requests_sent,
            artists,
            "Cooling down for {:?}",
            duration
        );
        self.emit(ExplorerEvent::Cooldown {
            elapsed,
            requests_sent,
            artists,
        })
        .await;

        self.pause(duration).await;
        self.state = previous;
    }

    /// Sleep, waking early on shutdown
    async fn pause(&mut self, duration: Duration) {
        match self.shutdown.as_mut() {
            Some(shutdown) => {
                shutdown.sleep(duration).await;
            }
            None => tokio::time::sleep(duration).await,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.shutdown.as_ref().is_some_and(Shutdown::is_triggered)
    }

    fn mark_started(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
            self.summary.started_at = Some(Utc::now());
        }
    }

    fn elapsed(&self) -> Duration {
        self.started.map(|s| s.elapsed()).unwrap_or_default()
    }

    /// Emit an event to the listener (if any).
    async fn emit(&self, event: ExplorerEvent) {
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::auth::{ClientCredentials, CredentialManager};
    use crate::catalog::traits::mocks::{CatalogCall, Interruption, MockCatalog, ScriptedTransport};
    use crate::catalog::transport::{HttpResponse, TransportError};
    use crate::catalog::CatalogClient;
    use crate::explorer::shutdown::Shutdown;
    use crate::test_utils::{artists_body, rate_limited, seeds, token_body};
    use reqwest::StatusCode;

    fn explorer(catalog: MockCatalog) -> Explorer<MockCatalog> {
        Explorer::new(catalog, ExplorerConfig::default())
    }

    fn server_error() -> CatalogError {
        CatalogError::Status {
            status: 500,
            url: "https://api.example.test".to_string(),
            message: "Internal error".to_string(),
        }
    }

    fn scripted_client(transport: ScriptedTransport) -> CatalogClient<ScriptedTransport> {
        let credentials =
            ClientCredentials::new(Some("id".to_string()), Some("secret".to_string())).unwrap();
        CatalogClient::new(
            transport,
            CredentialManager::new(credentials, "https://accounts.example.test/api/token"),
        )
        .with_base_url("https://api.example.test/v1")
    }

    #[tokio::test]
    async fn test_shared_related_artist_recorded_once() {
        let catalog = MockCatalog::new()
            .with_related("A", &["C"])
            .with_related("B", &["C"]);
        let mut explorer = explorer(catalog);
        explorer.seed_with(seeds(&["A", "B"]));

        let summary = explorer.explore().await.unwrap();

        let ids: Vec<_> = explorer.registry().ids().collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(summary.artists_recorded, 3);
        assert_eq!(explorer.frontier().admitted(), 3);
        let catalog = explorer.catalog();
        assert_eq!(catalog.several_calls(), vec![seeds(&["A", "B"])]);
        assert_eq!(catalog.related_calls(), vec!["A", "B", "C"]);
        assert_eq!(explorer.state(), ExplorerState::Done);
    }

    #[tokio::test]
    async fn test_cycle_terminates() {
        let catalog = MockCatalog::new()
            .with_related("A", &["B"])
            .with_related("B", &["A"]);
        let mut explorer = explorer(catalog);
        explorer.seed_with(seeds(&["A"]));

        let summary = explorer.explore().await.unwrap();

        assert_eq!(summary.artists_recorded, 2);
        assert_eq!(explorer.catalog().related_calls(), vec!["A", "B"]);
        assert!(explorer.frontier().is_empty());
    }

    #[tokio::test]
    async fn test_self_reference_terminates() {
        let catalog = MockCatalog::new().with_related("A", &["A", "B"]).with_related("B", &["B"]);
        let mut explorer = explorer(catalog);
        explorer.seed_with(seeds(&["A"]));

        explorer.explore().await.unwrap();

        assert_eq!(explorer.catalog().related_calls(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_seeding_from_featured_collections() {
        let catalog = MockCatalog::new()
            .with_collection("p1", &["A", "B"])
            .with_collection("p2", &["B", "C"])
            .with_related("A", &["D"]);
        let mut explorer = explorer(catalog);

        let seeded = explorer.seed().await.unwrap();
        let summary = explorer.explore().await.unwrap();

        assert_eq!(seeded, 3);
        assert_eq!(summary.seeds, 3);
        let ids: Vec<_> = explorer.registry().ids().collect();
        assert_eq!(ids, vec!["A", "B", "C", "D"]);
        // Seeds are expanded too, D last
        assert_eq!(explorer.catalog().related_calls(), vec!["A", "B", "C", "D"]);
    }

    #[tokio::test]
    async fn test_seed_batches_are_chunked() {
        let ids: Vec<String> = (0..120).map(|i| format!("s{}", i)).collect();
        let mut explorer = explorer(MockCatalog::new());
        explorer.seed_with(ids.clone());

        explorer.explore().await.unwrap();

        let batches = explorer.catalog().several_calls();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches.concat(), ids);
        assert_eq!(explorer.registry().len(), 120);
    }

    #[tokio::test]
    async fn test_already_recorded_seeds_are_not_looked_up() {
        let mut registry = Registry::new();
        registry.insert(crate::test_utils::artist("A"));
        let mut explorer =
            Explorer::with_store(MockCatalog::new(), registry, ExplorerConfig::default());

        explorer.seed_with(seeds(&["A", "B"]));
        explorer.explore().await.unwrap();

        assert_eq!(explorer.catalog().several_calls(), vec![seeds(&["B"])]);
        assert_eq!(explorer.catalog().related_calls(), vec!["A", "B"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_expansion_is_retried() {
        let catalog = MockCatalog::new()
            .with_related("A", &["C"])
            .interrupt("related:A", Interruption::RateLimited(Duration::from_secs(7)));
        let mut explorer = explorer(catalog);
        explorer.seed_with(seeds(&["A", "B"]));
        let started = Instant::now();

        let summary = explorer.explore().await.unwrap();

        assert!(started.elapsed() >= Duration::from_secs(7));
        assert_eq!(summary.rate_limits, 1);
        assert_eq!(explorer.catalog().related_calls(), vec!["A", "A", "B", "C"]);
        assert!(explorer.registry().contains("C"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_batch_keeps_its_place() {
        let catalog = MockCatalog::new()
            .interrupt("several:A,B", Interruption::RateLimited(Duration::from_secs(3)));
        let mut explorer = explorer(catalog);
        explorer.seed_with(seeds(&["A", "B"]));

        explorer.explore().await.unwrap();

        assert_eq!(
            explorer.catalog().several_calls(),
            vec![seeds(&["A", "B"]), seeds(&["A", "B"])]
        );
        assert_eq!(explorer.registry().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_seeding_recovers_from_rate_limit_and_expired_credential() {
        let catalog = MockCatalog::new()
            .with_collection("p1", &["A", "B"])
            .interrupt("featured", Interruption::RateLimited(Duration::from_secs(4)))
            .interrupt("collection:p1", Interruption::CredentialExpired);
        let mut explorer = explorer(catalog);
        let started = Instant::now();

        let summary = explorer.run().await.unwrap();

        assert!(started.elapsed() >= Duration::from_secs(4));
        assert_eq!(summary.seeds, 2);
        assert_eq!(summary.rate_limits, 1);
        assert_eq!(summary.credential_refreshes, 1);
        let ids: Vec<_> = explorer.registry().ids().collect();
        assert_eq!(ids, vec!["A", "B"]);
        let calls = &explorer.catalog().calls;
        assert_eq!(
            calls[..5],
            [
                CatalogCall::Featured(ExplorerConfig::default().featured_limit),
                CatalogCall::Featured(ExplorerConfig::default().featured_limit),
                CatalogCall::Collection("p1".to_string()),
                CatalogCall::Refresh,
                CatalogCall::Collection("p1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_expired_credential_refreshed_and_retried() {
        let catalog = MockCatalog::new()
            .with_related("A", &["B"])
            .interrupt("related:A", Interruption::CredentialExpired);
        let mut explorer = explorer(catalog);
        explorer.seed_with(seeds(&["A"]));

        let summary = explorer.explore().await.unwrap();

        assert_eq!(explorer.catalog().refreshes, 1);
        assert_eq!(summary.credential_refreshes, 1);
        assert!(explorer.registry().contains("B"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_to_end_429_then_success_over_http() {
        let transport = ScriptedTransport::new()
            .on("/api/token", vec![Ok(HttpResponse::new(StatusCode::OK, token_body("t1")))])
            .on(
                "/artists?ids=",
                vec![Ok(HttpResponse::new(StatusCode::OK, artists_body(&["A", "B"])))],
            )
            .on(
                "/artists/A/related-artists",
                vec![
                    Ok(rate_limited(Some("7"))),
                    Ok(HttpResponse::new(StatusCode::OK, artists_body(&["C"]))),
                ],
            )
            .on(
                "/related-artists",
                vec![Ok(HttpResponse::new(StatusCode::OK, artists_body(&[])))],
            );
        let mut explorer = Explorer::new(scripted_client(transport.clone()), ExplorerConfig::default());
        explorer.seed_with(seeds(&["A", "B"]));
        let started = Instant::now();

        let summary = explorer.explore().await.unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(7) && elapsed < Duration::from_secs(8));
        assert_eq!(summary.rate_limits, 1);
        let ids: Vec<_> = explorer.registry().ids().collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(transport.requests_to("/artists/A/related-artists").len(), 2);
        assert_eq!(transport.requests_to("/artists/B/related-artists").len(), 1);
        assert_eq!(transport.requests_to("/artists/C/related-artists").len(), 1);
    }

    #[tokio::test]
    async fn test_end_to_end_401_then_success_over_http() {
        let transport = ScriptedTransport::new()
            .on(
                "/api/token",
                vec![
                    Ok(HttpResponse::new(StatusCode::OK, token_body("old"))),
                    Ok(HttpResponse::new(StatusCode::OK, token_body("new"))),
                ],
            )
            .on(
                "/artists?ids=",
                vec![
                    Ok(HttpResponse::new(StatusCode::UNAUTHORIZED, "")),
                    Ok(HttpResponse::new(StatusCode::OK, artists_body(&["A"]))),
                ],
            )
            .on(
                "/related-artists",
                vec![Ok(HttpResponse::new(StatusCode::OK, artists_body(&[])))],
            );
        let mut explorer = Explorer::new(scripted_client(transport.clone()), ExplorerConfig::default());
        explorer.seed_with(seeds(&["A"]));

        let summary = explorer.explore().await.unwrap();

        assert_eq!(summary.credential_refreshes, 1);
        assert_eq!(transport.requests_to("/api/token").len(), 2);
        assert_eq!(explorer.catalog().credentials().acquisitions(), 2);
        let tokens: Vec<_> = transport
            .requests()
            .iter()
            .filter_map(|r| r.bearer_token().map(str::to_owned))
            .collect();
        assert_eq!(tokens, vec!["old", "new", "new"]);
        assert!(explorer.registry().contains("A"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_on_budget_multiples() {
        let catalog = MockCatalog::new()
            .with_related("A", &["B"])
            .with_related("B", &["C"])
            .with_related("C", &["D"]);
        let config = ExplorerConfig {
            cooldown_every: 2,
            cooldown: Duration::from_secs(30),
            ..Default::default()
        };
        let mut explorer = Explorer::new(catalog, config);
        explorer.seed_with(seeds(&["A"]));
        let started = Instant::now();

        // 1 batch + 4 expansions = 5 requests -> cooldowns at 2 and 4
        let summary = explorer.explore().await.unwrap();

        assert_eq!(summary.requests_sent, 5);
        assert_eq!(summary.cooldowns, 2);
        assert!(started.elapsed() >= Duration::from_secs(60));
        assert!(started.elapsed() < Duration::from_secs(90));
    }

    #[tokio::test]
    async fn test_abort_policy_ends_session() {
        let catalog = MockCatalog::new()
            .with_related("A", &["B"])
            .interrupt("related:A", Interruption::Fail(server_error()));
        let mut explorer = explorer(catalog);
        explorer.seed_with(seeds(&["A"]));

        let err = explorer.explore().await.unwrap_err();

        assert!(matches!(err, CatalogError::Status { status: 500, .. }));
        assert!(!explorer.registry().contains("B"));
        assert_eq!(explorer.state(), ExplorerState::Done);
    }

    #[tokio::test]
    async fn test_failed_refresh_ends_session() {
        let catalog = MockCatalog::new()
            .with_related("A", &["B"])
            .interrupt("related:A", Interruption::CredentialExpired)
            .fail_refresh(CatalogError::Authentication {
                status: 400,
                message: "invalid_client".to_string(),
            });
        let mut explorer = explorer(catalog);
        explorer.seed_with(seeds(&["A"]));

        let err = explorer.explore().await.unwrap_err();

        assert!(matches!(err, CatalogError::Authentication { status: 400, .. }));
        assert_eq!(explorer.state(), ExplorerState::Done);
        assert_eq!(explorer.snapshot().credential_refreshes, 0);
    }

    #[tokio::test]
    async fn test_failed_seeding_ends_session() {
        let catalog = MockCatalog::new()
            .with_collection("p1", &["A"])
            .interrupt("collection:p1", Interruption::Fail(server_error()));
        let mut explorer = explorer(catalog);

        assert!(explorer.run().await.is_err());

        assert_eq!(explorer.state(), ExplorerState::Done);
        assert!(explorer.frontier().is_empty());
    }

    #[tokio::test]
    async fn test_skip_policy_drops_failing_items() {
        let catalog = MockCatalog::new()
            .with_related("A", &["C"])
            .with_related("B", &["D"])
            .interrupt("related:A", Interruption::Fail(server_error()))
            .interrupt(
                "several:A,B",
                Interruption::Fail(CatalogError::Transport(TransportError::Timeout)),
            );
        let config = ExplorerConfig {
            failure_policy: FailurePolicy::Skip,
            ..Default::default()
        };
        let mut explorer = Explorer::new(catalog, config);
        explorer.seed_with(seeds(&["A", "B"]));

        let summary = explorer.explore().await.unwrap();

        assert_eq!(summary.skipped, 2);
        let ids: Vec<_> = explorer.registry().ids().collect();
        assert_eq!(ids, vec!["D"]);
        assert_eq!(explorer.catalog().related_calls(), vec!["A", "B", "D"]);
    }

    #[tokio::test]
    async fn test_skip_policy_still_aborts_on_auth_failure() {
        let catalog = MockCatalog::new().interrupt(
            "related:A",
            Interruption::Fail(CatalogError::Authentication {
                status: 400,
                message: "invalid_client".to_string(),
            }),
        );
        let config = ExplorerConfig {
            failure_policy: FailurePolicy::Skip,
            ..Default::default()
        };
        let mut explorer = Explorer::new(catalog, config);
        explorer.seed_with(seeds(&["A"]));

        assert!(explorer.explore().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_backoff() {
        let catalog = MockCatalog::new()
            .with_related("A", &["B"])
            .interrupt("related:A", Interruption::RateLimited(Duration::from_secs(3600)));
        let mut explorer = explorer(catalog);
        let (trigger, shutdown) = Shutdown::new();
        explorer.set_shutdown(shutdown);
        explorer.seed_with(seeds(&["A"]));

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.trigger();
        });
        let started = Instant::now();
        let summary = explorer.explore().await.unwrap();

        assert!(summary.cancelled);
        assert!(started.elapsed() < Duration::from_secs(3600));
        assert!(!explorer.registry().contains("B"));
        assert_eq!(explorer.state(), ExplorerState::Done);
    }

    #[tokio::test]
    async fn test_events_are_emitted() {
        let catalog = MockCatalog::new()
            .with_collection("p1", &["A"])
            .with_related("A", &["B"]);
        let mut explorer = explorer(catalog);
        let (tx, mut rx) = mpsc::channel(64);
        explorer.set_event_sender(tx);

        explorer.run().await.unwrap();
        drop(explorer);

        let mut recorded = Vec::new();
        let mut seeds_ready = None;
        let mut finished = None;
        while let Some(event) = rx.recv().await {
            match event {
                ExplorerEvent::SeedsReady { collections, artists } => {
                    seeds_ready = Some((collections, artists))
                }
                ExplorerEvent::ArtistRecorded(artist) => recorded.push(artist.id),
                ExplorerEvent::Finished(summary) => finished = Some(summary),
                _ => {}
            }
        }

        assert_eq!(seeds_ready, Some((1, 1)));
        assert_eq!(recorded, vec!["A", "B"]);
        assert_eq!(finished.unwrap().artists_recorded, 2);
    }
}
