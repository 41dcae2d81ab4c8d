//! Model catalog cache.
//!
//! Keeps the last successful model listing and decides when to ask the
//! backend again. Two guarantees:
//!
//! - **Coalescing**: at most one `list_models` call is in flight at any
//!   time. Callers arriving while a refresh runs await that refresh and all
//!   observe the same outcome.
//! - **Stale fallback**: once any listing has succeeded, a failed refresh
//!   yields the previous snapshot marked [`Freshness::Stale`] instead of an
//!   error.
//!
//! The refresh itself runs on a spawned task, so a caller that stops
//! waiting (timeout, cancellation) does not abort it for everyone else.
//!
//! [`Freshness::Stale`]: llmgate_domain::Freshness::Stale

use crate::ports::model_backend::{BackendError, ModelBackend};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use llmgate_domain::{CatalogSnapshot, CatalogView};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Shortest period accepted by [`ModelCatalogCache::spawn_refresher`].
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// The catalog could not produce any listing, not even a stale one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Model catalog unavailable: {0}")]
    Unavailable(#[from] BackendError),
}

type RefreshResult = Result<Arc<CatalogSnapshot>, BackendError>;
type RefreshFuture = Shared<BoxFuture<'static, RefreshResult>>;

struct CachedSnapshot {
    snapshot: Arc<CatalogSnapshot>,
    loaded_at: Instant,
    invalidated: bool,
}

#[derive(Default)]
struct CacheState {
    current: Option<CachedSnapshot>,
    in_flight: Option<RefreshFuture>,
}

struct Inner {
    backend: Arc<dyn ModelBackend>,
    state: Mutex<CacheState>,
}

impl Inner {
    // The lock is never held across an await, so a poisoned guard still
    // protects consistent data.
    fn lock_state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run_refresh(&self) -> RefreshResult {
        debug!("Refreshing model catalog");
        let result = self.backend.list_models().await;

        let mut state = self.lock_state();
        state.in_flight = None;
        match result {
            Ok(models) => {
                let snapshot = Arc::new(CatalogSnapshot::new(models));
                info!("Model catalog refreshed: {} models", snapshot.len());
                state.current = Some(CachedSnapshot {
                    snapshot: Arc::clone(&snapshot),
                    loaded_at: Instant::now(),
                    invalidated: false,
                });
                Ok(snapshot)
            }
            Err(e) => {
                warn!("Model catalog refresh failed: {}", e);
                Err(e)
            }
        }
    }
}

/// Cached view of the backend's installed models.
///
/// Cheap to clone; clones share the same snapshot and in-flight refresh.
#[derive(Clone)]
pub struct ModelCatalogCache {
    inner: Arc<Inner>,
}

impl ModelCatalogCache {
    /// Create a cache with no snapshot yet
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                state: Mutex::new(CacheState::default()),
            }),
        }
    }

    /// Return the models, refreshing first if the snapshot is older than
    /// `max_age` (or was invalidated, or does not exist).
    pub async fn get_models(&self, max_age: Duration) -> Result<CatalogView, CatalogError> {
        let refresh = {
            let mut state = self.inner.lock_state();
            if let Some(cached) = &state.current
                && !cached.invalidated
                && cached.loaded_at.elapsed() <= max_age
            {
                return Ok(CatalogView::fresh(Arc::clone(&cached.snapshot)));
            }
            self.join_or_start_refresh(&mut state)
        };
        self.settle(refresh.await)
    }

    /// Refresh regardless of age. Joins a refresh already in flight.
    pub async fn force_refresh(&self) -> Result<CatalogView, CatalogError> {
        let refresh = {
            let mut state = self.inner.lock_state();
            self.join_or_start_refresh(&mut state)
        };
        self.settle(refresh.await)
    }

    /// Mark the current snapshot expired.
    ///
    /// The snapshot is kept as the stale fallback; the next
    /// [`get_models`](Self::get_models) goes to the backend.
    pub fn invalidate(&self) {
        if let Some(cached) = self.inner.lock_state().current.as_mut() {
            debug!("Model catalog invalidated");
            cached.invalidated = true;
        }
    }

    /// Latest successful snapshot, without any backend I/O
    pub fn current(&self) -> Option<Arc<CatalogSnapshot>> {
        self.inner
            .lock_state()
            .current
            .as_ref()
            .map(|c| Arc::clone(&c.snapshot))
    }

    /// Whether a refresh is currently running
    pub fn is_refreshing(&self) -> bool {
        self.inner.lock_state().in_flight.is_some()
    }

    /// Refresh the catalog every `interval` until `cancellation` fires.
    ///
    /// The first refresh happens immediately. Failures are logged and
    /// otherwise ignored: the stale fallback covers readers in the meantime.
    pub fn spawn_refresher(
        &self,
        interval: Duration,
        cancellation: CancellationToken,
    ) -> JoinHandle<()> {
        let cache = self.clone();
        let interval = interval.max(MIN_REFRESH_INTERVAL);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            debug!("Catalog refresher started (every {:?})", interval);
            loop {
                tokio::select! {
                    _ = cancellation.cancelled() => break,
                    _ = ticker.tick() => match cache.force_refresh().await {
                        Ok(view) if view.is_stale() => {
                            debug!("Periodic refresh failed, serving stale catalog");
                        }
                        Ok(_) => {}
                        Err(e) => warn!("Periodic catalog refresh failed: {}", e),
                    },
                }
            }
            debug!("Catalog refresher stopped");
        })
    }

    fn join_or_start_refresh(&self, state: &mut CacheState) -> RefreshFuture {
        if let Some(in_flight) = &state.in_flight {
            debug!("Joining in-flight catalog refresh");
            return in_flight.clone();
        }

        let task = {
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move { inner.run_refresh().await })
        };
        let inner = Arc::clone(&self.inner);
        let refresh = async move {
            match task.await {
                Ok(result) => result,
                Err(e) => {
                    // The task never reached the point where it clears itself.
                    inner.lock_state().in_flight = None;
                    Err(BackendError::Unreachable(format!(
                        "catalog refresh aborted: {}",
                        e
                    )))
                }
            }
        }
        .boxed()
        .shared();

        state.in_flight = Some(refresh.clone());
        refresh
    }

    fn settle(&self, result: RefreshResult) -> Result<CatalogView, CatalogError> {
        match result {
            Ok(snapshot) => Ok(CatalogView::fresh(snapshot)),
            Err(error) => match &self.inner.lock_state().current {
                Some(cached) => Ok(CatalogView::stale(
                    Arc::clone(&cached.snapshot),
                    error.to_string(),
                )),
                None => Err(CatalogError::Unavailable(error)),
            },
        }
    }
}
