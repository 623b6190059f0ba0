//! Bounded-lifetime renderer pool
//!
//! Owns at most one live render engine, hands out exclusive leases,
//! enforces a per-request deadline, and recycles engines that have
//! served too many requests or died.
//!
//! # Design
//!
//! ```text
//! acquire() ──► Lease (holds the slot guard) ──► render() ──► release()
//!     │                                              │
//! [recycle check,                          [success: served += 1]
//!  launch if empty]                        [timeout/crash: poison]
//!                                                    │
//!                                     [poisoned: slot emptied, engine
//!                                      closed; next acquire relaunches]
//! ```
//!
//! The slot is a `tokio::sync::Mutex`; the lease owns the guard, so a
//! second `acquire` blocks until release and engine-affecting
//! operations can never race a recycle against an in-flight render.
//! Recycling happens only here, at acquire time - there is no
//! background timer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::engine::{EngineLauncher, RenderEngine};
use super::error::{RenderError, Result};
use super::request::{ContentSource, RenderRequest};

/// Pool tuning knobs
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Recycle the engine after this many served requests; 0 disables
    /// recycling (engine lives until crash or shutdown)
    pub recycle_after: u32,
    /// Deadline applied when a request does not carry its own
    pub default_deadline: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            recycle_after: 25,
            default_deadline: Duration::from_secs(90),
        }
    }
}

/// The engine slot plus its recycling state
struct Slot {
    engine: Option<PooledEngine>,
}

struct PooledEngine {
    engine: Arc<dyn RenderEngine>,
    served: u32,
    launched_at: Instant,
}

/// Single-slot pool of render engines
///
/// Each pool instance owns its own state; tests instantiate
/// independent pools with mock launchers.
pub struct RendererPool {
    launcher: Arc<dyn EngineLauncher>,
    slot: Arc<Mutex<Slot>>,
    config: PoolConfig,
    engines_launched: AtomicU64,
    requests_served: AtomicU64,
}

/// How a lease ended, from the pool's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeaseState {
    /// Acquired, no render outcome yet
    Clean,
    /// Render succeeded; engine goes back to the slot
    Served,
    /// Timeout or crash; engine must not be reused
    Poisoned,
    /// Poisoned engine already removed and closed
    Discarded,
}

/// Exclusive grant of the pool's engine to one caller
///
/// Holds the slot guard for its whole lifetime. Dropping a lease
/// without an explicit release still applies the discard policy (the
/// slot is emptied synchronously while the guard is held, so the
/// discard is visible before any retry can reach `acquire`).
pub struct Lease {
    guard: OwnedMutexGuard<Slot>,
    engine: Arc<dyn RenderEngine>,
    engine_id: Uuid,
    acquired_at: Instant,
    state: LeaseState,
}

impl Lease {
    /// Identifier of the leased engine
    pub fn engine_id(&self) -> Uuid {
        self.engine_id
    }

    /// Return the engine to the pool, discarding it if poisoned
    pub async fn release(mut self) {
        tracing::debug!(
            "Releasing engine {} after {:?}",
            self.engine_id,
            self.acquired_at.elapsed()
        );
        if self.state == LeaseState::Poisoned {
            if let Some(pooled) = self.guard.engine.take() {
                self.state = LeaseState::Discarded;
                tracing::warn!(
                    "Discarding engine {} after failed render",
                    self.engine_id
                );
                pooled.engine.close().await;
            }
        }
        // Guard drops here, unlocking the slot
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        // Safety net for leases dropped mid-flight: the slot mutation
        // is synchronous under the guard, the close is best-effort.
        if self.state == LeaseState::Poisoned {
            if let Some(pooled) = self.guard.engine.take() {
                tracing::warn!(
                    "Discarding engine {} on lease drop",
                    self.engine_id
                );
                if let Ok(handle) = tokio::runtime::Handle::try_current() {
                    handle.spawn(async move { pooled.engine.close().await });
                }
            }
        }
    }
}

impl RendererPool {
    /// Create a pool over the given launcher
    pub fn new(launcher: Arc<dyn EngineLauncher>, config: PoolConfig) -> Self {
        Self {
            launcher,
            slot: Arc::new(Mutex::new(Slot { engine: None })),
            config,
            engines_launched: AtomicU64::new(0),
            requests_served: AtomicU64::new(0),
        }
    }

    /// Acquire an exclusive lease over a live engine
    ///
    /// Launches on cold start. If the current engine has reached the
    /// recycle threshold or is no longer alive, it is closed and
    /// replaced before the lease is granted. Blocks while another
    /// lease is outstanding.
    pub async fn acquire(&self) -> Result<Lease> {
        let mut guard = self.slot.clone().lock_owned().await;

        if let Some(pooled) = &guard.engine {
            let over_threshold =
                self.config.recycle_after > 0 && pooled.served >= self.config.recycle_after;
            let dead = !pooled.engine.is_alive();

            if over_threshold || dead {
                let old = guard.engine.take().unwrap();
                if over_threshold {
                    tracing::info!(
                        "Recycling engine {} after {} requests ({:?} old)",
                        old.engine.id(),
                        old.served,
                        old.launched_at.elapsed()
                    );
                } else {
                    tracing::warn!("Engine {} found dead, replacing", old.engine.id());
                }
                old.engine.close().await;
            }
        }

        if guard.engine.is_none() {
            let engine = self
                .launcher
                .launch()
                .await
                .map_err(|e| RenderError::Launch(e.to_string()))?;
            self.engines_launched.fetch_add(1, Ordering::Relaxed);
            guard.engine = Some(PooledEngine {
                engine: Arc::from(engine),
                served: 0,
                launched_at: Instant::now(),
            });
        }

        let pooled = guard.engine.as_ref().unwrap();
        let engine = pooled.engine.clone();
        let engine_id = engine.id();

        Ok(Lease {
            guard,
            engine,
            engine_id,
            acquired_at: Instant::now(),
            state: LeaseState::Clean,
        })
    }

    /// Load content and generate a PDF, bounded by `deadline`
    ///
    /// On timeout the render future is dropped, cancelling the
    /// in-flight engine call, and the lease is poisoned so release
    /// discards the engine. A crash mid-operation poisons the lease
    /// the same way. Any other engine failure leaves it reusable.
    pub async fn render(
        &self,
        lease: &mut Lease,
        request: &RenderRequest,
        deadline: Duration,
    ) -> Result<Vec<u8>> {
        // Validation never touches the engine
        let source = request.source()?;

        let engine = lease.engine.clone();
        let work = async {
            match source {
                ContentSource::Html(html) => engine.load_html(html).await?,
                ContentSource::Url(url) => engine.load_url(url).await?,
            }
            engine.generate_pdf(&request.options).await
        };

        match tokio::time::timeout(deadline, work).await {
            Err(_) => {
                lease.state = LeaseState::Poisoned;
                Err(RenderError::Timeout(deadline.as_secs()))
            }
            Ok(Err(engine_err)) => {
                let err = RenderError::from(engine_err);
                if matches!(err, RenderError::EngineCrash(_)) {
                    lease.state = LeaseState::Poisoned;
                }
                Err(err)
            }
            Ok(Ok(bytes)) => {
                if let Some(pooled) = lease.guard.engine.as_mut() {
                    pooled.served += 1;
                }
                self.requests_served.fetch_add(1, Ordering::Relaxed);
                lease.state = LeaseState::Served;
                Ok(bytes)
            }
        }
    }

    /// The full acquire -> render -> release cycle as one call
    ///
    /// This is the surface the HTTP layer uses. Validation runs before
    /// acquisition so a malformed request never triggers a launch.
    pub async fn render_to_pdf(&self, request: &RenderRequest) -> Result<Vec<u8>> {
        request.source()?;

        let deadline = request
            .deadline_secs
            .map(Duration::from_secs)
            .unwrap_or(self.config.default_deadline);

        let mut lease = self.acquire().await?;
        let result = self.render(&mut lease, request, deadline).await;
        lease.release().await;
        result
    }

    /// Close any live engine. Idempotent.
    pub async fn shutdown(&self) {
        let mut guard = self.slot.lock().await;
        if let Some(pooled) = guard.engine.take() {
            tracing::info!("Shutting down engine {}", pooled.engine.id());
            pooled.engine.close().await;
        }
    }

    /// Snapshot of pool counters for the health endpoint
    ///
    /// Non-blocking: while a lease is outstanding the slot is reported
    /// as busy instead of waiting for release.
    pub fn stats(&self) -> PoolStats {
        let (busy, engine_live) = match self.slot.try_lock() {
            Ok(guard) => (false, guard.engine.is_some()),
            // A held guard means some caller has a leased engine
            Err(_) => (true, true),
        };
        PoolStats {
            engines_launched: self.engines_launched.load(Ordering::Relaxed),
            requests_served: self.requests_served.load(Ordering::Relaxed),
            busy,
            engine_live,
        }
    }
}

/// Pool counters
#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
    /// Engines launched since the pool was created
    pub engines_launched: u64,
    /// Successful renders since the pool was created
    pub requests_served: u64,
    /// Whether a lease is currently outstanding
    pub busy: bool,
    /// Whether a live engine is held (or leased out)
    pub engine_live: bool,
}
