//! Run-scoped dependency cache.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use lantern_core::{LanternError, Result};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::artifact::{ComputedArtifact, DependencyScope};
use crate::fingerprint::fingerprint;

/// A type-erased computation outcome, as stored in the cache.
type CachedValue = std::result::Result<Arc<dyn Any + Send + Sync>, LanternError>;

/// An in-flight-or-completed computation shared by all requesters of one key.
///
/// The shared future *is* the cache value: the first requester of a key
/// installs it, concurrent requesters await the same execution (single
/// flight), and once it settles the stored outcome (value or error) is
/// replayed to every later requester.
type SharedComputation = Shared<BoxFuture<'static, CachedValue>>;

/// Cache key: artifact identity plus the structural fingerprint of its inputs.
type CacheKey = (&'static str, String);

/// The run-scoped dependency cache.
///
/// One context is created per analysis run, threaded explicitly through every
/// artifact request, and discarded with the run. Cloning is cheap and yields
/// a handle to the same cache; contexts are never shared across runs.
#[derive(Clone)]
pub struct ComputeContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    /// Identifies the run in trace output.
    run_id: Uuid,

    /// Timestamp of context construction (run start).
    created_at: DateTime<Utc>,

    /// (artifact, fingerprint) -> in-flight-or-completed computation.
    cache: Mutex<HashMap<CacheKey, SharedComputation>>,
}

impl ComputeContext {
    /// Create a fresh cache for a new analysis run.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ContextInner {
                run_id: Uuid::new_v4(),
                created_at: Utc::now(),
                cache: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Identifier of the run this context belongs to.
    pub fn run_id(&self) -> Uuid {
        self.inner.run_id
    }

    /// When this run's context was constructed.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    /// Number of distinct (artifact, input) computations this run has seen.
    pub async fn computed_count(&self) -> usize {
        self.inner.cache.lock().await.len()
    }

    /// Request an artifact's value for the given inputs.
    ///
    /// The producer runs at most once per unique input fingerprint within
    /// this context; concurrent requesters share the in-flight computation,
    /// and a settled outcome, success or failure, is replayed to every
    /// later requester of the same key without re-invoking the producer.
    pub async fn request<A: ComputedArtifact>(
        &self,
        artifact: A,
        input: A::Input,
    ) -> Result<Arc<A::Output>> {
        let key: CacheKey = (A::NAME, fingerprint(&input)?);

        let computation = {
            let mut cache = self.inner.cache.lock().await;
            match cache.get(&key) {
                Some(existing) => {
                    debug!(artifact = A::NAME, "dependency cache hit");
                    existing.clone()
                }
                None => {
                    debug!(artifact = A::NAME, run_id = %self.inner.run_id, "computing artifact");
                    let context = self.clone();
                    let computation: SharedComputation = async move {
                        let scope = DependencyScope::new(&context, A::NAME, A::DEPENDENCIES);
                        artifact
                            .compute(input, scope)
                            .await
                            .map(|value| Arc::new(value) as Arc<dyn Any + Send + Sync>)
                    }
                    .boxed()
                    .shared();
                    cache.insert(key, computation.clone());
                    computation
                }
            }
        };

        // Awaited outside the lock so sibling artifacts can make progress.
        let value = computation.await?;
        value
            .downcast::<A::Output>()
            .map_err(|_| LanternError::TypeMismatch {
                artifact: A::NAME.to_string(),
            })
    }
}

impl Default for ComputeContext {
    fn default() -> Self {
        Self::new()
    }
}
