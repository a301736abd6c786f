//! Computed-artifact contract.
//!
//! A computed artifact is a derived value produced by a pure(ish) function of
//! declared dependency artifacts, memoized per run. Implementations name
//! themselves, list the artifacts they may request as data, and receive a
//! [`DependencyScope`] through which those requests are resolved against the
//! run's [`ComputeContext`].

use std::sync::Arc;

use async_trait::async_trait;
use lantern_core::Result;
use serde::Serialize;

use crate::context::ComputeContext;

/// A named computation memoized per run by the dependency cache.
///
/// `NAME` identifies the artifact in cache keys; two artifact types must not
/// share a name. `DEPENDENCIES` declares, as data, which artifacts the
/// producer is allowed to request; requesting anything else is a programming
/// defect and fails loudly.
#[async_trait]
pub trait ComputedArtifact: Send + Sized + 'static {
    /// Unique artifact name, used as the cache key prefix.
    const NAME: &'static str;

    /// Names of artifacts the producer may request while computing.
    const DEPENDENCIES: &'static [&'static str] = &[];

    /// Dependency inputs. Must serialize deterministically; the structural
    /// fingerprint of this value is the second half of the cache key.
    type Input: Serialize + Send + Sync + 'static;

    /// The produced value, shared read-only between all requesters.
    type Output: Send + Sync + 'static;

    /// Produce the artifact's value.
    ///
    /// Runs at most once per unique input fingerprint per run. Dependency
    /// artifacts are resolved through `deps`, which consults the same
    /// run-scoped cache, so sibling consumers share sub-computations.
    async fn compute(self, input: Self::Input, deps: DependencyScope<'_>) -> Result<Self::Output>;
}

/// Dependency resolution handle passed to an artifact's producer.
///
/// Wraps the run's context and enforces that every nested request was
/// declared in the requesting artifact's `DEPENDENCIES` list.
#[derive(Clone, Copy)]
pub struct DependencyScope<'a> {
    context: &'a ComputeContext,
    artifact: &'static str,
    declared: &'static [&'static str],
}

impl<'a> DependencyScope<'a> {
    pub(crate) fn new(
        context: &'a ComputeContext,
        artifact: &'static str,
        declared: &'static [&'static str],
    ) -> Self {
        Self {
            context,
            artifact,
            declared,
        }
    }

    /// Request a declared dependency artifact through the run's cache.
    ///
    /// # Panics
    ///
    /// Panics if `A::NAME` is missing from the requesting artifact's
    /// `DEPENDENCIES` list. An undeclared dependency is a static defect in
    /// the artifact graph, not a recoverable runtime condition.
    pub async fn request<A: ComputedArtifact>(
        &self,
        artifact: A,
        input: A::Input,
    ) -> Result<Arc<A::Output>> {
        assert!(
            self.declared.contains(&A::NAME),
            "artifact `{}` requested undeclared dependency `{}`",
            self.artifact,
            A::NAME,
        );
        self.context.request(artifact, input).await
    }
}
