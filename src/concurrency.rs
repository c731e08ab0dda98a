//! Fan-out helpers over provider futures
//!
//! Two shapes are used by the planes: a race that settles on the first
//! provider with an answer, and a broadcast that awaits every provider.
//! Both run on the caller's task; nothing here spawns.

use crate::error::ProviderError;
use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;

/// Result of racing providers for a read.
#[derive(Debug)]
pub enum RaceOutcome<T> {
    /// A provider answered; the rest were dropped unfinished
    Found(T),
    /// Every provider settled without an answer
    Exhausted {
        errors: Vec<ProviderError>,
        misses: usize,
    },
}

impl<T> RaceOutcome<T> {
    /// True when no provider answered cleanly, i.e. every one failed
    /// (vacuously true for an empty race).
    pub fn all_failed(&self) -> bool {
        matches!(self, RaceOutcome::Exhausted { misses: 0, .. })
    }
}

/// Start every future at once and return the first `Ok(Some(_))`.
///
/// `Ok(None)` counts as a miss, not a win. Stragglers are dropped once a
/// winner is found; the caller never waits for them.
pub async fn race_first<T, I, F>(futures: I) -> RaceOutcome<T>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<Option<T>, ProviderError>>,
{
    let mut pending: FuturesUnordered<F> = futures.into_iter().collect();
    let mut errors = Vec::new();
    let mut misses = 0;

    while let Some(result) = pending.next().await {
        match result {
            Ok(Some(value)) => return RaceOutcome::Found(value),
            Ok(None) => misses += 1,
            Err(e) => errors.push(e),
        }
    }

    RaceOutcome::Exhausted { errors, misses }
}

/// Start every future at once and wait for all of them, preserving input order.
pub async fn broadcast<T, I, F>(futures: I) -> Vec<Result<T, ProviderError>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, ProviderError>>,
{
    futures::future::join_all(futures).await
}

/// Broadcast summary: succeeded iff at least one provider call did not fail.
pub fn any_succeeded<T>(results: &[Result<T, ProviderError>]) -> bool {
    results.iter().any(Result::is_ok)
}
