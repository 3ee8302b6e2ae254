//! Consumer-side data resource.
//!
//! A `Resource` owns the state for one widget's data: each trigger takes a
//! new generation, fetches through the shared [`DataFetcher`], and publishes
//! the outcome only if no newer trigger happened meanwhile.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::Result;
use crate::fetcher::DataFetcher;
use crate::queries::Query;
use crate::resource::{FetchStatus, ResourceState};
use crate::retry::{Generation, GenerationCounter};

pub struct Resource<Q: Query> {
    fetcher: DataFetcher,
    generations: Arc<GenerationCounter>,
    state: Arc<watch::Sender<ResourceState<Q::Output>>>,
    last_query: Mutex<Option<Q>>,
    /// Fires on shutdown; nothing is published afterwards
    lifetime: CancellationToken,
}

impl<Q: Query> Resource<Q> {
    pub fn new(fetcher: DataFetcher) -> Self {
        let (state, _) = watch::channel(ResourceState::default());
        Self {
            fetcher,
            generations: Arc::new(GenerationCounter::new()),
            state: Arc::new(state),
            last_query: Mutex::new(None),
            lifetime: CancellationToken::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceState<Q::Output>> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ResourceState<Q::Output> {
        self.state.borrow().clone()
    }

    pub fn generation(&self) -> Generation {
        self.generations.current()
    }

    // == Trigger ==
    /// Starts fetching `query`, superseding any fetch still in flight.
    ///
    /// The superseded fetch is not aborted; its result still lands in the
    /// shared cache but never in this resource's state.
    pub fn trigger(&self, query: Q) -> Generation {
        self.start(query, false)
    }

    /// Re-runs the last query (the manual "Retry" action).
    pub fn retry(&self) -> Option<Generation> {
        let query = self.last_query()?;
        Some(self.start(query, false))
    }

    /// Re-runs the last query bypassing every cache.
    pub fn refresh(&self) -> Option<Generation> {
        let query = self.last_query()?;
        Some(self.start(query, true))
    }

    /// Stops publishing and cancels any pending retry delay.
    pub fn shutdown(&self) {
        self.lifetime.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    fn last_query(&self) -> Option<Q> {
        self.last_query
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn start(&self, query: Q, refresh: bool) -> Generation {
        if self.lifetime.is_cancelled() {
            warn!("trigger ignored, resource is shut down");
            return self.generations.current();
        }

        *self
            .last_query
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(query.clone());

        let mut generation = Generation::default();
        self.state.send_modify(|state| {
            generation = self.generations.advance();
            state.generation = generation;
            state.status = FetchStatus::Loading;
            state.error = None;
        });

        if let Err(err) = query.validate() {
            publish(&self.state, &self.generations, &self.lifetime, generation, Err(err));
            return generation;
        }

        let fetcher = self.fetcher.clone();
        let generations = Arc::clone(&self.generations);
        let state = Arc::clone(&self.state);
        let lifetime = self.lifetime.clone();
        let request = query.request();

        debug!(%generation, url = %request.url(), "resource fetch started");
        tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = lifetime.cancelled() => return,
                outcome = fetcher.fetch_with_retry::<Q::Output>(&request, refresh, &lifetime) => outcome,
            };
            publish(&state, &generations, &lifetime, generation, outcome);
        });

        generation
    }
}

impl<Q: Query> Drop for Resource<Q> {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

/// Applies `outcome` if `generation` is still the latest and the resource is
/// alive. The check runs under the state lock, so a concurrent trigger
/// cannot slip between check and write.
fn publish<T>(
    state: &watch::Sender<ResourceState<T>>,
    generations: &GenerationCounter,
    lifetime: &CancellationToken,
    generation: Generation,
    outcome: Result<T>,
) -> bool {
    state.send_if_modified(|current| {
        if lifetime.is_cancelled() {
            debug!(%generation, "resource shut down, dropping response");
            return false;
        }
        if !generations.is_current(generation) {
            debug!(%generation, latest = %generations.current(), "discarding superseded response");
            return false;
        }

        match outcome {
            Ok(data) => {
                current.status = FetchStatus::Success;
                current.data = Some(data);
                current.error = None;
            }
            Err(err) => {
                warn!(%generation, error = %err, "resource fetch failed");
                current.status = FetchStatus::Error;
                current.error = Some(err.to_string());
            }
        }
        true
    })
}
