//! Fetch-and-normalise for one list resource.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use backoffice_transport::{ApiClient, ApiOutcome};

use crate::filters::build_query_params;
use crate::resource::{ListPage, Resource};
use crate::result::QueryResult;

/// How a fetch cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Loaded,
    /// 422; `field_errors` is set and the previous list is kept.
    Invalid,
    /// 404; the list was emptied.
    NotFound,
    /// Any other failure; `error` carries the code.
    Failed,
    /// A newer fetch started before this one completed; nothing was applied.
    Superseded,
}

/// Resets `loading` when a fetch cycle ends, unless a newer cycle owns it.
struct LoadingGuard<'a, T> {
    state: &'a watch::Sender<QueryResult<T>>,
    current: &'a AtomicU64,
    generation: u64,
}

impl<T> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        if self.current.load(Ordering::SeqCst) == self.generation {
            self.state.send_modify(|s| s.loading = false);
        }
    }
}

/// Owns the [`QueryResult`] of one resource and publishes every change.
pub struct ResourceQueryController<R: Resource> {
    client: ApiClient,
    state: watch::Sender<QueryResult<R::Item>>,
    generation: AtomicU64,
}

impl<R: Resource> ResourceQueryController<R> {
    pub fn new(client: ApiClient) -> Self {
        let (state, _) = watch::channel(QueryResult::default());
        Self {
            client,
            state,
            generation: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryResult<R::Item>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> QueryResult<R::Item> {
        self.state.borrow().clone()
    }

    /// Number of fetch cycles started so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Run one fetch cycle for `filters`.
    ///
    /// Only the most recently started cycle may write its outcome; an older
    /// cycle that completes late returns [`FetchStatus::Superseded`].
    pub async fn fetch(&self, filters: &R::Filters, token: Option<&str>) -> FetchStatus {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
            s.field_errors = None;
        });
        let _loading = LoadingGuard {
            state: &self.state,
            current: &self.generation,
            generation,
        };

        let params = build_query_params(filters);
        tracing::debug!(resource = R::NAME, generation, ?params, "fetching list");

        let outcome: ApiOutcome<ListPage<R::Item>> = self.client.get_json(R::PATH, params, token).await.into();

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(resource = R::NAME, generation, "discarding superseded response");
            return FetchStatus::Superseded;
        }

        let status = match &outcome {
            ApiOutcome::Ok(_) => FetchStatus::Loaded,
            ApiOutcome::ValidationError(_) => FetchStatus::Invalid,
            ApiOutcome::NotFound => FetchStatus::NotFound,
            ApiOutcome::TransportError(_) => FetchStatus::Failed,
        };
        self.state.send_modify(|s| apply(s, outcome));
        tracing::debug!(resource = R::NAME, generation, ?status, "list fetch finished");
        status
    }
}

fn apply<T>(state: &mut QueryResult<T>, outcome: ApiOutcome<ListPage<T>>) {
    match outcome {
        ApiOutcome::Ok(page) => {
            state.total = page.total();
            state.items = page.items;
        }
        ApiOutcome::ValidationError(fields) => {
            state.field_errors = Some(fields);
        }
        ApiOutcome::NotFound => {
            state.items.clear();
            state.total = 0;
        }
        ApiOutcome::TransportError(code) => {
            state.error = Some(code);
        }
    }
}
