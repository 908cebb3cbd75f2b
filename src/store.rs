use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::client::CatalogService;
use crate::error::Result;
use crate::fetch::{Dispatcher, FetchController, FetchKind, FetchOutcome, Fetched, RequestToken};
use crate::models::{Item, ItemId};

/// Load lifecycle of a fetched resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// A value that arrives asynchronously, with its status and last error.
///
/// The value is only exposed while `Ready` and the error only while `Failed`.
#[derive(Debug)]
pub struct Loadable<T> {
    status: LoadStatus,
    value: Option<T>,
    last_error: Option<String>,
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self {
            status: LoadStatus::Idle,
            value: None,
            last_error: None,
        }
    }
}

impl<T> Loadable<T> {
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn value(&self) -> Option<&T> {
        match self.status {
            LoadStatus::Ready => self.value.as_ref(),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        match self.status {
            LoadStatus::Failed => self.last_error.as_deref(),
            _ => None,
        }
    }

    fn start(&mut self) {
        self.status = LoadStatus::Loading;
        self.last_error = None;
    }

    fn finish(&mut self, result: Result<T>) {
        match result {
            Ok(value) => {
                self.value = Some(value);
                self.last_error = None;
                self.status = LoadStatus::Ready;
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                self.status = LoadStatus::Failed;
            }
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Holds the fetched catalog and the single-item detail resource, and owns
/// the fetch lifecycle that populates them.
pub struct CatalogStore {
    catalog: Loadable<Vec<Item>>,
    detail: Loadable<Item>,
    detail_id: Option<ItemId>,
    controller: FetchController,
    dispatcher: Dispatcher,
}

impl CatalogStore {
    pub fn new(service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog: Loadable::default(),
            detail: Loadable::default(),
            detail_id: None,
            controller: FetchController::new(),
            dispatcher: Dispatcher::new(service),
        }
    }

    /// Start (or restart) a catalog fetch. Any earlier catalog fetch still in
    /// flight is superseded and its result will be discarded.
    pub fn load(&mut self) -> RequestToken {
        let token = self.controller.begin(FetchKind::Catalog);
        info!(generation = token.generation(), "loading catalog");
        self.catalog.start();
        self.dispatcher.dispatch_catalog(token.clone());
        token
    }

    /// Start a single-item fetch for the detail view.
    pub fn load_one(&mut self, id: ItemId) -> RequestToken {
        let token = self.controller.begin(FetchKind::Item);
        info!(id, generation = token.generation(), "loading item");
        self.detail_id = Some(id);
        self.detail.start();
        self.dispatcher.dispatch_item(token.clone(), id);
        token
    }

    /// Drop the in-flight single-item fetch, if any. The detail resource goes
    /// back to `Idle`; cancellation never counts as a failure.
    pub fn cancel_one(&mut self) {
        self.controller.cancel(FetchKind::Item);
        self.detail.reset();
        self.detail_id = None;
    }

    /// Commit a completed fetch if its token is still current.
    ///
    /// Returns `true` when the outcome changed the store.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        let FetchOutcome { token, fetched } = outcome;
        if !self.controller.settle(&token) {
            debug!(
                kind = %token.kind(),
                generation = token.generation(),
                "discarding superseded fetch result"
            );
            return false;
        }

        match fetched {
            Fetched::Catalog(result) => {
                match &result {
                    Ok(items) => info!(count = items.len(), "catalog ready"),
                    Err(e) => warn!(error = %e, "catalog fetch failed"),
                }
                self.catalog.finish(result);
            }
            Fetched::Item(result) => {
                if let Err(e) = &result {
                    warn!(id = ?self.detail_id, error = %e, "item fetch failed");
                }
                self.detail.finish(result);
            }
        }
        true
    }

    /// Apply every fetch that has already completed. Never blocks.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Some(outcome) = self.dispatcher.try_recv() {
            changed |= self.apply(outcome);
        }
        changed
    }

    /// Block for the next completed fetch (up to `timeout`) and apply it.
    ///
    /// Returns `None` on timeout, otherwise whether the outcome was committed.
    pub fn wait(&mut self, timeout: Duration) -> Option<bool> {
        let outcome = self.dispatcher.recv_timeout(timeout)?;
        Some(self.apply(outcome))
    }

    pub fn status(&self) -> LoadStatus {
        self.catalog.status()
    }

    /// The current catalog; `None` unless the last committed fetch succeeded
    /// and no newer fetch is pending.
    pub fn catalog(&self) -> Option<&[Item]> {
        self.catalog.value().map(Vec::as_slice)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.catalog.last_error()
    }

    pub fn find(&self, id: ItemId) -> Option<&Item> {
        self.catalog()?.iter().find(|item| item.id == id)
    }

    pub fn detail_status(&self) -> LoadStatus {
        self.detail.status()
    }

    pub fn detail(&self) -> Option<&Item> {
        self.detail.value()
    }

    pub fn detail_error(&self) -> Option<&str> {
        self.detail.last_error()
    }

    /// Identifier of the most recent `load_one` request.
    pub fn detail_id(&self) -> Option<ItemId> {
        self.detail_id
    }
}
