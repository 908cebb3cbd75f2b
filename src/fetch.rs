//! Request tokens and background dispatch for catalog fetches.
//!
//! Every fetch is wrapped in a [`RequestToken`]. Issuing a new fetch of a
//! given [`FetchKind`] supersedes the previous one; only the current token of
//! a kind may commit its result. Acceptance is decided by generation identity
//! in [`FetchController::settle`], never by the order in which responses
//! arrive.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use tracing::{debug, trace, warn};

use crate::client::CatalogService;
use crate::error::{CatalogError, Result};
use crate::models::{Item, ItemId};

/// The two independent fetch lanes. A new request only supersedes requests
/// of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    Catalog,
    Item,
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchKind::Catalog => f.write_str("catalog"),
            FetchKind::Item => f.write_str("item"),
        }
    }
}

/// Identity of one issued fetch plus its cooperative cancellation flag.
#[derive(Debug, Clone)]
pub struct RequestToken {
    kind: FetchKind,
    generation: u64,
    cancelled: Arc<AtomicBool>,
}

impl RequestToken {
    pub fn kind(&self) -> FetchKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether this request has been superseded or explicitly cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

/// Issues and supersedes request tokens.
#[derive(Debug, Default)]
pub struct FetchController {
    next_generation: u64,
    catalog: Option<RequestToken>,
    item: Option<RequestToken>,
}

impl FetchController {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, kind: FetchKind) -> &mut Option<RequestToken> {
        match kind {
            FetchKind::Catalog => &mut self.catalog,
            FetchKind::Item => &mut self.item,
        }
    }

    fn current(&self, kind: FetchKind) -> Option<&RequestToken> {
        match kind {
            FetchKind::Catalog => self.catalog.as_ref(),
            FetchKind::Item => self.item.as_ref(),
        }
    }

    /// Issue a fresh token for `kind`, cancelling any in-flight one.
    pub fn begin(&mut self, kind: FetchKind) -> RequestToken {
        self.next_generation += 1;
        let token = RequestToken {
            kind,
            generation: self.next_generation,
            cancelled: Arc::new(AtomicBool::new(false)),
        };
        if let Some(previous) = self.slot(kind).replace(token.clone()) {
            debug!(%kind, superseded = previous.generation, by = token.generation, "superseding fetch");
            previous.cancel();
        }
        token
    }

    /// Cancel the in-flight request of `kind` without issuing a new one.
    /// Returns `false` if nothing was in flight.
    pub fn cancel(&mut self, kind: FetchKind) -> bool {
        match self.slot(kind).take() {
            Some(previous) => {
                debug!(%kind, generation = previous.generation, "cancelling fetch");
                previous.cancel();
                true
            }
            None => false,
        }
    }

    /// Whether `token` is the live request of its kind.
    pub fn is_current(&self, token: &RequestToken) -> bool {
        self.current(token.kind)
            .is_some_and(|live| live.generation == token.generation)
    }

    /// Accept a completed request if it is still current, retiring it.
    pub fn settle(&mut self, token: &RequestToken) -> bool {
        if self.is_current(token) {
            *self.slot(token.kind) = None;
            true
        } else {
            false
        }
    }

    pub fn in_flight(&self, kind: FetchKind) -> bool {
        self.current(kind).is_some()
    }
}

// ---------------------------------------------------------------------------
// Background dispatch
// ---------------------------------------------------------------------------

/// Result payload of a completed fetch.
#[derive(Debug)]
pub enum Fetched {
    Catalog(Result<Vec<Item>>),
    Item(Result<Item>),
}

/// A completed fetch travelling back to the owning thread.
#[derive(Debug)]
pub struct FetchOutcome {
    pub token: RequestToken,
    pub fetched: Fetched,
}

/// Runs service calls on background threads and collects their outcomes.
///
/// The dispatcher never touches application state; the owner drains
/// outcomes with [`Dispatcher::try_recv`] or [`Dispatcher::recv_timeout`] and
/// decides whether to commit them.
pub struct Dispatcher {
    service: Arc<dyn CatalogService>,
    tx: Sender<FetchOutcome>,
    rx: Receiver<FetchOutcome>,
}

impl Dispatcher {
    pub fn new(service: Arc<dyn CatalogService>) -> Self {
        let (tx, rx) = unbounded();
        Self { service, tx, rx }
    }

    pub fn dispatch_catalog(&self, token: RequestToken) {
        self.spawn(token, |service| Fetched::Catalog(service.list_items()));
    }

    pub fn dispatch_item(&self, token: RequestToken, id: ItemId) {
        self.spawn(token, move |service| Fetched::Item(service.get_item(id)));
    }

    fn spawn<F>(&self, token: RequestToken, call: F)
    where
        F: FnOnce(&dyn CatalogService) -> Fetched + Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        let worker_token = token.clone();
        let name = format!("fetch-{}-{}", token.kind, token.generation);

        let spawned = thread::Builder::new().name(name).spawn(move || {
            if worker_token.is_cancelled() {
                trace!(generation = worker_token.generation, "skipping cancelled fetch");
                return;
            }
            let fetched = call(service.as_ref());
            // The receiver only disappears when the owner is gone.
            let _ = tx.send(FetchOutcome {
                token: worker_token,
                fetched,
            });
        });

        if let Err(e) = spawned {
            warn!(error = %e, "could not start fetch thread");
            let error = CatalogError::Transport {
                message: format!("could not start fetch: {e}"),
            };
            let fetched = match token.kind {
                FetchKind::Catalog => Fetched::Catalog(Err(error)),
                FetchKind::Item => Fetched::Item(Err(error)),
            };
            let _ = self.tx.send(FetchOutcome { token, fetched });
        }
    }

    /// Next completed fetch, if one is ready.
    pub fn try_recv(&self) -> Option<FetchOutcome> {
        self.rx.try_recv().ok()
    }

    /// Block until a fetch completes or `timeout` elapses.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FetchOutcome> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_supersedes_same_kind_only() {
        let mut controller = FetchController::new();
        let first = controller.begin(FetchKind::Catalog);
        let item = controller.begin(FetchKind::Item);
        let second = controller.begin(FetchKind::Catalog);

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(!item.is_cancelled());
        assert!(!controller.is_current(&first));
        assert!(controller.is_current(&second));
        assert!(controller.is_current(&item));
        assert!(second.generation() > first.generation());
    }

    #[test]
    fn settle_accepts_once() {
        let mut controller = FetchController::new();
        let token = controller.begin(FetchKind::Item);
        assert!(controller.settle(&token));
        assert!(!controller.settle(&token));
        assert!(!controller.in_flight(FetchKind::Item));
    }

    #[test]
    fn stale_token_is_rejected_after_late_arrival() {
        let mut controller = FetchController::new();
        let stale = controller.begin(FetchKind::Catalog);
        let fresh = controller.begin(FetchKind::Catalog);

        assert!(controller.settle(&fresh));
        // The stale response turns up after the fresh one committed.
        assert!(!controller.settle(&stale));
    }

    #[test]
    fn cancel_without_replacement() {
        let mut controller = FetchController::new();
        let token = controller.begin(FetchKind::Item);
        assert!(controller.cancel(FetchKind::Item));
        assert!(token.is_cancelled());
        assert!(!controller.settle(&token));
        assert!(!controller.cancel(FetchKind::Item));
    }
}
