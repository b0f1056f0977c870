//! Mount-aware fetch slots.
//!
//! Every view owns one `Resource` per remote collection it shows. A resource
//! issues at most one fetch per mount and drops results that arrive after
//! the view was unmounted or re-mounted. State is never locked across an
//! `.await`: a fetch takes a ticket, awaits without holding the lock, and
//! hands the result back with the ticket.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use parley_core::Result;

/// Load state of a remote collection as seen by a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    /// Not mounted yet, or mounted but no fetch issued.
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// What a list view shows for its current load state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing<T> {
    Loading,
    Error(String),
    /// A successful, empty result, with the message to display.
    Empty(&'static str),
    Items(Vec<T>),
}

impl<T: Clone> Listing<T> {
    pub fn from_state(state: &LoadState<Vec<T>>, empty_message: &'static str) -> Self {
        match state {
            LoadState::Idle | LoadState::Loading => Listing::Loading,
            LoadState::Failed(message) => Listing::Error(message.clone()),
            LoadState::Ready(items) if items.is_empty() => Listing::Empty(empty_message),
            LoadState::Ready(items) => Listing::Items(items.clone()),
        }
    }
}

/// Proof that a fetch was issued for a particular mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
}

#[derive(Debug)]
struct Slot<T> {
    state: LoadState<T>,
    mounted: bool,
    epoch: u64,
    issued: bool,
}

/// A shared handle to one view's fetch slot.
#[derive(Debug)]
pub struct Resource<T> {
    label: &'static str,
    slot: Arc<Mutex<Slot<T>>>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: Clone> Resource<T> {
    /// Creates an unmounted resource. `label` names it in diagnostics.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            slot: Arc::new(Mutex::new(Slot {
                state: LoadState::Idle,
                mounted: false,
                epoch: 0,
                issued: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a new mount. Results from any earlier mount become stale.
    pub fn mount(&self) {
        let mut slot = self.lock();
        slot.epoch += 1;
        slot.mounted = true;
        slot.issued = false;
        slot.state = LoadState::Idle;
        tracing::debug!(resource = self.label, epoch = slot.epoch, "[Resource] Mounted");
    }

    /// Ends the current mount. The visible state is left as it was.
    pub fn unmount(&self) {
        let mut slot = self.lock();
        if !slot.mounted {
            return;
        }
        slot.mounted = false;
        slot.epoch += 1;
        tracing::debug!(resource = self.label, "[Resource] Unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.lock().mounted
    }

    /// Issues the fetch for this mount, entering `Loading`.
    ///
    /// Returns `None` when unmounted or when this mount already issued one.
    pub fn begin(&self) -> Option<FetchTicket> {
        let mut slot = self.lock();
        if !slot.mounted || slot.issued {
            return None;
        }
        slot.issued = true;
        slot.state = LoadState::Loading;
        tracing::info!(resource = self.label, "[Resource] Request issued");
        Some(FetchTicket { epoch: slot.epoch })
    }

    /// Applies a fetch result if its mount is still current.
    ///
    /// Returns whether the result was applied.
    pub fn resolve(&self, ticket: FetchTicket, result: Result<T>) -> bool {
        let mut slot = self.lock();
        if !slot.mounted || slot.epoch != ticket.epoch {
            tracing::debug!(
                resource = self.label,
                "[Resource] Discarding result for a stale mount"
            );
            return false;
        }

        slot.state = match result {
            Ok(value) => {
                tracing::info!(resource = self.label, "[Resource] Request resolved");
                LoadState::Ready(value)
            }
            Err(e) => {
                tracing::warn!(resource = self.label, error = %e, "[Resource] Request failed");
                LoadState::Failed(e.to_string())
            }
        };
        true
    }

    /// Runs `fetch` for this mount: issue, await, resolve.
    ///
    /// Returns whether a result was applied. Nothing is fetched when the
    /// mount already issued its request.
    pub async fn load_with<F, Fut>(&self, fetch: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let Some(ticket) = self.begin() else {
            return false;
        };
        let result = fetch().await;
        self.resolve(ticket, result)
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> LoadState<T> {
        self.lock().state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.is_loading()
    }
}
