//! Last-request-wins bookkeeping shared by the stores.
//!
//! A [`FetchGuard`] tracks, for one store:
//! - the key of the data currently held,
//! - the key most recently requested,
//! - the ticket of the fetch whose result will be accepted,
//! - failure state (stale flag, consecutive failures, last error).
//!
//! Every issued fetch gets a [`FetchTicket`] with a monotonic generation.
//! Only the ticket of the latest issued fetch is accepted on completion;
//! anything older is discarded.

use std::fmt;

use daybook_core::SourceStatus;
use tracing::debug;

/// Tag attached to an in-flight fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<K> {
    generation: u64,
    key: K,
}

impl<K> FetchTicket<K> {
    /// Monotonic generation of this request.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The key this request was issued for.
    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Per-store request state.
#[derive(Debug)]
pub struct FetchGuard<K> {
    loaded: Option<K>,
    requested: Option<K>,
    pending: Option<u64>,
    generation: u64,
    force: bool,
    stale: bool,
    consecutive_failures: u32,
    last_error: Option<String>,
}

impl<K> Default for FetchGuard<K> {
    fn default() -> Self {
        Self {
            loaded: None,
            requested: None,
            pending: None,
            generation: 0,
            force: false,
            stale: false,
            consecutive_failures: 0,
            last_error: None,
        }
    }
}

impl<K> FetchGuard<K>
where
    K: Clone + PartialEq + fmt::Debug,
{
    /// Creates an empty guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests data for `key`.
    ///
    /// Returns a ticket when a fetch must be issued, `None` when the key is
    /// already loaded, in flight, or failed without an intervening change.
    pub fn begin(&mut self, key: &K) -> Option<FetchTicket<K>> {
        if !self.force {
            if self.requested.as_ref() == Some(key) {
                return None;
            }
            if self.loaded.as_ref() == Some(key) {
                debug!(?key, "cache hit");
                // Switching back to the held key supersedes anything in flight.
                self.requested = Some(key.clone());
                self.pending = None;
                self.stale = false;
                self.last_error = None;
                return None;
            }
        }

        self.force = false;
        self.generation += 1;
        self.pending = Some(self.generation);
        self.requested = Some(key.clone());
        debug!(?key, generation = self.generation, "issuing fetch");
        Some(FetchTicket {
            generation: self.generation,
            key: key.clone(),
        })
    }

    /// Returns true if `ticket` belongs to the latest issued fetch.
    pub fn is_current(&self, ticket: &FetchTicket<K>) -> bool {
        self.pending == Some(ticket.generation)
    }

    /// Records a successful completion; the held data now belongs to the
    /// ticket's key.
    pub fn record_success(&mut self, ticket: FetchTicket<K>) {
        self.pending = None;
        self.loaded = Some(ticket.key);
        self.stale = false;
        self.consecutive_failures = 0;
        self.last_error = None;
    }

    /// Records a failed completion. The held data and its key are kept.
    pub fn record_failure(&mut self, ticket: &FetchTicket<K>, error: impl Into<String>) {
        debug_assert!(self.is_current(ticket));
        self.pending = None;
        self.stale = true;
        self.consecutive_failures += 1;
        self.last_error = Some(error.into());
    }

    /// Makes the next [`begin`](Self::begin) issue a fetch even for an
    /// unchanged key.
    pub fn invalidate(&mut self) {
        self.force = true;
        self.requested = None;
    }

    /// Key of the data currently held.
    pub fn loaded(&self) -> Option<&K> {
        self.loaded.as_ref()
    }

    /// Key most recently requested.
    pub fn requested(&self) -> Option<&K> {
        self.requested.as_ref()
    }

    /// Returns true while the latest issued fetch has not completed.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns true if the last accepted fetch failed.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Number of failed fetches since the last successful one. A cache hit
    /// does not reset it.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Message of the last failure.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Status for the presentation layer.
    pub fn status(&self) -> SourceStatus {
        SourceStatus {
            loading: self.is_loading(),
            stale: self.stale,
            last_error: self.last_error.clone(),
        }
    }
}
