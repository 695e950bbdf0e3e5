//! Month availability store.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use daybook_core::{MonthAvailabilityEntry, SourceStatus, YearMonth, policy};
use daybook_providers::{ProviderResult, ScheduleSource};
use tracing::{debug, warn};

use crate::error::{FetchFailure, FetchOutcome};
use crate::fetch::{FetchGuard, FetchTicket};

/// Cache key of an availability fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AvailabilityKey {
    /// Provider whose calendar is viewed.
    pub provider_id: String,
    /// Month queried.
    pub month: YearMonth,
}

impl AvailabilityKey {
    /// Creates a key.
    pub fn new(provider_id: impl Into<String>, month: YearMonth) -> Self {
        Self {
            provider_id: provider_id.into(),
            month,
        }
    }
}

/// Holds the availability entries of the month last fetched.
#[derive(Debug, Default)]
pub struct AvailabilityStore {
    guard: FetchGuard<AvailabilityKey>,
    entries: Vec<MonthAvailabilityEntry>,
}

impl AvailabilityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the availability of `month`. Returns `None` on a cache hit.
    pub fn begin(&mut self, provider_id: &str, month: YearMonth) -> Option<FetchTicket<AvailabilityKey>> {
        self.guard.begin(&AvailabilityKey::new(provider_id, month))
    }

    /// Applies the result of the fetch issued with `ticket`.
    pub fn complete(
        &mut self,
        ticket: FetchTicket<AvailabilityKey>,
        result: ProviderResult<Vec<MonthAvailabilityEntry>>,
    ) -> FetchOutcome {
        if !self.guard.is_current(&ticket) {
            debug!(key = ?ticket.key(), "discarding superseded availability response");
            return FetchOutcome::Discarded;
        }

        match result {
            Ok(entries) => {
                debug!(key = ?ticket.key(), count = entries.len(), "availability updated");
                self.entries = entries;
                self.guard.record_success(ticket);
                FetchOutcome::Applied
            }
            Err(err) => {
                let failure = FetchFailure::from(&err);
                warn!(
                    key = ?ticket.key(),
                    error = %err,
                    retryable = failure.retryable,
                    "availability fetch failed"
                );
                self.guard.record_failure(&ticket, failure.to_string());
                FetchOutcome::Failed(failure)
            }
        }
    }

    /// Fetches and applies in one step.
    pub async fn refresh(
        &mut self,
        source: &dyn ScheduleSource,
        provider_id: &str,
        month: YearMonth,
    ) -> FetchOutcome {
        let Some(ticket) = self.begin(provider_id, month) else {
            return FetchOutcome::Cached;
        };
        let result = source.month_availability(provider_id, month).await;
        self.complete(ticket, result)
    }

    /// Makes the next request re-fetch its key.
    pub fn invalidate(&mut self) {
        self.guard.invalidate();
    }

    /// Entries held, as received from the source.
    pub fn entries(&self) -> &[MonthAvailabilityEntry] {
        &self.entries
    }

    /// Month the held entries belong to.
    pub fn loaded_month(&self) -> Option<YearMonth> {
        self.guard.loaded().map(|key| key.month)
    }

    /// Returns true if the held entries are `provider_id`'s entries for `month`.
    pub fn is_loaded(&self, provider_id: &str, month: YearMonth) -> bool {
        self.guard
            .loaded()
            .is_some_and(|key| key.provider_id == provider_id && key.month == month)
    }

    /// Disabled days of `month`.
    ///
    /// Held entries are only applied when they belong to `month`; otherwise
    /// only closed days are returned.
    pub fn disabled_days_for(&self, month: YearMonth) -> BTreeSet<NaiveDate> {
        let entries: &[MonthAvailabilityEntry] = if self.loaded_month() == Some(month) {
            self.entries.as_slice()
        } else {
            &[]
        };
        policy::disabled_days(month, entries)
    }

    /// Returns true if the last fetch failed.
    pub fn is_stale(&self) -> bool {
        self.guard.is_stale()
    }

    /// Number of failures since the last success.
    pub fn consecutive_failures(&self) -> u32 {
        self.guard.consecutive_failures()
    }

    /// Fetch status for the presentation layer.
    pub fn status(&self) -> SourceStatus {
        self.guard.status()
    }
}
