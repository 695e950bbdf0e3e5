//! Day appointment store.

use chrono::{NaiveDate, NaiveDateTime};
use daybook_core::{Appointment, Partition, SourceStatus, find_next, partition};
use daybook_providers::{ProviderResult, RawAppointment, ScheduleSource, normalize_appointments};
use tracing::{debug, warn};

use crate::error::{FetchFailure, FetchOutcome};
use crate::fetch::{FetchGuard, FetchTicket};

/// Cache key of an appointment fetch. Time of day is not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppointmentKey {
    /// Provider whose calendar is viewed.
    pub provider_id: String,
    /// Day queried.
    pub date: NaiveDate,
}

impl AppointmentKey {
    /// Creates a key.
    pub fn new(provider_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            provider_id: provider_id.into(),
            date,
        }
    }
}

/// Holds the appointments of the day last fetched.
#[derive(Debug, Default)]
pub struct AppointmentStore {
    guard: FetchGuard<AppointmentKey>,
    appointments: Vec<Appointment>,
}

impl AppointmentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the appointments of `date`. Returns `None` on a cache hit.
    pub fn begin(&mut self, provider_id: &str, date: NaiveDate) -> Option<FetchTicket<AppointmentKey>> {
        self.guard.begin(&AppointmentKey::new(provider_id, date))
    }

    /// Applies the result of the fetch issued with `ticket`.
    ///
    /// Raw entries are normalized here, so display times are formatted once.
    pub fn complete(
        &mut self,
        ticket: FetchTicket<AppointmentKey>,
        result: ProviderResult<Vec<RawAppointment>>,
    ) -> FetchOutcome {
        if !self.guard.is_current(&ticket) {
            debug!(key = ?ticket.key(), "discarding superseded appointments response");
            return FetchOutcome::Discarded;
        }

        match result {
            Ok(raw) => {
                let appointments = normalize_appointments(&raw);
                debug!(key = ?ticket.key(), count = appointments.len(), "appointments updated");
                self.appointments = appointments;
                self.guard.record_success(ticket);
                FetchOutcome::Applied
            }
            Err(err) => {
                let failure = FetchFailure::from(&err);
                warn!(
                    key = ?ticket.key(),
                    error = %err,
                    retryable = failure.retryable,
                    "appointments fetch failed"
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
        date: NaiveDate,
    ) -> FetchOutcome {
        let Some(ticket) = self.begin(provider_id, date) else {
            return FetchOutcome::Cached;
        };
        let result = source.day_appointments(provider_id, date).await;
        self.complete(ticket, result)
    }

    /// Makes the next request re-fetch its key.
    pub fn invalidate(&mut self) {
        self.guard.invalidate();
    }

    /// Appointments held, in source order.
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Day the held appointments belong to.
    pub fn date(&self) -> Option<NaiveDate> {
        self.guard.loaded().map(|key| key.date)
    }

    /// Splits the held appointments into morning and afternoon.
    pub fn partition(&self) -> Partition {
        partition(&self.appointments)
    }

    /// Earliest held appointment strictly after `now`.
    pub fn find_next(&self, now: NaiveDateTime) -> Option<&Appointment> {
        find_next(&self.appointments, now)
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
