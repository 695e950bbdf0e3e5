//! ScheduleSource trait definition.
//!
//! A [`ScheduleSource`] is the remote data boundary of the scheduling view:
//! it answers month-availability and day-appointment queries for one
//! provider. Transport details (HTTP, retries, timeouts) live behind it.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use daybook_core::{MonthAvailabilityEntry, YearMonth};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::raw::RawAppointment;

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Remote source of availability and appointment data.
///
/// Implementations must be `Send + Sync` so a single handle can be shared by
/// concurrently pending fetches.
pub trait ScheduleSource: Send + Sync {
    /// Returns the name of this source (e.g. "http", "memory").
    fn name(&self) -> &str;

    /// Fetches the per-day availability of `month` for a provider.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on transport, authentication or decoding failures.
    fn month_availability(
        &self,
        provider_id: &str,
        month: YearMonth,
    ) -> BoxFuture<'_, ProviderResult<Vec<MonthAvailabilityEntry>>>;

    /// Fetches the appointments booked with a provider on `date`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on transport, authentication or decoding failures.
    fn day_appointments(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> BoxFuture<'_, ProviderResult<Vec<RawAppointment>>>;
}

/// A source that always fails.
///
/// Used when the real source cannot be built (for instance a missing base
/// URL), so the view still comes up and reports the problem as stale data.
#[derive(Debug)]
pub struct ErrorSource {
    name: String,
    error: ProviderError,
}

impl ErrorSource {
    /// Creates a new error source.
    pub fn new(name: impl Into<String>, error: ProviderError) -> Self {
        Self {
            name: name.into(),
            error,
        }
    }

    fn error(&self) -> ProviderError {
        ProviderError::new(self.error.code(), self.error.message()).with_source_name(&self.name)
    }
}

impl ScheduleSource for ErrorSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn month_availability(
        &self,
        _provider_id: &str,
        _month: YearMonth,
    ) -> BoxFuture<'_, ProviderResult<Vec<MonthAvailabilityEntry>>> {
        let error = self.error();
        Box::pin(async move { Err(error) })
    }

    fn day_appointments(
        &self,
        _provider_id: &str,
        _date: NaiveDate,
    ) -> BoxFuture<'_, ProviderResult<Vec<RawAppointment>>> {
        let error = self.error();
        Box::pin(async move { Err(error) })
    }
}

/// Fixture data for a [`MemorySource`], as stored in a JSON file.
///
/// ```json
/// {
///   "availability": { "2024-06": [{ "day": 5, "available": false }] },
///   "appointments": { "2024-06-10": [{ "id": "a1", "date": "2024-06-10T09:00:00", "user": { "name": "Ana" } }] }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    /// Availability pages keyed by month.
    pub availability: HashMap<YearMonth, Vec<MonthAvailabilityEntry>>,
    /// Appointment lists keyed by day.
    pub appointments: HashMap<NaiveDate, Vec<RawAppointment>>,
}

impl Fixture {
    /// Parses fixture JSON.
    pub fn from_json(json: &str) -> ProviderResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            ProviderError::configuration(format!("invalid fixture: {}", e)).with_source(e)
        })
    }
}

/// An in-memory source serving fixture data.
///
/// Unknown months and days yield empty lists. Each query is counted so
/// callers can check how many round trips a sequence of gestures caused.
#[derive(Debug, Default)]
pub struct MemorySource {
    fixture: Fixture,
    availability_calls: AtomicUsize,
    appointment_calls: AtomicUsize,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source serving the given fixture.
    pub fn from_fixture(fixture: Fixture) -> Self {
        Self {
            fixture,
            ..Self::default()
        }
    }

    /// Builder method to add an availability page.
    pub fn with_month(mut self, month: YearMonth, entries: Vec<MonthAvailabilityEntry>) -> Self {
        self.fixture.availability.insert(month, entries);
        self
    }

    /// Builder method to add a day of appointments.
    pub fn with_day(mut self, date: NaiveDate, appointments: Vec<RawAppointment>) -> Self {
        self.fixture.appointments.insert(date, appointments);
        self
    }

    /// Number of availability queries served so far.
    pub fn availability_calls(&self) -> usize {
        self.availability_calls.load(Ordering::SeqCst)
    }

    /// Number of appointment queries served so far.
    pub fn appointment_calls(&self) -> usize {
        self.appointment_calls.load(Ordering::SeqCst)
    }
}

impl ScheduleSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn month_availability(
        &self,
        provider_id: &str,
        month: YearMonth,
    ) -> BoxFuture<'_, ProviderResult<Vec<MonthAvailabilityEntry>>> {
        self.availability_calls.fetch_add(1, Ordering::SeqCst);
        debug!(provider = %provider_id, %month, "serving availability from memory");
        let entries = self
            .fixture
            .availability
            .get(&month)
            .cloned()
            .unwrap_or_default();
        Box::pin(async move { Ok(entries) })
    }

    fn day_appointments(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> BoxFuture<'_, ProviderResult<Vec<RawAppointment>>> {
        self.appointment_calls.fetch_add(1, Ordering::SeqCst);
        debug!(provider = %provider_id, %date, "serving appointments from memory");
        let appointments = self
            .fixture
            .appointments
            .get(&date)
            .cloned()
            .unwrap_or_default();
        Box::pin(async move { Ok(appointments) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;

    fn june() -> YearMonth {
        YearMonth::new(2024, 6).unwrap()
    }

    fn june_10() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    #[tokio::test]
    async fn memory_source_serves_fixture() {
        let source = MemorySource::new()
            .with_month(june(), vec![MonthAvailabilityEntry::new(5, false)])
            .with_day(
                june_10(),
                vec![RawAppointment::new("a1", "2024-06-10T09:00:00", "Ana")],
            );

        let entries = source.month_availability("p-1", june()).await.unwrap();
        assert_eq!(entries, vec![MonthAvailabilityEntry::new(5, false)]);

        let appointments = source.day_appointments("p-1", june_10()).await.unwrap();
        assert_eq!(appointments.len(), 1);

        assert_eq!(source.availability_calls(), 1);
        assert_eq!(source.appointment_calls(), 1);
    }

    #[tokio::test]
    async fn memory_source_unknown_keys_are_empty() {
        let source = MemorySource::new();
        let next_month = june().succ().unwrap();
        assert!(source.month_availability("p-1", next_month).await.unwrap().is_empty());
        assert!(source.day_appointments("p-1", june_10()).await.unwrap().is_empty());
    }

    #[test]
    fn fixture_from_json() {
        let fixture = Fixture::from_json(
            r#"{
                "availability": {"2024-06": [{"day": 5, "available": false}]},
                "appointments": {
                    "2024-06-10": [
                        {"id": "a1", "date": "2024-06-10T09:00:00", "user": {"name": "Ana"}}
                    ]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(fixture.availability[&june()].len(), 1);
        assert_eq!(fixture.appointments[&june_10()][0].id, "a1");
    }

    #[test]
    fn fixture_sections_optional() {
        let fixture = Fixture::from_json("{}").unwrap();
        assert!(fixture.availability.is_empty());
        assert!(fixture.appointments.is_empty());
    }

    #[test]
    fn fixture_invalid_json() {
        let err = Fixture::from_json(r#"{"availability": {"2024-13": []}}"#).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ConfigurationError);
    }

    #[tokio::test]
    async fn error_source_returns_error() {
        let source = ErrorSource::new("http", ProviderError::configuration("no base_url"));
        assert_eq!(source.name(), "http");

        let err = source.month_availability("p-1", june()).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ConfigurationError);
        assert_eq!(err.source_name(), Some("http"));

        assert!(source.day_appointments("p-1", june_10()).await.is_err());
    }
}
