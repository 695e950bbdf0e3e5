//! The scheduling view: composition root of selection and stores.
//!
//! [`SchedulingView`] turns gestures into selection changes, issues the
//! fetches whose keys changed, applies their results as they complete and
//! derives a [`DerivedView`] on demand.
//!
//! Fetches run concurrently in a [`FuturesUnordered`]; gestures never wait
//! for them. Results are applied one at a time through
//! [`next_completion`](SchedulingView::next_completion), and each store
//! drops results that a newer request superseded.

use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use daybook_core::{DerivedView, HeaderLabels, MonthAvailabilityEntry, YearMonth, policy};
use daybook_providers::{BoxFuture, ProviderResult, RawAppointment, ScheduleSource};
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tracing::debug;

use crate::appointments::{AppointmentKey, AppointmentStore};
use crate::availability::{AvailabilityKey, AvailabilityStore};
use crate::error::FetchOutcome;
use crate::fetch::FetchTicket;
use crate::selection::SelectionController;

/// Which store a completion was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Availability,
    Appointments,
}

impl StoreKind {
    /// Lowercase name used in logs and notices.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Availability => "availability",
            Self::Appointments => "appointments",
        }
    }
}

/// Result of applying one completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewUpdate {
    /// Store the result was handed to.
    pub store: StoreKind,
    /// What the store did with it.
    pub outcome: FetchOutcome,
}

enum Completion {
    Availability(
        FetchTicket<AvailabilityKey>,
        ProviderResult<Vec<MonthAvailabilityEntry>>,
    ),
    Appointments(
        FetchTicket<AppointmentKey>,
        ProviderResult<Vec<RawAppointment>>,
    ),
}

/// Scheduling view for one provider.
pub struct SchedulingView {
    source: Arc<dyn ScheduleSource>,
    provider_id: String,
    selection: SelectionController,
    availability: AvailabilityStore,
    appointments: AppointmentStore,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
}

impl fmt::Debug for SchedulingView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulingView")
            .field("source", &self.source.name())
            .field("provider_id", &self.provider_id)
            .field("selection", &self.selection)
            .field("availability", &self.availability)
            .field("appointments", &self.appointments)
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}

impl SchedulingView {
    /// Creates a view with `today` selected and issues the initial fetches.
    pub fn new(
        source: Arc<dyn ScheduleSource>,
        provider_id: impl Into<String>,
        today: NaiveDate,
    ) -> Self {
        let mut view = Self {
            source,
            provider_id: provider_id.into(),
            selection: SelectionController::new(today),
            availability: AvailabilityStore::new(),
            appointments: AppointmentStore::new(),
            in_flight: FuturesUnordered::new(),
        };
        view.sync();
        view
    }

    /// Day-click gesture from the calendar.
    ///
    /// Only days of the displayed month can be clicked, and only once that
    /// month's availability is held; otherwise the click is ignored. The
    /// day's modifiers are computed from policy and the held availability.
    /// Returns whether the click was accepted.
    pub fn click_day(&mut self, day: NaiveDate) -> bool {
        let month = self.selection.displayed_month();
        if YearMonth::of(day) != month {
            debug!(%day, %month, "click outside the displayed month ignored");
            return false;
        }
        if !self.availability.is_loaded(&self.provider_id, month) {
            debug!(%day, %month, "click before the month's availability is known ignored");
            return false;
        }

        let day_is_available = policy::is_bookable_day(day);
        let day_is_disabled = self.availability.disabled_days_for(month).contains(&day);
        self.select_date(day, day_is_available, day_is_disabled)
    }

    /// Raw date-selection gesture with caller-supplied modifiers.
    pub fn select_date(&mut self, day: NaiveDate, day_is_available: bool, day_is_disabled: bool) -> bool {
        let accepted = self
            .selection
            .select_date(day, day_is_available, day_is_disabled);
        self.sync();
        accepted
    }

    /// Month-change gesture from the calendar.
    pub fn change_month(&mut self, month: YearMonth) {
        self.selection.change_month(month);
        self.sync();
    }

    /// Switches to another provider; both stores refetch.
    pub fn set_provider(&mut self, provider_id: impl Into<String>) {
        let provider_id = provider_id.into();
        if provider_id != self.provider_id {
            debug!(from = %self.provider_id, to = %provider_id, "provider changed");
            self.provider_id = provider_id;
            self.sync();
        }
    }

    /// Re-issues the fetches of stores whose last fetch failed.
    ///
    /// Returns the number of fetches issued.
    pub fn retry(&mut self) -> usize {
        if self.availability.is_stale() {
            self.availability.invalidate();
        }
        if self.appointments.is_stale() {
            self.appointments.invalidate();
        }
        self.sync()
    }

    /// Issues fetches for every store whose key changed.
    fn sync(&mut self) -> usize {
        let month = self.selection.displayed_month();
        let date = self.selection.selected_date();
        let mut issued = 0;

        if let Some(ticket) = self.availability.begin(&self.provider_id, month) {
            let source = Arc::clone(&self.source);
            let provider_id = self.provider_id.clone();
            self.in_flight.push(Box::pin(async move {
                let result = source.month_availability(&provider_id, month).await;
                Completion::Availability(ticket, result)
            }));
            issued += 1;
        }

        if let Some(ticket) = self.appointments.begin(&self.provider_id, date) {
            let source = Arc::clone(&self.source);
            let provider_id = self.provider_id.clone();
            self.in_flight.push(Box::pin(async move {
                let result = source.day_appointments(&provider_id, date).await;
                Completion::Appointments(ticket, result)
            }));
            issued += 1;
        }

        debug!(
            revision = self.selection.revision(),
            issued,
            in_flight = self.in_flight.len(),
            "selection synced"
        );
        issued
    }

    /// Waits for the next fetch to finish and applies it.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<ViewUpdate> {
        let completion = self.in_flight.next().await?;
        Some(self.apply(completion))
    }

    /// Applies every in-flight fetch, in completion order.
    pub async fn settle(&mut self) -> Vec<ViewUpdate> {
        let mut updates = Vec::new();
        while let Some(update) = self.next_completion().await {
            updates.push(update);
        }
        updates
    }

    fn apply(&mut self, completion: Completion) -> ViewUpdate {
        match completion {
            Completion::Availability(ticket, result) => ViewUpdate {
                store: StoreKind::Availability,
                outcome: self.availability.complete(ticket, result),
            },
            Completion::Appointments(ticket, result) => ViewUpdate {
                store: StoreKind::Appointments,
                outcome: self.appointments.complete(ticket, result),
            },
        }
    }

    /// Number of fetches not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Provider whose calendar is viewed.
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// The selection controller.
    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// The availability store.
    pub fn availability(&self) -> &AvailabilityStore {
        &self.availability
    }

    /// The appointment store.
    pub fn appointments(&self) -> &AppointmentStore {
        &self.appointments
    }

    /// Builds the view model as of `now`.
    pub fn derive(&self, now: NaiveDateTime) -> DerivedView {
        let today = now.date();
        let selected = self.selection.selected_date();
        let month = self.selection.displayed_month();
        let appointments_date = self.appointments.date();
        let buckets = self.appointments.partition();

        // The held list may still belong to the previous day.
        let next_appointment = if policy::shows_next_appointment(selected, now)
            && appointments_date == Some(selected)
        {
            self.appointments.find_next(now).cloned()
        } else {
            None
        };

        DerivedView {
            selected_date: selected,
            displayed_month: month,
            earliest_month: policy::earliest_navigable_month(today),
            header: HeaderLabels::new(selected, today),
            disabled_days: self.availability.disabled_days_for(month).into_iter().collect(),
            appointments_date,
            morning: buckets.morning,
            afternoon: buckets.afternoon,
            next_appointment,
            availability: self.availability.status(),
            appointments: self.appointments.status(),
            generated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use daybook_providers::{ErrorSource, MemorySource, ProviderError};
    use tokio::sync::oneshot;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        date(d).and_hms_opt(h, m, 0).unwrap()
    }

    fn june() -> YearMonth {
        YearMonth::new(2024, 6).unwrap()
    }

    fn july() -> YearMonth {
        YearMonth::new(2024, 7).unwrap()
    }

    fn fixture() -> MemorySource {
        MemorySource::new()
            .with_month(june(), vec![MonthAvailabilityEntry::new(5, false)])
            .with_day(
                date(10),
                vec![
                    RawAppointment::new("a2", "2024-06-10T14:30:00.000Z", "Bruno Lima"),
                    RawAppointment::new("a1", "2024-06-10T09:00:00.000Z", "Ana Souza"),
                ],
            )
            .with_day(
                date(11),
                vec![RawAppointment::new("b1", "2024-06-11T10:00:00.000Z", "Carla Dias")],
            )
    }

    /// Availability responses are held until the test releases them.
    #[derive(Default)]
    struct GatedSource {
        gates: Mutex<HashMap<YearMonth, oneshot::Receiver<Vec<MonthAvailabilityEntry>>>>,
    }

    impl GatedSource {
        fn gate(&self, month: YearMonth) -> oneshot::Sender<Vec<MonthAvailabilityEntry>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(month, rx);
            tx
        }
    }

    impl ScheduleSource for GatedSource {
        fn name(&self) -> &str {
            "gated"
        }

        fn month_availability(
            &self,
            _provider_id: &str,
            month: YearMonth,
        ) -> BoxFuture<'_, ProviderResult<Vec<MonthAvailabilityEntry>>> {
            let gate = self.gates.lock().unwrap().remove(&month);
            Box::pin(async move {
                match gate {
                    Some(rx) => rx.await.map_err(|_| ProviderError::server("gate dropped")),
                    None => Ok(Vec::new()),
                }
            })
        }

        fn day_appointments(
            &self,
            _provider_id: &str,
            _date: NaiveDate,
        ) -> BoxFuture<'_, ProviderResult<Vec<RawAppointment>>> {
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    #[tokio::test]
    async fn initial_mount_fetches_both_stores() {
        let source = Arc::new(fixture());
        let mut view = SchedulingView::new(source.clone(), "p-1", date(10));
        assert_eq!(view.in_flight(), 2);

        let updates = view.settle().await;
        assert_eq!(updates.len(), 2);
        assert!(updates.iter().all(|u| u.outcome == FetchOutcome::Applied));
        assert_eq!(source.availability_calls(), 1);
        assert_eq!(source.appointment_calls(), 1);
    }

    #[tokio::test]
    async fn derive_example_day() {
        let mut view = SchedulingView::new(Arc::new(fixture()), "p-1", date(10));
        view.settle().await;

        let derived = view.derive(at(10, 8, 0));
        assert_eq!(derived.selected_date, date(10));
        assert!(derived.header.is_today);
        assert_eq!(derived.header.date, "June 10");
        assert_eq!(derived.header.weekday, "Monday");
        assert_eq!(derived.morning.len(), 1);
        assert_eq!(derived.morning[0].display_time, "09:00");
        assert_eq!(derived.afternoon.len(), 1);
        assert_eq!(derived.afternoon[0].display_time, "14:30");
        assert_eq!(derived.next_appointment.as_ref().map(|a| a.id.as_str()), Some("a1"));
        assert!(derived.is_disabled(date(5)));
        assert!(derived.is_disabled(date(1)));
        assert!(!derived.is_disabled(date(10)));
        assert_eq!(derived.earliest_month, june());
        assert!(!derived.availability.stale);
        assert!(!derived.appointments.loading);
    }

    #[tokio::test]
    async fn next_card_only_for_today() {
        let mut view = SchedulingView::new(Arc::new(fixture()), "p-1", date(10));
        view.settle().await;

        assert!(view.click_day(date(11)));
        view.settle().await;

        let derived = view.derive(at(10, 8, 0));
        assert!(!derived.header.is_today);
        assert_eq!(derived.appointment_count(), 1);
        assert!(derived.next_appointment.is_none());
    }

    #[tokio::test]
    async fn next_card_hidden_while_previous_day_is_shown() {
        let mut view = SchedulingView::new(Arc::new(fixture()), "p-1", date(11));
        view.settle().await;

        // Day 10 is requested but its fetch has not been applied yet.
        assert!(view.click_day(date(10)));
        let derived = view.derive(at(10, 8, 0));
        assert_eq!(derived.appointments_date, Some(date(11)));
        assert!(derived.shows_previous_day());
        assert!(derived.appointments.loading);
        assert!(derived.next_appointment.is_none());
    }

    #[tokio::test]
    async fn click_on_weekend_is_ignored() {
        let source = Arc::new(fixture());
        let mut view = SchedulingView::new(source.clone(), "p-1", date(10));
        view.settle().await;

        assert!(!view.click_day(date(8)));
        assert_eq!(view.selection().selected_date(), date(10));
        assert_eq!(view.in_flight(), 0);
        assert_eq!(source.appointment_calls(), 1);
    }

    #[tokio::test]
    async fn click_on_unavailable_day_is_ignored() {
        let mut view = SchedulingView::new(Arc::new(fixture()), "p-1", date(10));
        view.settle().await;

        assert!(!view.click_day(date(5)));
        assert_eq!(view.selection().selected_date(), date(10));
    }

    #[tokio::test]
    async fn click_outside_displayed_month_is_ignored() {
        let source = Arc::new(fixture());
        let mut view = SchedulingView::new(source.clone(), "p-1", date(10));
        view.settle().await;
        view.change_month(july());
        view.settle().await;

        // Day 5 of June is unavailable, but July's entries are the ones held.
        assert!(!view.click_day(date(5)));
        assert!(!view.click_day(date(11)));
        assert_eq!(view.selection().selected_date(), date(10));
        assert_eq!(source.appointment_calls(), 1);
    }

    #[tokio::test]
    async fn click_before_availability_loads_is_ignored() {
        let mut view = SchedulingView::new(Arc::new(fixture()), "p-1", date(10));
        assert!(!view.click_day(date(11)));

        view.settle().await;
        assert!(view.click_day(date(11)));
    }

    #[tokio::test]
    async fn click_after_provider_change_waits_for_its_availability() {
        let mut view = SchedulingView::new(Arc::new(fixture()), "p-1", date(10));
        view.settle().await;

        view.set_provider("p-2");
        assert!(!view.click_day(date(11)));
        view.settle().await;
        assert!(view.click_day(date(11)));
    }

    #[tokio::test]
    async fn raw_select_with_unavailable_flag_is_ignored() {
        let mut view = SchedulingView::new(Arc::new(fixture()), "p-1", date(10));
        assert!(!view.select_date(date(11), false, false));
        assert_eq!(view.selection().selected_date(), date(10));
    }

    #[tokio::test]
    async fn unchanged_month_is_not_refetched() {
        let source = Arc::new(fixture());
        let mut view = SchedulingView::new(source.clone(), "p-1", date(10));
        view.settle().await;

        view.change_month(june());
        view.click_day(date(11));
        view.settle().await;
        assert_eq!(source.availability_calls(), 1);

        view.change_month(july());
        view.change_month(june());
        view.settle().await;
        assert_eq!(source.availability_calls(), 2);
        assert_eq!(view.availability().loaded_month(), Some(june()));
    }

    #[tokio::test]
    async fn newer_month_wins_over_late_response() {
        let source = Arc::new(GatedSource::default());
        let june_gate = source.gate(june());
        let july_gate = source.gate(july());

        let mut view = SchedulingView::new(source, "p-1", date(10));
        view.change_month(july());
        assert_eq!(view.in_flight(), 3);

        july_gate
            .send(vec![MonthAvailabilityEntry::new(3, false)])
            .unwrap();
        loop {
            let update = view.next_completion().await.unwrap();
            if update.store == StoreKind::Availability {
                assert_eq!(update.outcome, FetchOutcome::Applied);
                break;
            }
        }

        june_gate
            .send(vec![MonthAvailabilityEntry::new(5, false)])
            .unwrap();
        let updates = view.settle().await;
        assert!(updates.contains(&ViewUpdate {
            store: StoreKind::Availability,
            outcome: FetchOutcome::Discarded,
        }));

        assert_eq!(view.availability().loaded_month(), Some(july()));
        assert_eq!(
            view.availability().entries(),
            &[MonthAvailabilityEntry::new(3, false)]
        );
        let derived = view.derive(at(10, 8, 0));
        assert!(derived.is_disabled(NaiveDate::from_ymd_opt(2024, 7, 3).unwrap()));
    }

    #[tokio::test]
    async fn failures_surface_as_stale_status() {
        let failing = Arc::new(ErrorSource::new(
            "http",
            ProviderError::network("connection refused"),
        ));
        let mut view = SchedulingView::new(failing, "p-1", date(10));
        let updates = view.settle().await;
        assert!(updates.iter().all(|u| matches!(u.outcome, FetchOutcome::Failed(_))));

        let derived = view.derive(at(10, 8, 0));
        assert!(derived.availability.stale);
        assert!(derived.appointments.stale);
        assert!(derived.morning.is_empty());
        // Closed days still apply without data.
        assert!(derived.is_disabled(date(1)));
        assert!(!derived.is_disabled(date(5)));
    }

    #[tokio::test]
    async fn retry_reissues_failed_fetches_only() {
        let failing = Arc::new(ErrorSource::new("http", ProviderError::server("boom")));
        let mut view = SchedulingView::new(failing, "p-1", date(10));
        view.settle().await;

        assert_eq!(view.retry(), 2);
        assert_eq!(view.in_flight(), 2);
        view.settle().await;
        assert_eq!(view.availability().consecutive_failures(), 2);

        let source = Arc::new(fixture());
        let mut healthy = SchedulingView::new(source.clone(), "p-1", date(10));
        healthy.settle().await;
        assert_eq!(healthy.retry(), 0);
        assert_eq!(source.availability_calls(), 1);
    }

    #[tokio::test]
    async fn provider_change_refetches_both() {
        let source = Arc::new(fixture());
        let mut view = SchedulingView::new(source.clone(), "p-1", date(10));
        view.settle().await;

        view.set_provider("p-1");
        assert_eq!(view.in_flight(), 0);

        view.set_provider("p-2");
        assert_eq!(view.in_flight(), 2);
        view.settle().await;
        assert_eq!(view.provider_id(), "p-2");
        assert_eq!(source.availability_calls(), 2);
        assert_eq!(source.appointment_calls(), 2);
    }
}
