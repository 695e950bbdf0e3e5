//! Display-ready view models handed to the presentation layer.
//!
//! A [`DerivedView`] is recomputed from selection state and store contents on
//! every change and never cached beyond one render.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::appointment::Appointment;
use crate::time::{YearMonth, format_long_date, format_weekday};

/// Header labels for the selected date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderLabels {
    /// Long-form date, e.g. `June 10`.
    pub date: String,
    /// Weekday name, e.g. `Monday`.
    pub weekday: String,
    /// Whether the selected date is today.
    pub is_today: bool,
}

impl HeaderLabels {
    /// Builds the labels for `selected`, comparing against `today`.
    pub fn new(selected: NaiveDate, today: NaiveDate) -> Self {
        Self {
            date: format_long_date(selected),
            weekday: format_weekday(selected),
            is_today: selected == today,
        }
    }
}

/// Fetch state of one store, as shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStatus {
    /// A fetch for the current key is in flight.
    pub loading: bool,
    /// The last fetch failed; the data shown is the last known good one.
    pub stale: bool,
    /// Message of the last failure.
    pub last_error: Option<String>,
}

impl SourceStatus {
    /// Returns true if the presentation layer should show a notice.
    pub fn needs_notice(&self) -> bool {
        self.stale
    }
}

/// Everything the presentation layer needs to draw the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedView {
    /// The date whose appointments are listed.
    pub selected_date: NaiveDate,
    /// The month shown by the calendar widget.
    pub displayed_month: YearMonth,
    /// The calendar may not page before this month.
    pub earliest_month: YearMonth,
    /// Header labels for `selected_date`.
    pub header: HeaderLabels,
    /// Days the calendar must render as disabled, ascending.
    pub disabled_days: Vec<NaiveDate>,
    /// Day the listed appointments belong to, if any were loaded.
    pub appointments_date: Option<NaiveDate>,
    /// Appointments before noon.
    pub morning: Vec<Appointment>,
    /// Appointments at or after noon.
    pub afternoon: Vec<Appointment>,
    /// Soonest upcoming appointment; only set while viewing today.
    pub next_appointment: Option<Appointment>,
    /// Availability fetch state.
    pub availability: SourceStatus,
    /// Appointment fetch state.
    pub appointments: SourceStatus,
    /// The instant the view was derived at.
    pub generated_at: NaiveDateTime,
}

impl DerivedView {
    /// Returns true if `date` is disabled on the calendar.
    pub fn is_disabled(&self, date: NaiveDate) -> bool {
        self.disabled_days.binary_search(&date).is_ok()
    }

    /// Returns true if the listed appointments belong to another day than the
    /// selected one (a fetch is pending or failed).
    pub fn shows_previous_day(&self) -> bool {
        self.appointments_date
            .is_some_and(|date| date != self.selected_date)
    }

    /// Total number of listed appointments.
    pub fn appointment_count(&self) -> usize {
        self.morning.len() + self.afternoon.len()
    }
}
