//! Appointment and availability types.
//!
//! - [`Appointment`]: one booked slot, with its display time computed once
//! - [`MonthAvailabilityEntry`]: one day's capacity signal within a month
//! - [`Partition`]: appointments split into morning and afternoon buckets

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::time::{DayPeriod, format_display_time};

/// A booked appointment for the provider.
///
/// Appointments are replaced wholesale whenever a new day is loaded and are
/// never mutated in place, so `display_time` is computed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Opaque unique identifier.
    pub id: String,
    /// Scheduled instant (local wall clock).
    pub date: NaiveDateTime,
    /// Name of the client who booked the slot.
    pub client_name: String,
    /// Avatar of the client, if the source has one.
    pub client_avatar_url: Option<String>,
    /// `HH:MM` rendering of `date`.
    pub display_time: String,
}

impl Appointment {
    /// Creates an appointment and formats its display time.
    pub fn new(id: impl Into<String>, date: NaiveDateTime, client_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date,
            client_name: client_name.into(),
            client_avatar_url: None,
            display_time: format_display_time(date),
        }
    }

    /// Builder method to set the client avatar.
    pub fn with_avatar_url(mut self, url: impl Into<String>) -> Self {
        self.client_avatar_url = Some(url.into());
        self
    }

    /// The bucket this appointment is listed under.
    pub fn period(&self) -> DayPeriod {
        DayPeriod::of(self.date)
    }

    /// Returns true if the appointment starts strictly after `now`.
    pub fn is_after(&self, now: NaiveDateTime) -> bool {
        self.date > now
    }
}

/// Booking capacity of one day in a queried month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthAvailabilityEntry {
    /// Day of month (1..31).
    pub day: u32,
    /// Whether at least one open slot exists that day.
    pub available: bool,
}

impl MonthAvailabilityEntry {
    /// Creates an entry.
    pub fn new(day: u32, available: bool) -> Self {
        Self { day, available }
    }
}

/// Appointments split by time of day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Appointments before noon.
    pub morning: Vec<Appointment>,
    /// Appointments at or after noon.
    pub afternoon: Vec<Appointment>,
}

/// Splits appointments into morning (`hour < 12`) and afternoon (`hour >= 12`).
///
/// Every appointment lands in exactly one bucket; order inside each bucket
/// follows the input.
pub fn partition(appointments: &[Appointment]) -> Partition {
    let (morning, afternoon): (Vec<_>, Vec<_>) = appointments
        .iter()
        .cloned()
        .partition(|a| a.period() == DayPeriod::Morning);
    Partition { morning, afternoon }
}

/// Returns the earliest appointment strictly after `now`.
///
/// The input order is not trusted: candidates are compared by `date`.
pub fn find_next(appointments: &[Appointment], now: NaiveDateTime) -> Option<&Appointment> {
    let mut sorted: Vec<&Appointment> = appointments.iter().collect();
    sorted.sort_by_key(|a| a.date);
    sorted.into_iter().find(|a| a.is_after(now))
}
