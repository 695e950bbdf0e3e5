//! Scheduling business policies.
//!
//! These rules are fixed policy rather than backend data. Each one is a small
//! pure predicate so it can be changed (for instance to per-provider working
//! days) without touching the stores or the view composition.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};

use crate::appointment::MonthAvailabilityEntry;
use crate::time::{YearMonth, is_same_day, is_weekend};

/// Days the calendar always disables, whatever the backend reports.
pub fn is_closed_day(date: NaiveDate) -> bool {
    is_weekend(date)
}

/// Days the calendar marks as bookable (Monday to Friday).
///
/// This is the `available` modifier a day-click gesture carries.
pub fn is_bookable_day(date: NaiveDate) -> bool {
    !is_closed_day(date)
}

/// Every closed day of a month.
pub fn closed_days(month: YearMonth) -> impl Iterator<Item = NaiveDate> {
    month.days().filter(|d| is_closed_day(*d))
}

/// Builds the disabled-day set of a month.
///
/// Unavailable entries are expanded against `month`; entries whose day does
/// not exist in that month are ignored. Closed days are always included.
pub fn disabled_days(month: YearMonth, entries: &[MonthAvailabilityEntry]) -> BTreeSet<NaiveDate> {
    entries
        .iter()
        .filter(|entry| !entry.available)
        .filter_map(|entry| month.day(entry.day))
        .chain(closed_days(month))
        .collect()
}

/// Whether a day-selection gesture may change the selected date.
pub fn accepts_selection(day_is_available: bool, day_is_disabled: bool) -> bool {
    day_is_available && !day_is_disabled
}

/// The next-appointment card is only shown while viewing today.
pub fn shows_next_appointment(selected: NaiveDate, now: NaiveDateTime) -> bool {
    is_same_day(selected, now)
}

/// Earliest month the calendar lets the user page back to.
pub fn earliest_navigable_month(today: NaiveDate) -> YearMonth {
    YearMonth::of(today)
}
