//! RawAppointment to Appointment conversion.
//!
//! Normalization is where an appointment enters the system: the timestamp is
//! parsed as a wall-clock value and the display time is formatted once.
//! Entries whose timestamp cannot be parsed are dropped with a warning.

use daybook_core::{Appointment, parse_wall_clock};
use tracing::warn;

use crate::raw::RawAppointment;

/// Converts a [`RawAppointment`] into an [`Appointment`].
///
/// Returns `None` if the timestamp is not valid ISO-8601.
pub fn normalize_appointment(raw: &RawAppointment) -> Option<Appointment> {
    let Some(date) = parse_wall_clock(&raw.date) else {
        warn!(id = %raw.id, date = %raw.date, "skipping appointment with unparseable date");
        return None;
    };

    let appointment = Appointment::new(&raw.id, date, &raw.user.name);
    Some(match raw.user.avatar_url {
        Some(ref url) => appointment.with_avatar_url(url),
        None => appointment,
    })
}

/// Normalizes a day's worth of raw appointments, preserving source order.
pub fn normalize_appointments(raw: &[RawAppointment]) -> Vec<Appointment> {
    raw.iter().filter_map(normalize_appointment).collect()
}
