//! Output formatting for the schedule view.
//!
//! This module renders a [`DerivedView`] in two formats:
//! - **TTY**: human-readable terminal output
//! - **JSON**: machine-readable output for scripts and other front ends
//!
//! # Example
//!
//! ```rust
//! use daybook_core::format::{FormatOptions, OutputFormat, ViewFormatter};
//!
//! let formatter = ViewFormatter::new(FormatOptions::default());
//! // let text = formatter.render(&view, OutputFormat::Tty)?;
//! # let _ = (formatter, OutputFormat::Json);
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::appointment::Appointment;
use crate::time::{format_long_date, format_month};
use crate::view::DerivedView;

/// The output format for the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable terminal output.
    #[default]
    Tty,
    /// Machine-readable JSON output.
    Json,
}

/// Labels and switches used when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Title line of the schedule.
    pub title: String,
    /// Marker printed before the date when viewing today.
    pub today_marker: String,
    /// Heading of the next-appointment card.
    pub next_title: String,
    /// Heading of the morning bucket.
    pub morning_title: String,
    /// Heading of the afternoon bucket.
    pub afternoon_title: String,
    /// Text printed for an empty bucket.
    pub empty_period_text: String,
    /// Whether to print the calendar summary (month and disabled days).
    pub show_calendar: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            title: "Scheduled appointments".to_string(),
            today_marker: "Today".to_string(),
            next_title: "Next appointment".to_string(),
            morning_title: "Morning".to_string(),
            afternoon_title: "Afternoon".to_string(),
            empty_period_text: "No appointments in this period".to_string(),
            show_calendar: true,
        }
    }
}

/// A single appointment row in JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonAppointment {
    pub id: String,
    pub time: String,
    pub client: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl From<&Appointment> for JsonAppointment {
    fn from(a: &Appointment) -> Self {
        Self {
            id: a.id.clone(),
            time: a.display_time.clone(),
            client: a.client_name.clone(),
            avatar_url: a.client_avatar_url.clone(),
        }
    }
}

/// JSON output for the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonOutput {
    pub date: NaiveDate,
    pub date_label: String,
    pub weekday: String,
    pub today: bool,
    pub month: String,
    pub disabled_days: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<JsonAppointment>,
    pub morning: Vec<JsonAppointment>,
    pub afternoon: Vec<JsonAppointment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,
}

/// Formats derived views.
#[derive(Debug, Clone, Default)]
pub struct ViewFormatter {
    options: FormatOptions,
}

impl ViewFormatter {
    /// Creates a formatter with the given options.
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Returns the formatter options.
    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Renders the view in the requested format.
    pub fn render(&self, view: &DerivedView, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Tty => Ok(self.format_tty(view).join("\n")),
            OutputFormat::Json => serde_json::to_string_pretty(&self.format_json(view)),
        }
    }

    /// Non-fatal notices about stale or pending data.
    pub fn notices(&self, view: &DerivedView) -> Vec<String> {
        let mut notices = Vec::new();
        if view.availability.needs_notice() {
            notices.push(stale_notice("availability", view.availability.last_error.as_deref()));
        }
        if view.appointments.needs_notice() {
            notices.push(stale_notice("appointments", view.appointments.last_error.as_deref()));
        }
        if let Some(date) = view.appointments_date.filter(|_| view.shows_previous_day()) {
            notices.push(format!("showing appointments of {}", format_long_date(date)));
        }
        notices
    }

    /// Renders the view as terminal lines.
    pub fn format_tty(&self, view: &DerivedView) -> Vec<String> {
        let opts = &self.options;
        let mut lines = vec![opts.title.clone()];

        let mut header = Vec::new();
        if view.header.is_today {
            header.push(opts.today_marker.as_str());
        }
        header.push(view.header.date.as_str());
        header.push(view.header.weekday.as_str());
        lines.push(header.join(" | "));

        for notice in self.notices(view) {
            lines.push(format!("! {}", notice));
        }

        if let Some(next) = &view.next_appointment {
            lines.push(String::new());
            lines.push(opts.next_title.clone());
            lines.push(appointment_line(next));
        }

        for (title, bucket) in [
            (&opts.morning_title, &view.morning),
            (&opts.afternoon_title, &view.afternoon),
        ] {
            lines.push(String::new());
            lines.push(title.clone());
            if bucket.is_empty() {
                lines.push(format!("  {}", opts.empty_period_text));
            }
            lines.extend(bucket.iter().map(appointment_line));
        }

        if opts.show_calendar {
            lines.push(String::new());
            lines.push(format_month(view.displayed_month));
            let days: Vec<String> = view
                .disabled_days
                .iter()
                .map(|d| d.day().to_string())
                .collect();
            lines.push(format!("  disabled: {}", days.join(", ")));
        }

        lines
    }

    /// Builds the JSON output for the view.
    pub fn format_json(&self, view: &DerivedView) -> JsonOutput {
        JsonOutput {
            date: view.selected_date,
            date_label: view.header.date.clone(),
            weekday: view.header.weekday.clone(),
            today: view.header.is_today,
            month: view.displayed_month.to_string(),
            disabled_days: view.disabled_days.iter().map(|d| d.day()).collect(),
            next: view.next_appointment.as_ref().map(JsonAppointment::from),
            morning: view.morning.iter().map(JsonAppointment::from).collect(),
            afternoon: view.afternoon.iter().map(JsonAppointment::from).collect(),
            notices: self.notices(view),
        }
    }
}

fn appointment_line(appointment: &Appointment) -> String {
    format!("  {}  {}", appointment.display_time, appointment.client_name)
}

fn stale_notice(what: &str, error: Option<&str>) -> String {
    match error {
        Some(error) => format!("{} could not be refreshed: {}", what, error),
        None => format!("{} could not be refreshed", what),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = FormatOptions::default();
        assert_eq!(opts.today_marker, "Today");
        assert_eq!(opts.empty_period_text, "No appointments in this period");
        assert!(opts.show_calendar);
    }

    #[test]
    fn output_format_serde() {
        assert_eq!(serde_json::to_string(&OutputFormat::Tty).unwrap(), "\"tty\"");
        let parsed: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(parsed, OutputFormat::Json);
    }

    #[test]
    fn stale_notice_text() {
        assert_eq!(
            stale_notice("appointments", Some("network_error: down")),
            "appointments could not be refreshed: network_error: down"
        );
        assert_eq!(stale_notice("availability", None), "availability could not be refreshed");
    }

    #[test]
    fn options_partial_deserialize() {
        let opts: FormatOptions = serde_json::from_str(r#"{"today_marker": "Hoje"}"#).unwrap();
        assert_eq!(opts.today_marker, "Hoje");
        assert_eq!(opts.morning_title, "Morning");
    }
}

#[cfg(test)]
mod golden_tests;
