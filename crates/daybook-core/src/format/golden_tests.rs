//! Golden tests for schedule rendering.
//!
//! Inline insta snapshots keep the terminal layout and the JSON shape stable.
//! Run `cargo insta review` after an intentional change.

use chrono::{NaiveDate, NaiveDateTime};

use crate::appointment::{Appointment, MonthAvailabilityEntry};
use crate::format::{FormatOptions, OutputFormat, ViewFormatter};
use crate::policy::disabled_days;
use crate::time::YearMonth;
use crate::view::{DerivedView, HeaderLabels, SourceStatus};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(2024, 6, d).and_hms_opt(h, min, 0).unwrap()
}

/// The June 10, 2024 schedule, viewed at 08:00 the same day.
fn sample_view() -> DerivedView {
    let selected = date(2024, 6, 10);
    let month = YearMonth::of(selected);
    let ana = Appointment::new("a1", at(10, 9, 0), "Ana Souza")
        .with_avatar_url("https://cdn.example.com/ana.png");
    let bruno = Appointment::new("a2", at(10, 14, 30), "Bruno Lima");

    DerivedView {
        selected_date: selected,
        displayed_month: month,
        earliest_month: month,
        header: HeaderLabels::new(selected, selected),
        disabled_days: disabled_days(month, &[MonthAvailabilityEntry::new(5, false)])
            .into_iter()
            .collect(),
        appointments_date: Some(selected),
        morning: vec![ana.clone()],
        afternoon: vec![bruno],
        next_appointment: Some(ana),
        availability: SourceStatus::default(),
        appointments: SourceStatus::default(),
        generated_at: at(10, 8, 0),
    }
}

#[test]
fn tty_today_with_next() {
    let output = ViewFormatter::default()
        .render(&sample_view(), OutputFormat::Tty)
        .unwrap();
    insta::assert_snapshot!(output, @r"
    Scheduled appointments
    Today | June 10 | Monday

    Next appointment
      09:00  Ana Souza

    Morning
      09:00  Ana Souza

    Afternoon
      14:30  Bruno Lima

    June 2024
      disabled: 1, 2, 5, 8, 9, 15, 16, 22, 23, 29, 30
    ");
}

#[test]
fn tty_other_day_empty_buckets() {
    let mut view = sample_view();
    view.selected_date = date(2024, 6, 11);
    view.header = HeaderLabels::new(view.selected_date, date(2024, 6, 10));
    view.appointments_date = Some(view.selected_date);
    view.morning.clear();
    view.afternoon.clear();
    view.next_appointment = None;

    let formatter = ViewFormatter::new(FormatOptions {
        show_calendar: false,
        ..FormatOptions::default()
    });
    let output = formatter.render(&view, OutputFormat::Tty).unwrap();
    insta::assert_snapshot!(output, @r"
    Scheduled appointments
    June 11 | Tuesday

    Morning
      No appointments in this period

    Afternoon
      No appointments in this period
    ");
}

#[test]
fn tty_stale_notices() {
    let mut view = sample_view();
    view.selected_date = date(2024, 6, 12);
    view.header = HeaderLabels::new(view.selected_date, date(2024, 6, 10));
    view.next_appointment = None;
    view.appointments = SourceStatus {
        loading: false,
        stale: true,
        last_error: Some("network_error: connection refused".to_string()),
    };

    let formatter = ViewFormatter::new(FormatOptions {
        show_calendar: false,
        ..FormatOptions::default()
    });
    let output = formatter.render(&view, OutputFormat::Tty).unwrap();
    insta::assert_snapshot!(output, @r"
    Scheduled appointments
    June 12 | Wednesday
    ! appointments could not be refreshed: network_error: connection refused
    ! showing appointments of June 10

    Morning
      09:00  Ana Souza

    Afternoon
      14:30  Bruno Lima
    ");
}

#[test]
fn tty_custom_labels() {
    let formatter = ViewFormatter::new(FormatOptions {
        title: "Horários agendados".to_string(),
        today_marker: "Hoje".to_string(),
        next_title: "Agendamento a seguir".to_string(),
        morning_title: "Manhã".to_string(),
        afternoon_title: "Tarde".to_string(),
        empty_period_text: "Nenhum agendamento neste período".to_string(),
        show_calendar: false,
    });
    let lines = formatter.format_tty(&sample_view());
    assert_eq!(lines[0], "Horários agendados");
    assert_eq!(lines[1], "Hoje | June 10 | Monday");
    assert!(lines.contains(&"Agendamento a seguir".to_string()));
    assert!(lines.contains(&"Manhã".to_string()));
    assert!(lines.contains(&"Tarde".to_string()));
}

#[test]
fn json_today_with_next() {
    let output = ViewFormatter::default().format_json(&sample_view());
    insta::assert_json_snapshot!(output, @r#"
    {
      "date": "2024-06-10",
      "date_label": "June 10",
      "weekday": "Monday",
      "today": true,
      "month": "2024-06",
      "disabled_days": [
        1,
        2,
        5,
        8,
        9,
        15,
        16,
        22,
        23,
        29,
        30
      ],
      "next": {
        "id": "a1",
        "time": "09:00",
        "client": "Ana Souza",
        "avatar_url": "https://cdn.example.com/ana.png"
      },
      "morning": [
        {
          "id": "a1",
          "time": "09:00",
          "client": "Ana Souza",
          "avatar_url": "https://cdn.example.com/ana.png"
        }
      ],
      "afternoon": [
        {
          "id": "a2",
          "time": "14:30",
          "client": "Bruno Lima"
        }
      ]
    }
    "#);
}

#[test]
fn json_render_includes_notices() {
    let mut view = sample_view();
    view.availability.stale = true;
    let text = ViewFormatter::default()
        .render(&view, OutputFormat::Json)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        value["notices"][0],
        serde_json::json!("availability could not be refreshed")
    );
    assert_eq!(value["next"]["time"], serde_json::json!("09:00"));
}
