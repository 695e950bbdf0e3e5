//! Core types: time helpers, appointments, scheduling policies, formatting

pub mod appointment;
pub mod format;
pub mod policy;
pub mod time;
pub mod tracing;
pub mod view;

pub use appointment::{Appointment, MonthAvailabilityEntry, Partition, find_next, partition};
pub use format::{FormatOptions, JsonAppointment, JsonOutput, OutputFormat, ViewFormatter};
pub use time::{DayPeriod, ParseYearMonthError, YearMonth, parse_wall_clock};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use view::{DerivedView, HeaderLabels, SourceStatus};
