//! ScheduleSource trait and implementations (HTTP, in-memory).
//!
//! This crate provides the remote data boundary of the scheduling view:
//!
//! - [`ScheduleSource`] - The trait every backend implements
//! - [`RawAppointment`] - Appointment data as sent on the wire
//! - [`normalize_appointment`] - Conversion of wire data to [`daybook_core::Appointment`]
//! - [`ProviderError`] - Error types for source operations
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │  Booking API    │    │  Fixture JSON   │
//! └────────┬────────┘    └────────┬────────┘
//!          │                      │
//!          ▼                      ▼
//! ┌─────────────────┐    ┌─────────────────┐
//! │   HttpSource    │    │  MemorySource   │
//! └────────┬────────┘    └────────┬────────┘
//!          │                      │
//!          │    ScheduleSource    │
//!          └──────────┬───────────┘
//!                     │
//!                     ▼
//!            ┌────────────────┐
//!            │ RawAppointment │
//!            └───────┬────────┘
//!                    │
//!                    ▼ normalize_appointment()
//!              ┌─────────────┐
//!              │ Appointment │
//!              └─────────────┘
//! ```

pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod normalize;
pub mod raw;
pub mod source;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use normalize::{normalize_appointment, normalize_appointments};
pub use raw::{RawAppointment, RawClient};
pub use source::{BoxFuture, ErrorSource, Fixture, MemorySource, ScheduleSource};
