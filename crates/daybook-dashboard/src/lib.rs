//! Selection state, fetch-guarded stores and the scheduling view.
//!
//! - [`SelectionController`] - selected day and displayed month
//! - [`AvailabilityStore`] - availability of the month last fetched
//! - [`AppointmentStore`] - appointments of the day last fetched
//! - [`SchedulingView`] - wires gestures to the stores and derives the view
//!
//! Both stores cache on their key and accept only the latest issued fetch;
//! see [`fetch`] for the bookkeeping.

pub mod appointments;
pub mod availability;
pub mod error;
pub mod fetch;
pub mod selection;
pub mod view;

pub use appointments::{AppointmentKey, AppointmentStore};
pub use availability::{AvailabilityKey, AvailabilityStore};
pub use error::{FetchFailure, FetchOutcome};
pub use fetch::{FetchGuard, FetchTicket};
pub use selection::{SelectionController, SelectionState};
pub use view::{SchedulingView, StoreKind, ViewUpdate};
