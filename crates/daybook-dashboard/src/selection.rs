//! Date and month selection.

use chrono::NaiveDate;
use daybook_core::{YearMonth, policy};
use tracing::debug;

/// Current selection of the scheduling view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    /// The day whose appointments are listed.
    pub selected_date: NaiveDate,
    /// The month shown by the calendar; may differ from `selected_date`'s.
    pub displayed_month: YearMonth,
}

/// Owns [`SelectionState`] and decides which gestures may change it.
///
/// Every accepted mutation bumps [`revision`](Self::revision), so callers can
/// tell when dependent data must be recomputed.
#[derive(Debug, Clone)]
pub struct SelectionController {
    state: SelectionState,
    revision: u64,
}

impl SelectionController {
    /// Starts with `today` selected and its month displayed.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            state: SelectionState {
                selected_date: today,
                displayed_month: YearMonth::of(today),
            },
            revision: 0,
        }
    }

    /// Selects `day` unless it is unavailable or disabled.
    ///
    /// Rejected gestures leave the state untouched. Returns whether the
    /// gesture was accepted.
    pub fn select_date(&mut self, day: NaiveDate, day_is_available: bool, day_is_disabled: bool) -> bool {
        if !policy::accepts_selection(day_is_available, day_is_disabled) {
            debug!(%day, day_is_available, day_is_disabled, "ignoring date selection");
            return false;
        }
        if self.state.selected_date != day {
            self.state.selected_date = day;
            self.revision += 1;
        }
        true
    }

    /// Shows `month` on the calendar. Always accepted.
    pub fn change_month(&mut self, month: YearMonth) {
        if self.state.displayed_month != month {
            self.state.displayed_month = month;
            self.revision += 1;
        }
    }

    /// The selected day.
    pub fn selected_date(&self) -> NaiveDate {
        self.state.selected_date
    }

    /// The displayed month.
    pub fn displayed_month(&self) -> YearMonth {
        self.state.displayed_month
    }

    /// Snapshot of the whole state.
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Number of changes applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
