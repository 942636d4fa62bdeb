use time::Duration;

use crate::entity::{DateOut, DateReturned};

/// Billable days of a rental. Any started day is billed in full, with a minimum of one.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RentalDays(i64);

impl RentalDays {
    pub fn between(date_out: &DateOut, date_returned: &DateReturned) -> Self {
        let elapsed = *date_returned.as_ref() - *date_out.as_ref();
        let whole = elapsed.whole_days();
        let days = if elapsed > Duration::days(whole) {
            whole + 1
        } else {
            whole
        };
        Self(days.max(1))
    }

    pub fn count(&self) -> i64 {
        self.0
    }
}
