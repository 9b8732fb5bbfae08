use chrono::{Days, Local, NaiveDate};

/// Inclusive calendar range used by lease fixtures and inventory checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// A range of `days` days that starts `offset` days after `today`.
    pub fn after(today: NaiveDate, offset: u64, days: u64) -> Self {
        let start = today + Days::new(offset);
        let end = start + Days::new(days.saturating_sub(1));
        Self { start, end }
    }

    /// Same as [`DateRange::after`], anchored on the local calendar date.
    pub fn from_today(offset: u64, days: u64) -> Self {
        Self::after(Local::now().date_naive(), offset, days)
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
