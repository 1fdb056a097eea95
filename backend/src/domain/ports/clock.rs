//! Calendar clock port.
//!
//! Date-only "not before today" rules depend on the current calendar day;
//! injecting the clock keeps those rules deterministic under test.

use chrono::{NaiveDate, Utc};

/// Source of the current calendar day.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    /// Current calendar day, time-of-day truncated.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock implementation used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Fixed clock for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_tracks_utc_date() {
        assert_eq!(SystemClock.today(), Utc::now().date_naive());
    }

    #[test]
    fn fixed_clock_returns_configured_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date");
        assert_eq!(FixedClock(date).today(), date);
    }
}
