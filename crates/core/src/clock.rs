//! Wall-clock capability injected into the assistant and scheduler so both stay testable.

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, Offset, Utc};
use parking_lot::Mutex;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date of `instant` in the user's timezone.
    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&Local).date_naive()
    }

    fn today(&self) -> NaiveDate {
        self.local_date(self.now())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Calendar dates use a fixed offset (UTC by default).
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
    offset: FixedOffset,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
            offset: Utc.fix(),
        }
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock() = instant;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_advances_shared_instant() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let view = clock.clone();
        clock.advance(Duration::minutes(45));
        assert_eq!(view.now(), start + Duration::minutes(45));
    }

    #[test]
    fn manual_clock_dates_follow_offset() {
        let late = Utc.with_ymd_and_hms(2025, 3, 1, 23, 30, 0).unwrap();
        let utc = ManualClock::new(late);
        let tokyo = ManualClock::new(late).with_offset(FixedOffset::east_opt(9 * 3600).unwrap());
        assert_eq!(utc.today(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(tokyo.today(), NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    }
}
