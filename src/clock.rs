use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};

/// Source of "now" for the services. Attendance is keyed by the local
/// calendar day, so this yields local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    /// Absolute timestamp for audit fields. Manual clocks treat their time as UTC.
    fn now_utc(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.now())
    }

    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Current time of day at minute precision, the resolution stored on
    /// attendance records.
    fn time_of_day(&self) -> NaiveTime {
        minute_of(self.now())
    }
}

/// Time of day of `at`, seconds dropped.
pub fn minute_of(at: NaiveDateTime) -> NaiveTime {
    let time = at.time();
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Cloned handles share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Convenience for `YYYY-MM-DD` + `HH:MM` fixtures. Panics on malformed input.
    pub fn at(date: &str, time: &str) -> Self {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("fixture date");
        let time = NaiveTime::parse_from_str(time, "%H:%M").expect("fixture time");
        Self::new(date.and_time(time))
    }

    pub fn set(&self, to: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(|p| p.into_inner()) = to;
    }

    /// Moves to `HH:MM` on the current day. Panics on malformed input.
    pub fn set_time(&self, time: &str) {
        let date = self.today();
        let time = NaiveTime::parse_from_str(time, "%H:%M").expect("fixture time");
        self.set(date.and_time(time));
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }
}
