//! Test utilities shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Only compiled for tests or with the `test-support` feature.
#![allow(clippy::expect_used, reason = "fixture literals are statically valid")]

use std::sync::Mutex;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{Capacity, CourseDraft, CourseName, CourseSchedule, RegistrationWindow};

/// Clock whose current instant is set by the test.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Fixed instant at which fixture registration windows open (`T0`).
pub fn window_opens() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Instant at which fixture registration windows close (`T1`).
pub fn window_closes() -> DateTime<Utc> {
    window_opens() + TimeDelta::days(7)
}

/// Course draft named `name` with `capacity` seats, held on `date`, whose
/// registration window is `[window_opens(), window_closes()]`.
pub fn course_draft(name: &str, capacity: u32, date: NaiveDate) -> CourseDraft {
    let start = NaiveTime::from_hms_opt(10, 0, 0).expect("valid start time");
    let end = NaiveTime::from_hms_opt(12, 0, 0).expect("valid end time");
    CourseDraft {
        name: CourseName::new(name).expect("valid course name"),
        schedule: CourseSchedule::new(date, start, end).expect("valid schedule"),
        capacity: Capacity::new(capacity).expect("positive capacity"),
        window: RegistrationWindow::new(window_opens(), window_closes()).expect("valid window"),
    }
}

/// Default course date used by fixtures.
pub fn course_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, 1).expect("valid fixture date")
}
