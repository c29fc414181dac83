//! Course data model.
//!
//! A course owns a schedule, a capacity ceiling and a registration window.
//! Its roster is derived from the enrollment relation and is returned in
//! enrollment order.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AccountId, DisplayName, Email};

/// Validation errors returned by the course value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseValidationError {
    EmptyName,
    ScheduleOutOfOrder,
    ZeroCapacity,
    NegativeCapacity,
    CapacityTooLarge,
    WindowOutOfOrder,
    InvalidId,
}

impl fmt::Display for CourseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "course name must not be empty"),
            Self::ScheduleOutOfOrder => write!(f, "startTime must be before endTime"),
            Self::ZeroCapacity | Self::NegativeCapacity => {
                write!(f, "maxCapacity must be a positive integer")
            }
            Self::CapacityTooLarge => {
                write!(f, "maxCapacity must not exceed {}", Capacity::MAX)
            }
            Self::WindowOutOfOrder => write!(
                f,
                "registrationStartTime must be before registrationEndTime"
            ),
            Self::InvalidId => write!(f, "course id must be a valid UUID"),
        }
    }
}

impl std::error::Error for CourseValidationError {}

/// Stable course identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(Uuid);

impl CourseId {
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CourseId {
    type Err = CourseValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| CourseValidationError::InvalidId)
    }
}

/// Course title, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseName(String);

impl CourseName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CourseValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CourseValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CourseName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CourseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CourseName> for String {
    fn from(value: CourseName) -> Self {
        value.0
    }
}

impl TryFrom<String> for CourseName {
    type Error = CourseValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Calendar date plus a time-of-day span with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseSchedule {
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
}

impl CourseSchedule {
    pub fn new(
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Self, CourseValidationError> {
        if start >= end {
            return Err(CourseValidationError::ScheduleOutOfOrder);
        }
        Ok(Self { date, start, end })
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub const fn start(&self) -> NaiveTime {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveTime {
        self.end
    }
}

/// Positive ceiling on roster size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Capacity(u32);

impl Capacity {
    /// Largest ceiling a PostgreSQL `integer` column can hold.
    pub const MAX: u32 = i32::MAX.unsigned_abs();

    pub fn new(value: u32) -> Result<Self, CourseValidationError> {
        if value == 0 {
            return Err(CourseValidationError::ZeroCapacity);
        }
        if value > Self::MAX {
            return Err(CourseValidationError::CapacityTooLarge);
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Value as stored in the `max_capacity` column.
    #[must_use]
    pub fn as_column(self) -> i32 {
        // Bounded by `MAX` at construction.
        i32::try_from(self.0).unwrap_or(i32::MAX)
    }
}

impl TryFrom<i64> for Capacity {
    type Error = CourseValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 0 {
            return Err(CourseValidationError::NegativeCapacity);
        }
        let value = u32::try_from(value).map_err(|_| CourseValidationError::CapacityTooLarge)?;
        Self::new(value)
    }
}

impl From<Capacity> for u32 {
    fn from(value: Capacity) -> Self {
        value.0
    }
}

/// Instants between which enrollment is accepted, both ends inclusive.
///
/// # Examples
/// ```
/// use chrono::{Duration, Utc};
/// use registrar::domain::RegistrationWindow;
///
/// let opens = Utc::now();
/// let closes = opens + Duration::hours(1);
/// let window = RegistrationWindow::new(opens, closes).unwrap();
/// assert!(window.contains(closes));
/// assert!(!window.contains(closes + Duration::seconds(1)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationWindow {
    opens_at: DateTime<Utc>,
    closes_at: DateTime<Utc>,
}

impl RegistrationWindow {
    pub fn new(
        opens_at: DateTime<Utc>,
        closes_at: DateTime<Utc>,
    ) -> Result<Self, CourseValidationError> {
        if opens_at >= closes_at {
            return Err(CourseValidationError::WindowOutOfOrder);
        }
        Ok(Self {
            opens_at,
            closes_at,
        })
    }

    #[must_use]
    pub const fn opens_at(&self) -> DateTime<Utc> {
        self.opens_at
    }

    #[must_use]
    pub const fn closes_at(&self) -> DateTime<Utc> {
        self.closes_at
    }

    /// Whether `now` falls inside the window.
    #[must_use]
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.opens_at <= now && now <= self.closes_at
    }
}

/// Editable course attributes, validated as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    pub name: CourseName,
    pub schedule: CourseSchedule,
    pub capacity: Capacity,
    pub window: RegistrationWindow,
}

/// One roster line: the enrolled account's public identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub account_id: AccountId,
    pub name: DisplayName,
    pub email: Email,
}

/// Stored course with its derived roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub draft: CourseDraft,
    pub roster: Vec<RosterEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    #[must_use]
    pub fn enrolled_count(&self) -> u32 {
        u32::try_from(self.roster.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn remaining_seats(&self) -> u32 {
        self.draft.capacity.get().saturating_sub(self.enrolled_count())
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.remaining_seats() == 0
    }

    #[must_use]
    pub fn has_member(&self, account_id: AccountId) -> bool {
        self.roster.iter().any(|entry| entry.account_id == account_id)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};

    #[fixture]
    fn opens_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[case(-1, CourseValidationError::NegativeCapacity)]
    #[case(0, CourseValidationError::ZeroCapacity)]
    #[case(i64::from(i32::MAX) + 1, CourseValidationError::CapacityTooLarge)]
    #[case(5_000_000_000, CourseValidationError::CapacityTooLarge)]
    fn capacity_must_be_positive(#[case] raw: i64, #[case] expected: CourseValidationError) {
        assert_eq!(Capacity::try_from(raw).expect_err("must reject"), expected);
    }

    #[rstest]
    fn capacity_accepts_the_column_maximum() {
        let capacity = Capacity::try_from(i64::from(i32::MAX)).expect("fits the column");

        assert_eq!(capacity.get(), Capacity::MAX);
    }

    #[rstest]
    fn schedule_requires_start_before_end() {
        let date = NaiveDate::from_ymd_opt(2026, 4, 1).expect("valid date");
        let nine = NaiveTime::from_hms_opt(9, 0, 0).expect("valid time");
        let ten = NaiveTime::from_hms_opt(10, 0, 0).expect("valid time");
        assert!(CourseSchedule::new(date, nine, ten).is_ok());
        assert_eq!(
            CourseSchedule::new(date, ten, nine),
            Err(CourseValidationError::ScheduleOutOfOrder)
        );
        assert_eq!(
            CourseSchedule::new(date, nine, nine),
            Err(CourseValidationError::ScheduleOutOfOrder)
        );
    }

    #[rstest]
    fn window_requires_open_before_close(opens_at: DateTime<Utc>) {
        assert_eq!(
            RegistrationWindow::new(opens_at, opens_at),
            Err(CourseValidationError::WindowOutOfOrder)
        );
    }

    #[rstest]
    #[case(Duration::seconds(-1), false)]
    #[case(Duration::zero(), true)]
    #[case(Duration::minutes(30), true)]
    #[case(Duration::hours(1), true)]
    #[case(Duration::hours(1) + Duration::seconds(1), false)]
    fn window_bounds_are_inclusive(
        opens_at: DateTime<Utc>,
        #[case] offset: Duration,
        #[case] expected: bool,
    ) {
        let window =
            RegistrationWindow::new(opens_at, opens_at + Duration::hours(1)).expect("valid window");
        assert_eq!(window.contains(opens_at + offset), expected);
    }

    #[rstest]
    fn course_name_is_trimmed() {
        assert_eq!(
            CourseName::new("  Rust 101 ").expect("valid name").as_ref(),
            "Rust 101"
        );
        assert_eq!(CourseName::new(""), Err(CourseValidationError::EmptyName));
    }
}
