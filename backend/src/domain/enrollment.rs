//! Enrollment coordination.
//!
//! [`admit`] is the pure admission rule set. Repositories evaluate it while
//! holding their serialisation point so the capacity check, the
//! one-course-per-account check and the write form a single atomic unit.
//! [`EnrollmentService`] drives the repository, maps its errors and records
//! outcomes.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    CoursePersistenceError, CourseRepository, EnrollmentCommand, EnrollmentMetrics,
    EnrollmentOutcomeLabel, EnrollmentPersistenceError, EnrollmentQuery, EnrollmentRepository,
};
use crate::domain::{
    Account, AccountId, Capacity, Course, CourseId, Error, RegistrationWindow, Role,
};

/// Reasons the admission rules refuse an enrollment, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnrollmentRejection {
    /// Only student accounts may enroll.
    NotAStudent,
    /// The account already holds an enrollment in some course.
    AlreadyEnrolled,
    /// The course does not exist (or was deleted concurrently).
    CourseNotFound,
    /// The roster already holds `maxCapacity` accounts.
    CapacityExceeded,
    /// `now` lies outside the registration window.
    OutsideRegistrationWindow,
}

impl EnrollmentRejection {
    /// Stable label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotAStudent => "not_a_student",
            Self::AlreadyEnrolled => "already_enrolled",
            Self::CourseNotFound => "course_not_found",
            Self::CapacityExceeded => "capacity_exceeded",
            Self::OutsideRegistrationWindow => "outside_registration_window",
        }
    }
}

impl fmt::Display for EnrollmentRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EnrollmentRejection> for Error {
    fn from(value: EnrollmentRejection) -> Self {
        match value {
            EnrollmentRejection::NotAStudent => Error::forbidden("only students may enroll"),
            EnrollmentRejection::AlreadyEnrolled => Error::already_enrolled(),
            EnrollmentRejection::CourseNotFound => Error::course_not_found(),
            EnrollmentRejection::CapacityExceeded => Error::capacity_exceeded(),
            EnrollmentRejection::OutsideRegistrationWindow => Error::outside_registration_window(),
        }
    }
}

/// Seat state of a course at the moment of admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatCheck {
    pub capacity: Capacity,
    pub enrolled: u32,
    pub window: RegistrationWindow,
}

impl From<&Course> for SeatCheck {
    fn from(course: &Course) -> Self {
        Self {
            capacity: course.draft.capacity,
            enrolled: course.enrolled_count(),
            window: course.draft.window,
        }
    }
}

/// Decide whether an account may enroll in a course at `now`.
///
/// `seats` is `None` when the course does not exist.
///
/// # Examples
/// ```
/// use chrono::{Duration, Utc};
/// use registrar::domain::{
///     admit, Capacity, EnrollmentRejection, RegistrationWindow, Role, SeatCheck,
/// };
///
/// let now = Utc::now();
/// let seats = SeatCheck {
///     capacity: Capacity::new(1).unwrap(),
///     enrolled: 1,
///     window: RegistrationWindow::new(now, now + Duration::hours(1)).unwrap(),
/// };
/// assert_eq!(
///     admit(Role::Student, None, Some(seats), now),
///     Err(EnrollmentRejection::CapacityExceeded),
/// );
/// ```
pub fn admit(
    role: Role,
    active_enrollment: Option<CourseId>,
    seats: Option<SeatCheck>,
    now: DateTime<Utc>,
) -> Result<(), EnrollmentRejection> {
    match role {
        Role::Student => {}
        Role::Admin => return Err(EnrollmentRejection::NotAStudent),
    }
    if active_enrollment.is_some() {
        return Err(EnrollmentRejection::AlreadyEnrolled);
    }
    let Some(seats) = seats else {
        return Err(EnrollmentRejection::CourseNotFound);
    };
    if seats.enrolled >= seats.capacity.get() {
        return Err(EnrollmentRejection::CapacityExceeded);
    }
    if !seats.window.contains(now) {
        return Err(EnrollmentRejection::OutsideRegistrationWindow);
    }
    Ok(())
}

/// Enrollment coordinator implementing the student-facing driving ports.
#[derive(Clone)]
pub struct EnrollmentService<E, C> {
    enrollments: Arc<E>,
    courses: Arc<C>,
    metrics: Arc<dyn EnrollmentMetrics>,
    clock: Arc<dyn Clock>,
}

impl<E, C> EnrollmentService<E, C> {
    pub fn new(
        enrollments: Arc<E>,
        courses: Arc<C>,
        metrics: Arc<dyn EnrollmentMetrics>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            enrollments,
            courses,
            metrics,
            clock,
        }
    }
}

impl<E, C> EnrollmentService<E, C>
where
    E: EnrollmentRepository,
    C: CourseRepository,
{
    fn map_enrollment_error(error: EnrollmentPersistenceError) -> Error {
        match error {
            EnrollmentPersistenceError::Rejected { reason } => reason.into(),
            EnrollmentPersistenceError::AccountNotFound => Error::account_not_found(),
            EnrollmentPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("enrollment repository unavailable: {message}"))
            }
            EnrollmentPersistenceError::Query { message } => {
                Error::internal(format!("enrollment repository error: {message}"))
            }
        }
    }

    fn map_course_error(error: CoursePersistenceError) -> Error {
        match error {
            CoursePersistenceError::Connection { message } => {
                Error::service_unavailable(format!("course repository unavailable: {message}"))
            }
            other => Error::internal(format!("course repository error: {other}")),
        }
    }

    async fn record(&self, outcome: EnrollmentOutcomeLabel) {
        if let Err(err) = self.metrics.record(outcome).await {
            warn!(error = %err, outcome = outcome.as_str(), "failed to record enrollment metric");
        }
    }

    /// Enroll at an explicit instant.
    pub async fn enroll_at(
        &self,
        account: &Account,
        course_id: CourseId,
        now: DateTime<Utc>,
    ) -> Result<Course, Error> {
        match self.enrollments.enroll(account.id, course_id, now).await {
            Ok(course) => {
                info!(
                    account_id = %account.id,
                    course_id = %course_id,
                    enrolled = course.enrolled_count(),
                    capacity = course.draft.capacity.get(),
                    "account enrolled"
                );
                self.record(EnrollmentOutcomeLabel::Enrolled).await;
                Ok(course)
            }
            Err(EnrollmentPersistenceError::Rejected { reason }) => {
                debug!(
                    account_id = %account.id,
                    course_id = %course_id,
                    reason = reason.as_str(),
                    "enrollment rejected"
                );
                self.record(EnrollmentOutcomeLabel::Rejected(reason.as_str()))
                    .await;
                Err(reason.into())
            }
            Err(other) => Err(Self::map_enrollment_error(other)),
        }
    }

    /// Cancel the account's enrollment. The registration window is not
    /// consulted.
    pub async fn cancel_for(&self, account_id: AccountId) -> Result<CourseId, Error> {
        let released = self
            .enrollments
            .cancel(account_id)
            .await
            .map_err(Self::map_enrollment_error)?;
        match released {
            Some(course_id) => {
                info!(account_id = %account_id, course_id = %course_id, "enrollment cancelled");
                self.record(EnrollmentOutcomeLabel::Cancelled).await;
                Ok(course_id)
            }
            None => {
                self.record(EnrollmentOutcomeLabel::Rejected("no_active_enrollment"))
                    .await;
                Err(Error::no_active_enrollment())
            }
        }
    }
}

#[async_trait]
impl<E, C> EnrollmentCommand for EnrollmentService<E, C>
where
    E: EnrollmentRepository,
    C: CourseRepository,
{
    async fn enroll(&self, account: &Account, course_id: CourseId) -> Result<Course, Error> {
        self.enroll_at(account, course_id, self.clock.utc()).await
    }

    async fn cancel(&self, account: &Account) -> Result<CourseId, Error> {
        self.cancel_for(account.id).await
    }
}

#[async_trait]
impl<E, C> EnrollmentQuery for EnrollmentService<E, C>
where
    E: EnrollmentRepository,
    C: CourseRepository,
{
    async fn open_courses(&self) -> Result<Vec<Course>, Error> {
        self.courses.list().await.map_err(Self::map_course_error)
    }

    async fn my_course(&self, account_id: AccountId) -> Result<Option<Course>, Error> {
        self.enrollments
            .course_for(account_id)
            .await
            .map_err(Self::map_enrollment_error)
    }
}

#[cfg(test)]
#[path = "enrollment_tests.rs"]
mod tests;
