//! Port abstraction for the enrollment relation.
//!
//! Implementations must evaluate [`admit`](crate::domain::admit) and write the
//! enrollment inside one serialisation point so concurrent callers cannot
//! overfill a course or double-enroll an account.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AccountId, Course, CourseId, EnrollmentRejection};

use super::define_port_error;

define_port_error! {
    /// Errors raised by enrollment repository adapters.
    pub enum EnrollmentPersistenceError {
        /// The admission rules refused the enrollment.
        Rejected { reason: EnrollmentRejection } => "enrollment rejected: {reason}",
        /// The enrolling account does not exist.
        AccountNotFound => "account not found",
        /// Repository connection could not be established.
        Connection { message: String } => "enrollment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "enrollment repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Atomically check the admission rules at `now` and enroll the account.
    ///
    /// Returns the course with its updated roster.
    async fn enroll(
        &self,
        account_id: AccountId,
        course_id: CourseId,
        now: DateTime<Utc>,
    ) -> Result<Course, EnrollmentPersistenceError>;

    /// Remove the account's enrollment, returning the course it held.
    async fn cancel(
        &self,
        account_id: AccountId,
    ) -> Result<Option<CourseId>, EnrollmentPersistenceError>;

    /// Course the account is enrolled in, with its roster.
    async fn course_for(
        &self,
        account_id: AccountId,
    ) -> Result<Option<Course>, EnrollmentPersistenceError>;
}
