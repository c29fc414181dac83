//! Driving port for student enrollment changes.

use async_trait::async_trait;

use crate::domain::{Account, Course, CourseId, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentCommand: Send + Sync {
    /// Enroll `account` in the course, returning the updated course.
    async fn enroll(&self, account: &Account, course_id: CourseId) -> Result<Course, Error>;

    /// Cancel the account's active enrollment, returning the course left.
    async fn cancel(&self, account: &Account) -> Result<CourseId, Error>;
}
