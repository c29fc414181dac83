//! Driving port for student-facing course reads.

use async_trait::async_trait;

use crate::domain::{AccountId, Course, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentQuery: Send + Sync {
    /// Every course, newest first, for browsing.
    async fn open_courses(&self) -> Result<Vec<Course>, Error>;

    /// Course the account holds, with its roster.
    async fn my_course(&self, account_id: AccountId) -> Result<Option<Course>, Error>;
}
