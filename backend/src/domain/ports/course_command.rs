//! Driving port for administrative course changes.

use async_trait::async_trait;

use crate::domain::{Course, CourseDraft, CourseId, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseCommand: Send + Sync {
    async fn create(&self, draft: CourseDraft) -> Result<Course, Error>;

    async fn update(&self, id: CourseId, draft: CourseDraft) -> Result<Course, Error>;

    /// Delete a course, releasing every enrolled account.
    async fn delete(&self, id: CourseId) -> Result<(), Error>;
}
