//! Driving port for administrative course reads.

use async_trait::async_trait;

use crate::domain::{Course, CourseId, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseQuery: Send + Sync {
    /// Every course with its roster, newest course date first.
    async fn list(&self) -> Result<Vec<Course>, Error>;

    async fn get(&self, id: CourseId) -> Result<Course, Error>;
}
