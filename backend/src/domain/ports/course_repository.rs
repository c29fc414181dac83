//! Port abstraction for course catalogue persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AccountId, Course, CourseDraft, CourseId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by course repository adapters.
    pub enum CoursePersistenceError {
        /// An update would leave more enrollees than seats.
        CapacityBelowRoster { enrolled: u32, requested: u32 } =>
            "capacity {requested} is below the {enrolled} accounts already enrolled",
        /// Repository connection could not be established.
        Connection { message: String } => "course repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "course repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Every course with its roster, newest course date first.
    async fn list(&self) -> Result<Vec<Course>, CoursePersistenceError>;

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, CoursePersistenceError>;

    async fn create(
        &self,
        id: CourseId,
        draft: CourseDraft,
        now: DateTime<Utc>,
    ) -> Result<Course, CoursePersistenceError>;

    /// Replace a course's attributes. `None` when the course is unknown.
    async fn update(
        &self,
        id: CourseId,
        draft: CourseDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<Course>, CoursePersistenceError>;

    /// Remove a course and every enrollment in it atomically.
    ///
    /// Returns the accounts that were released, or `None` when the course is
    /// unknown.
    async fn delete(&self, id: CourseId) -> Result<Option<Vec<AccountId>>, CoursePersistenceError>;
}
