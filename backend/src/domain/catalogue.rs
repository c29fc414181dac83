//! Course catalogue administration.
//!
//! Deleting a course releases every enrolled account in the same atomic step
//! as the course removal; the repository reports who was released.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{CourseCommand, CoursePersistenceError, CourseQuery, CourseRepository};
use crate::domain::{Course, CourseDraft, CourseId, Error};

/// Catalogue service implementing the admin course driving ports.
#[derive(Clone)]
pub struct CourseCatalogueService<C> {
    courses: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<C> CourseCatalogueService<C> {
    pub fn new(courses: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { courses, clock }
    }
}

impl<C> CourseCatalogueService<C>
where
    C: CourseRepository,
{
    fn map_course_error(error: CoursePersistenceError) -> Error {
        match error {
            CoursePersistenceError::CapacityBelowRoster {
                enrolled,
                requested,
            } => Error::capacity_below_roster(format!(
                "maxCapacity {requested} is below the {enrolled} students already enrolled"
            ))
            .with_details(json!({
                "field": "maxCapacity",
                "enrolled": enrolled,
                "requested": requested,
            })),
            CoursePersistenceError::Connection { message } => {
                Error::service_unavailable(format!("course repository unavailable: {message}"))
            }
            CoursePersistenceError::Query { message } => {
                Error::internal(format!("course repository error: {message}"))
            }
        }
    }
}

#[async_trait]
impl<C> CourseCommand for CourseCatalogueService<C>
where
    C: CourseRepository,
{
    async fn create(&self, draft: CourseDraft) -> Result<Course, Error> {
        let course = self
            .courses
            .create(CourseId::random(), draft, self.clock.utc())
            .await
            .map_err(Self::map_course_error)?;
        info!(course_id = %course.id, name = %course.draft.name, "course created");
        Ok(course)
    }

    async fn update(&self, id: CourseId, draft: CourseDraft) -> Result<Course, Error> {
        let course = self
            .courses
            .update(id, draft, self.clock.utc())
            .await
            .map_err(Self::map_course_error)?
            .ok_or_else(Error::course_not_found)?;
        info!(course_id = %course.id, "course updated");
        Ok(course)
    }

    async fn delete(&self, id: CourseId) -> Result<(), Error> {
        let released = self
            .courses
            .delete(id)
            .await
            .map_err(Self::map_course_error)?
            .ok_or_else(Error::course_not_found)?;
        info!(
            course_id = %id,
            released = released.len(),
            "course deleted"
        );
        Ok(())
    }
}

#[async_trait]
impl<C> CourseQuery for CourseCatalogueService<C>
where
    C: CourseRepository,
{
    async fn list(&self) -> Result<Vec<Course>, Error> {
        self.courses.list().await.map_err(Self::map_course_error)
    }

    async fn get(&self, id: CourseId) -> Result<Course, Error> {
        self.courses
            .find_by_id(id)
            .await
            .map_err(Self::map_course_error)?
            .ok_or_else(Error::course_not_found)
    }
}
