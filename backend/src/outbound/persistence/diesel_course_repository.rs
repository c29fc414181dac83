//! PostgreSQL-backed `CourseRepository` implementation using Diesel ORM.
//!
//! Updates and deletions lock the course row, which serialises them with
//! concurrent enrollments into the same course.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{CoursePersistenceError, CourseRepository};
use crate::domain::{AccountId, Course, CourseDraft, CourseId};

use super::course_loading::{LoadError, assemble, course_row, enrolled_count, load_course};
use super::diesel_error_mapping::{DieselFailure, classify};
use super::models::{CourseFieldsRow, CourseRow, NewCourseRow};
use super::pool::{DbPool, PoolError};
use super::schema::{courses, enrollments};

/// Diesel-backed implementation of the `CourseRepository` port.
#[derive(Clone)]
pub struct DieselCourseRepository {
    pool: DbPool,
}

impl DieselCourseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a course transaction.
#[derive(Debug)]
enum CourseTxError {
    Load(LoadError),
    CapacityBelowRoster { enrolled: u32, requested: u32 },
}

impl From<diesel::result::Error> for CourseTxError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Load(LoadError::Diesel(value))
    }
}

impl From<LoadError> for CourseTxError {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

fn map_pool_error(error: PoolError) -> CoursePersistenceError {
    CoursePersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> CoursePersistenceError {
    match classify(error) {
        DieselFailure::Connection(message) => CoursePersistenceError::connection(message),
        DieselFailure::UniqueViolation { constraint } => CoursePersistenceError::query(format!(
            "unique constraint violated: {}",
            constraint.as_deref().unwrap_or("unknown")
        )),
        DieselFailure::Query(message) => CoursePersistenceError::query(message),
    }
}

fn map_load_error(error: LoadError) -> CoursePersistenceError {
    match error {
        LoadError::Diesel(error) => map_diesel_error(error),
        LoadError::Invalid(invalid) => CoursePersistenceError::query(invalid.to_string()),
    }
}

fn map_tx_error(error: CourseTxError) -> CoursePersistenceError {
    match error {
        CourseTxError::Load(error) => map_load_error(error),
        CourseTxError::CapacityBelowRoster {
            enrolled,
            requested,
        } => CoursePersistenceError::capacity_below_roster(enrolled, requested),
    }
}

#[async_trait]
impl CourseRepository for DieselCourseRepository {
    async fn list(&self) -> Result<Vec<Course>, CoursePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CourseRow> = courses::table
            .order((courses::course_date.desc(), courses::start_time.desc()))
            .select(CourseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        assemble(&mut conn, rows).await.map_err(map_load_error)
    }

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, CoursePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_course(&mut conn, *id.as_uuid())
            .await
            .map_err(map_load_error)
    }

    async fn create(
        &self,
        id: CourseId,
        draft: CourseDraft,
        now: DateTime<Utc>,
    ) -> Result<Course, CoursePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCourseRow {
            id: *id.as_uuid(),
            created_at: now,
            fields: CourseFieldsRow::from_draft(&draft, now),
        };
        diesel::insert_into(courses::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Course {
            id,
            draft,
            roster: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(
        &self,
        id: CourseId,
        draft: CourseDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<Course>, CoursePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let course_id: Uuid = *id.as_uuid();

        conn.transaction::<_, CourseTxError, _>(|conn| {
            async move {
                if course_row(conn, course_id, true).await?.is_none() {
                    return Ok(None);
                }
                let enrolled = u32::try_from(enrolled_count(conn, course_id).await?)
                    .unwrap_or(u32::MAX);
                let requested = draft.capacity.get();
                if enrolled > requested {
                    return Err(CourseTxError::CapacityBelowRoster {
                        enrolled,
                        requested,
                    });
                }
                diesel::update(courses::table.filter(courses::id.eq(course_id)))
                    .set(&CourseFieldsRow::from_draft(&draft, now))
                    .execute(conn)
                    .await?;
                Ok(load_course(conn, course_id).await?)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }

    async fn delete(&self, id: CourseId) -> Result<Option<Vec<AccountId>>, CoursePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let course_id: Uuid = *id.as_uuid();

        conn.transaction::<_, CourseTxError, _>(|conn| {
            async move {
                if course_row(conn, course_id, true).await?.is_none() {
                    return Ok(None);
                }
                let released: Vec<Uuid> = enrollments::table
                    .filter(enrollments::course_id.eq(course_id))
                    .select(enrollments::account_id)
                    .load(conn)
                    .await?;
                // `ON DELETE CASCADE` removes the enrollment rows with the course.
                diesel::delete(courses::table.filter(courses::id.eq(course_id)))
                    .execute(conn)
                    .await?;
                Ok(Some(released.into_iter().map(AccountId::from_uuid).collect()))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }
}
