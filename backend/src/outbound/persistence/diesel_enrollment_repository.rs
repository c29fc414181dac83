//! PostgreSQL-backed `EnrollmentRepository` implementation using Diesel ORM.
//!
//! `enroll` runs in one transaction: it locks the account row, then the
//! course row, counts the roster, evaluates [`admit`] and inserts. Every
//! writer takes the locks in that order, so concurrent enrollments into the
//! same course queue on the course row and see each other's inserts.
//! `enrollments.account_id` is the primary key, which backs the
//! one-course-per-account rule even if a caller bypasses the locks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{EnrollmentPersistenceError, EnrollmentRepository};
use crate::domain::{
    AccountId, Course, CourseId, EnrollmentRejection, Role, SeatCheck, admit,
};

use super::course_loading::{LoadError, course_row, enrolled_count, load_course};
use super::diesel_error_mapping::{DieselFailure, classify};
use super::models::{CourseRow, NewEnrollmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{accounts, courses, enrollments};

/// Diesel-backed implementation of the `EnrollmentRepository` port.
#[derive(Clone)]
pub struct DieselEnrollmentRepository {
    pool: DbPool,
}

impl DieselEnrollmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside the enrollment transaction.
#[derive(Debug)]
enum EnrollTxError {
    Load(LoadError),
    Rejected(EnrollmentRejection),
    AccountNotFound,
    InvalidRole(String),
}

impl From<diesel::result::Error> for EnrollTxError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Load(LoadError::Diesel(value))
    }
}

impl From<LoadError> for EnrollTxError {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

fn map_pool_error(error: PoolError) -> EnrollmentPersistenceError {
    EnrollmentPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> EnrollmentPersistenceError {
    match classify(error) {
        DieselFailure::Connection(message) => EnrollmentPersistenceError::connection(message),
        // The only unique key on `enrollments` is the account id.
        DieselFailure::UniqueViolation { .. } => {
            EnrollmentPersistenceError::rejected(EnrollmentRejection::AlreadyEnrolled)
        }
        DieselFailure::Query(message) => EnrollmentPersistenceError::query(message),
    }
}

fn map_load_error(error: LoadError) -> EnrollmentPersistenceError {
    match error {
        LoadError::Diesel(error) => map_diesel_error(error),
        LoadError::Invalid(invalid) => EnrollmentPersistenceError::query(invalid.to_string()),
    }
}

fn map_tx_error(error: EnrollTxError) -> EnrollmentPersistenceError {
    match error {
        EnrollTxError::Load(error) => map_load_error(error),
        EnrollTxError::Rejected(reason) => EnrollmentPersistenceError::rejected(reason),
        EnrollTxError::AccountNotFound => EnrollmentPersistenceError::AccountNotFound,
        EnrollTxError::InvalidRole(role) => {
            EnrollmentPersistenceError::query(format!("stored account role is invalid: {role}"))
        }
    }
}

fn seats_for(row: &CourseRow, enrolled: i64) -> Result<SeatCheck, LoadError> {
    let course = row.clone().into_course(Vec::new())?;
    Ok(SeatCheck {
        capacity: course.draft.capacity,
        enrolled: u32::try_from(enrolled).unwrap_or(u32::MAX),
        window: course.draft.window,
    })
}

#[async_trait]
impl EnrollmentRepository for DieselEnrollmentRepository {
    async fn enroll(
        &self,
        account_id: AccountId,
        course_id: CourseId,
        now: DateTime<Utc>,
    ) -> Result<Course, EnrollmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let account_uuid: Uuid = *account_id.as_uuid();
        let course_uuid: Uuid = *course_id.as_uuid();

        conn.transaction::<_, EnrollTxError, _>(|conn| {
            async move {
                let role: Option<String> = accounts::table
                    .filter(accounts::id.eq(account_uuid))
                    .select(accounts::role)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let role: Role = role
                    .ok_or(EnrollTxError::AccountNotFound)?
                    .parse()
                    .map_err(|_| EnrollTxError::InvalidRole(account_uuid.to_string()))?;

                let active: Option<Uuid> = enrollments::table
                    .filter(enrollments::account_id.eq(account_uuid))
                    .select(enrollments::course_id)
                    .first(conn)
                    .await
                    .optional()?;

                let seats = match course_row(conn, course_uuid, true).await? {
                    Some(row) => {
                        let enrolled = enrolled_count(conn, course_uuid).await?;
                        Some(seats_for(&row, enrolled)?)
                    }
                    None => None,
                };

                admit(role, active.map(CourseId::from_uuid), seats, now)
                    .map_err(EnrollTxError::Rejected)?;

                diesel::insert_into(enrollments::table)
                    .values(&NewEnrollmentRow {
                        account_id: account_uuid,
                        course_id: course_uuid,
                        enrolled_at: now,
                    })
                    .execute(conn)
                    .await?;

                load_course(conn, course_uuid)
                    .await?
                    .ok_or(EnrollTxError::Rejected(EnrollmentRejection::CourseNotFound))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }

    async fn cancel(
        &self,
        account_id: AccountId,
    ) -> Result<Option<CourseId>, EnrollmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let released: Option<Uuid> = diesel::delete(
            enrollments::table.filter(enrollments::account_id.eq(*account_id.as_uuid())),
        )
        .returning(enrollments::course_id)
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        debug!(%account_id, released = released.is_some(), "enrollment cancel executed");
        Ok(released.map(CourseId::from_uuid))
    }

    async fn course_for(
        &self,
        account_id: AccountId,
    ) -> Result<Option<Course>, EnrollmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let course_id: Option<Uuid> = enrollments::table
            .inner_join(courses::table)
            .filter(enrollments::account_id.eq(*account_id.as_uuid()))
            .select(courses::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        match course_id {
            Some(id) => load_course(&mut conn, id).await.map_err(map_load_error),
            None => Ok(None),
        }
    }
}
