//! Course loading shared by the catalogue and enrollment adapters.
//!
//! Rosters are joined from `enrollments` and ordered by enrollment time, so
//! the roster and each account's active enrollment come from the same rows.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::{Course, RosterEntry};

use super::models::{CourseRow, InvalidRow, RosterRow, roster_entry};
use super::schema::{accounts, courses, enrollments};

/// Failure while loading courses inside a repository operation.
#[derive(Debug)]
pub(crate) enum LoadError {
    Diesel(diesel::result::Error),
    Invalid(InvalidRow),
}

impl From<diesel::result::Error> for LoadError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

impl From<InvalidRow> for LoadError {
    fn from(value: InvalidRow) -> Self {
        Self::Invalid(value)
    }
}

/// Rosters for `course_ids`, keyed by course.
pub(crate) async fn load_rosters(
    conn: &mut AsyncPgConnection,
    course_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<RosterEntry>>, LoadError> {
    if course_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<RosterRow> = enrollments::table
        .inner_join(accounts::table)
        .filter(enrollments::course_id.eq_any(course_ids))
        .order((enrollments::enrolled_at.asc(), enrollments::account_id.asc()))
        .select((
            enrollments::course_id,
            accounts::id,
            accounts::name,
            accounts::email,
        ))
        .load(conn)
        .await?;

    let mut rosters: HashMap<Uuid, Vec<RosterEntry>> = HashMap::new();
    for row in rows {
        let (course_id, entry) = roster_entry(row)?;
        rosters.entry(course_id).or_default().push(entry);
    }
    Ok(rosters)
}

/// Attach rosters to already-fetched course rows, preserving row order.
pub(crate) async fn assemble(
    conn: &mut AsyncPgConnection,
    rows: Vec<CourseRow>,
) -> Result<Vec<Course>, LoadError> {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let mut rosters = load_rosters(conn, &ids).await?;
    rows.into_iter()
        .map(|row| {
            let roster = rosters.remove(&row.id).unwrap_or_default();
            row.into_course(roster).map_err(LoadError::from)
        })
        .collect()
}

/// Fetch one course row, optionally locking it for the current transaction.
pub(crate) async fn course_row(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    lock: bool,
) -> Result<Option<CourseRow>, diesel::result::Error> {
    let query = courses::table
        .filter(courses::id.eq(id))
        .select(CourseRow::as_select());
    if lock {
        query.for_update().first(conn).await.optional()
    } else {
        query.first(conn).await.optional()
    }
}

/// Fetch one course with its roster.
pub(crate) async fn load_course(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> Result<Option<Course>, LoadError> {
    match course_row(conn, id, false).await? {
        Some(row) => Ok(assemble(conn, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

/// Number of accounts currently enrolled in `course_id`.
pub(crate) async fn enrolled_count(
    conn: &mut AsyncPgConnection,
    course_id: Uuid,
) -> Result<i64, diesel::result::Error> {
    enrollments::table
        .filter(enrollments::course_id.eq(course_id))
        .count()
        .get_result(conn)
        .await
}
