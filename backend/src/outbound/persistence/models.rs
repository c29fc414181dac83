//! Internal Diesel row structs and their conversions to domain types.
//!
//! These types never leave the persistence layer. Conversions back into the
//! domain re-run validation so a corrupted row surfaces as a query error
//! instead of an invalid aggregate.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Account, AccountId, AccountRecord, Capacity, Course, CourseDraft, CourseId, CourseName,
    CourseSchedule, DisplayName, Email, PasswordHash, RegistrationWindow, Role, RosterEntry,
};

use super::schema::{accounts, courses, enrollments};

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: &'a str,
    pub role: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading from the courses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseRow {
    pub id: Uuid,
    pub name: String,
    pub course_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub max_capacity: i32,
    pub registration_opens_at: DateTime<Utc>,
    pub registration_closes_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable and changeset form of a course draft.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = courses)]
pub(crate) struct CourseFieldsRow<'a> {
    pub name: &'a str,
    pub course_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub max_capacity: i32,
    pub registration_opens_at: DateTime<Utc>,
    pub registration_closes_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = courses)]
pub(crate) struct NewCourseRow<'a> {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[diesel(embed)]
    pub fields: CourseFieldsRow<'a>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = enrollments)]
pub(crate) struct NewEnrollmentRow {
    pub account_id: Uuid,
    pub course_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
}

/// One roster line as selected by the enrollments/accounts join.
pub(crate) type RosterRow = (Uuid, Uuid, String, String);

/// Reasons a stored row failed domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {table} row {id} is invalid: {reason}")]
pub(crate) struct InvalidRow {
    pub table: &'static str,
    pub id: Uuid,
    pub reason: String,
}

impl InvalidRow {
    fn new(table: &'static str, id: Uuid, reason: impl ToString) -> Self {
        Self {
            table,
            id,
            reason: reason.to_string(),
        }
    }
}

impl<'a> CourseFieldsRow<'a> {
    pub fn from_draft(draft: &'a CourseDraft, now: DateTime<Utc>) -> Self {
        Self {
            name: draft.name.as_ref(),
            course_date: draft.schedule.date(),
            start_time: draft.schedule.start(),
            end_time: draft.schedule.end(),
            max_capacity: draft.capacity.as_column(),
            registration_opens_at: draft.window.opens_at(),
            registration_closes_at: draft.window.closes_at(),
            updated_at: now,
        }
    }
}

impl AccountRow {
    /// Convert into a domain record; `active` is the joined enrollment.
    pub fn into_record(self, active: Option<Uuid>) -> Result<AccountRecord, InvalidRow> {
        let id = self.id;
        let invalid = |reason: &dyn ToString| InvalidRow::new("accounts", id, reason.to_string());
        let role: Role = self.role.parse().map_err(|err| invalid(&err))?;
        Ok(AccountRecord {
            account: Account {
                id: AccountId::from_uuid(id),
                email: Email::new(&self.email).map_err(|err| invalid(&err))?,
                name: DisplayName::new(&self.name).map_err(|err| invalid(&err))?,
                role,
                active_enrollment: active.map(CourseId::from_uuid),
            },
            password_hash: PasswordHash::new(self.password_hash),
        })
    }
}

impl CourseRow {
    pub fn into_course(self, roster: Vec<RosterEntry>) -> Result<Course, InvalidRow> {
        let id = self.id;
        let invalid = |reason: &dyn ToString| InvalidRow::new("courses", id, reason.to_string());
        let draft = CourseDraft {
            name: CourseName::new(&self.name).map_err(|err| invalid(&err))?,
            schedule: CourseSchedule::new(self.course_date, self.start_time, self.end_time)
                .map_err(|err| invalid(&err))?,
            capacity: Capacity::try_from(i64::from(self.max_capacity))
                .map_err(|err| invalid(&err))?,
            window: RegistrationWindow::new(
                self.registration_opens_at,
                self.registration_closes_at,
            )
            .map_err(|err| invalid(&err))?,
        };
        Ok(Course {
            id: CourseId::from_uuid(id),
            draft,
            roster,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Convert a joined roster row; the first element is the course id.
pub(crate) fn roster_entry(row: RosterRow) -> Result<(Uuid, RosterEntry), InvalidRow> {
    let (course_id, account_id, name, email) = row;
    let invalid = |reason: &dyn ToString| InvalidRow::new("accounts", account_id, reason.to_string());
    Ok((
        course_id,
        RosterEntry {
            account_id: AccountId::from_uuid(account_id),
            name: DisplayName::new(&name).map_err(|err| invalid(&err))?,
            email: Email::new(&email).map_err(|err| invalid(&err))?,
        },
    ))
}
