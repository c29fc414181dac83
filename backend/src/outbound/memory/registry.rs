//! In-memory implementation of the account, course and enrollment
//! repositories.
//!
//! All three ports share one mutex-guarded state. The enrollment relation is
//! the only record of membership: rosters and each account's active
//! enrollment are derived from it on every read, and `enroll` evaluates
//! [`admit`] and appends while holding the lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::ports::{
    AccountPersistenceError, AccountRepository, CoursePersistenceError, CourseRepository,
    EnrollmentPersistenceError, EnrollmentRepository,
};
use crate::domain::{
    Account, AccountId, AccountRecord, Course, CourseDraft, CourseId, Email, EnrollmentRejection,
    NewAccount, PasswordHash, RosterEntry, SeatCheck, admit,
};

const POISONED: &str = "in-memory registry lock poisoned";

struct StoredAccount {
    account: Account,
    password_hash: PasswordHash,
}

struct StoredCourse {
    draft: CourseDraft,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

struct Enrollment {
    account_id: AccountId,
    course_id: CourseId,
}

#[derive(Default)]
struct RegistryState {
    accounts: HashMap<AccountId, StoredAccount>,
    emails: HashMap<Email, AccountId>,
    courses: HashMap<CourseId, StoredCourse>,
    /// Kept in enrollment order.
    enrollments: Vec<Enrollment>,
}

impl RegistryState {
    fn active_enrollment(&self, account_id: AccountId) -> Option<CourseId> {
        self.enrollments
            .iter()
            .find(|row| row.account_id == account_id)
            .map(|row| row.course_id)
    }

    fn enrolled_count(&self, course_id: CourseId) -> u32 {
        let count = self
            .enrollments
            .iter()
            .filter(|row| row.course_id == course_id)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    fn roster(&self, course_id: CourseId) -> Vec<RosterEntry> {
        self.enrollments
            .iter()
            .filter(|row| row.course_id == course_id)
            .filter_map(|row| self.accounts.get(&row.account_id))
            .map(|stored| RosterEntry {
                account_id: stored.account.id,
                name: stored.account.name.clone(),
                email: stored.account.email.clone(),
            })
            .collect()
    }

    fn course(&self, id: CourseId) -> Option<Course> {
        self.courses.get(&id).map(|stored| Course {
            id,
            draft: stored.draft.clone(),
            roster: self.roster(id),
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        })
    }

    fn record(&self, id: AccountId) -> Option<AccountRecord> {
        self.accounts.get(&id).map(|stored| AccountRecord {
            account: Account {
                active_enrollment: self.active_enrollment(id),
                ..stored.account.clone()
            },
            password_hash: stored.password_hash.clone(),
        })
    }
}

/// Shared in-memory store backing all registration repositories.
///
/// Cloning is cheap and every clone observes the same state.
#[derive(Clone, Default)]
pub struct InMemoryRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl InMemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, RegistryState>, String> {
        self.state.lock().map_err(|_| POISONED.to_owned())
    }
}

#[async_trait]
impl AccountRepository for InMemoryRegistry {
    async fn insert(&self, account: NewAccount) -> Result<Account, AccountPersistenceError> {
        let mut state = self.lock().map_err(AccountPersistenceError::connection)?;
        if state.emails.contains_key(&account.email) {
            return Err(AccountPersistenceError::duplicate_email(
                account.email.to_string(),
            ));
        }
        let created = Account {
            id: account.id,
            email: account.email,
            name: account.name,
            role: account.role,
            active_enrollment: None,
        };
        state.emails.insert(created.email.clone(), created.id);
        state.accounts.insert(
            created.id,
            StoredAccount {
                account: created.clone(),
                password_hash: account.password_hash,
            },
        );
        Ok(created)
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<AccountRecord>, AccountPersistenceError> {
        let state = self.lock().map_err(AccountPersistenceError::connection)?;
        Ok(state
            .emails
            .get(email)
            .copied()
            .and_then(|id| state.record(id)))
    }

    async fn find_by_id(
        &self,
        id: AccountId,
    ) -> Result<Option<AccountRecord>, AccountPersistenceError> {
        let state = self.lock().map_err(AccountPersistenceError::connection)?;
        Ok(state.record(id))
    }

    async fn update_password(
        &self,
        id: AccountId,
        password_hash: PasswordHash,
    ) -> Result<bool, AccountPersistenceError> {
        let mut state = self.lock().map_err(AccountPersistenceError::connection)?;
        Ok(match state.accounts.get_mut(&id) {
            Some(stored) => {
                stored.password_hash = password_hash;
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl CourseRepository for InMemoryRegistry {
    async fn list(&self) -> Result<Vec<Course>, CoursePersistenceError> {
        let state = self.lock().map_err(CoursePersistenceError::connection)?;
        let mut courses: Vec<Course> = state
            .courses
            .keys()
            .filter_map(|id| state.course(*id))
            .collect();
        courses.sort_by(|a, b| {
            let a_key = (a.draft.schedule.date(), a.draft.schedule.start());
            let b_key = (b.draft.schedule.date(), b.draft.schedule.start());
            b_key.cmp(&a_key).then_with(|| a.id.cmp(&b.id))
        });
        Ok(courses)
    }

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, CoursePersistenceError> {
        let state = self.lock().map_err(CoursePersistenceError::connection)?;
        Ok(state.course(id))
    }

    async fn create(
        &self,
        id: CourseId,
        draft: CourseDraft,
        now: DateTime<Utc>,
    ) -> Result<Course, CoursePersistenceError> {
        let mut state = self.lock().map_err(CoursePersistenceError::connection)?;
        if state.courses.contains_key(&id) {
            return Err(CoursePersistenceError::query(format!(
                "course {id} already exists"
            )));
        }
        state.courses.insert(
            id,
            StoredCourse {
                draft,
                created_at: now,
                updated_at: now,
            },
        );
        state
            .course(id)
            .ok_or_else(|| CoursePersistenceError::query("course vanished after insert"))
    }

    async fn update(
        &self,
        id: CourseId,
        draft: CourseDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<Course>, CoursePersistenceError> {
        let mut state = self.lock().map_err(CoursePersistenceError::connection)?;
        if !state.courses.contains_key(&id) {
            return Ok(None);
        }
        let enrolled = state.enrolled_count(id);
        let requested = draft.capacity.get();
        if enrolled > requested {
            return Err(CoursePersistenceError::capacity_below_roster(
                enrolled, requested,
            ));
        }
        if let Some(stored) = state.courses.get_mut(&id) {
            stored.draft = draft;
            stored.updated_at = now;
        }
        Ok(state.course(id))
    }

    async fn delete(&self, id: CourseId) -> Result<Option<Vec<AccountId>>, CoursePersistenceError> {
        let mut state = self.lock().map_err(CoursePersistenceError::connection)?;
        if state.courses.remove(&id).is_none() {
            return Ok(None);
        }
        let mut released = Vec::new();
        state.enrollments.retain(|row| {
            if row.course_id == id {
                released.push(row.account_id);
                false
            } else {
                true
            }
        });
        Ok(Some(released))
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryRegistry {
    async fn enroll(
        &self,
        account_id: AccountId,
        course_id: CourseId,
        now: DateTime<Utc>,
    ) -> Result<Course, EnrollmentPersistenceError> {
        let mut state = self.lock().map_err(EnrollmentPersistenceError::connection)?;
        let role = state
            .accounts
            .get(&account_id)
            .map(|stored| stored.account.role)
            .ok_or(EnrollmentPersistenceError::AccountNotFound)?;
        let seats = state.courses.get(&course_id).map(|stored| SeatCheck {
            capacity: stored.draft.capacity,
            enrolled: state.enrolled_count(course_id),
            window: stored.draft.window,
        });

        admit(role, state.active_enrollment(account_id), seats, now)
            .map_err(EnrollmentPersistenceError::rejected)?;

        state.enrollments.push(Enrollment {
            account_id,
            course_id,
        });
        state.course(course_id).ok_or_else(|| {
            EnrollmentPersistenceError::rejected(EnrollmentRejection::CourseNotFound)
        })
    }

    async fn cancel(
        &self,
        account_id: AccountId,
    ) -> Result<Option<CourseId>, EnrollmentPersistenceError> {
        let mut state = self.lock().map_err(EnrollmentPersistenceError::connection)?;
        let position = state
            .enrollments
            .iter()
            .position(|row| row.account_id == account_id);
        let released = position.map(|index| state.enrollments.remove(index).course_id);
        debug!(%account_id, released = released.is_some(), "enrollment cancel executed");
        Ok(released)
    }

    async fn course_for(
        &self,
        account_id: AccountId,
    ) -> Result<Option<Course>, EnrollmentPersistenceError> {
        let state = self.lock().map_err(EnrollmentPersistenceError::connection)?;
        Ok(state
            .active_enrollment(account_id)
            .and_then(|course_id| state.course(course_id)))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
