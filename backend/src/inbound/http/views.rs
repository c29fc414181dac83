//! JSON response bodies shared by the account, course and enrollment
//! handlers.
//!
//! Rosters expose only the enrolled account's id, name and email.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::Profile;
use crate::domain::{Account, Course, Role, RosterEntry};

/// One enrolled account as shown on a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntryResponse {
    pub id: Uuid,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
}

impl From<&RosterEntry> for RosterEntryResponse {
    fn from(entry: &RosterEntry) -> Self {
        Self {
            id: *entry.account_id.as_uuid(),
            name: entry.name.to_string(),
            email: entry.email.to_string(),
        }
    }
}

/// Course with seat counts, and its roster when the caller may see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: Uuid,
    #[schema(example = "Intro to Rust")]
    pub name: String,
    pub date: NaiveDate,
    #[schema(value_type = String, example = "10:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "12:00:00")]
    pub end_time: NaiveTime,
    #[schema(example = 20)]
    pub max_capacity: u32,
    pub registration_start_time: DateTime<Utc>,
    pub registration_end_time: DateTime<Utc>,
    pub enrolled_count: u32,
    pub remaining_seats: u32,
    /// Present on admin views and on the caller's own course.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrolled_students: Option<Vec<RosterEntryResponse>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CourseResponse {
    /// View without the roster, for student browsing.
    pub fn summary(course: &Course) -> Self {
        Self {
            id: *course.id.as_uuid(),
            name: course.draft.name.to_string(),
            date: course.draft.schedule.date(),
            start_time: course.draft.schedule.start(),
            end_time: course.draft.schedule.end(),
            max_capacity: course.draft.capacity.get(),
            registration_start_time: course.draft.window.opens_at(),
            registration_end_time: course.draft.window.closes_at(),
            enrolled_count: course.enrolled_count(),
            remaining_seats: course.remaining_seats(),
            enrolled_students: None,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }

    /// View including the roster.
    pub fn detailed(course: &Course) -> Self {
        Self {
            enrolled_students: Some(course.roster.iter().map(RosterEntryResponse::from).collect()),
            ..Self::summary(course)
        }
    }
}

/// Account as returned to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: Uuid,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(value_type = String, example = "student")]
    pub role: Role,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: *account.id.as_uuid(),
            email: account.email.to_string(),
            name: account.name.to_string(),
            role: account.role,
        }
    }
}

/// Caller's profile with the course they hold, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub account: AccountResponse,
    pub active_enrollment: Option<CourseResponse>,
}

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            account: AccountResponse::from(&profile.account),
            active_enrollment: profile.active_course.as_ref().map(CourseResponse::detailed),
        }
    }
}

/// Plain acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "enrollment cancelled")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Enrollment acknowledgement with the course joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EnrollmentResponse {
    #[schema(example = "enrollment complete")]
    pub message: String,
    pub course: CourseResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, CourseId, DisplayName, Email};
    use crate::test_support::{course_date, course_draft, window_opens};
    use rstest::{fixture, rstest};
    use serde_json::Value;

    #[fixture]
    fn course() -> Course {
        Course {
            id: CourseId::random(),
            draft: course_draft("Intro to Rust", 2, course_date()),
            roster: vec![RosterEntry {
                account_id: AccountId::random(),
                name: DisplayName::new("Ada").expect("valid name"),
                email: Email::new("ada@example.com").expect("valid email"),
            }],
            created_at: window_opens(),
            updated_at: window_opens(),
        }
    }

    #[rstest]
    fn summary_hides_the_roster(course: Course) {
        let json = serde_json::to_value(CourseResponse::summary(&course)).expect("serialise");

        assert!(json.get("enrolledStudents").is_none());
        assert_eq!(json.get("enrolledCount"), Some(&Value::from(1)));
        assert_eq!(json.get("remainingSeats"), Some(&Value::from(1)));
        assert_eq!(json.get("maxCapacity"), Some(&Value::from(2)));
    }

    #[rstest]
    fn detailed_roster_exposes_only_public_fields(course: Course) {
        let json = serde_json::to_value(CourseResponse::detailed(&course)).expect("serialise");

        let entry = json
            .pointer("/enrolledStudents/0")
            .and_then(Value::as_object)
            .expect("roster entry");
        let mut keys: Vec<&str> = entry.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["email", "id", "name"]);
    }

    #[rstest]
    fn profile_flattens_the_account(course: Course) {
        let account = Account {
            id: AccountId::random(),
            email: Email::new("ada@example.com").expect("valid email"),
            name: DisplayName::new("Ada").expect("valid name"),
            role: Role::Student,
            active_enrollment: Some(course.id),
        };
        let profile = Profile {
            account,
            active_course: Some(course),
        };

        let json = serde_json::to_value(ProfileResponse::from(&profile)).expect("serialise");

        assert_eq!(json.get("role"), Some(&Value::from("student")));
        assert!(json.pointer("/activeEnrollment/enrolledStudents").is_some());
        assert!(json.get("password_hash").is_none());
    }
}
