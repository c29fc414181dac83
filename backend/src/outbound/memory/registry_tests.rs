//! Behavioural coverage for the in-memory registry.

use super::*;
use crate::domain::{DisplayName, Role};
use crate::test_support::{course_date, course_draft, window_closes, window_opens};
use chrono::TimeDelta;
use rstest::{fixture, rstest};

#[fixture]
fn registry() -> InMemoryRegistry {
    InMemoryRegistry::new()
}

fn inside() -> DateTime<Utc> {
    window_opens() + TimeDelta::hours(1)
}

async fn add_account(registry: &InMemoryRegistry, email: &str, role: Role) -> AccountId {
    let account = registry
        .insert(NewAccount {
            id: AccountId::random(),
            email: Email::new(email).expect("valid email"),
            name: DisplayName::new(email).expect("valid name"),
            role,
            password_hash: PasswordHash::new("$argon2id$stub"),
        })
        .await
        .expect("insert account");
    account.id
}

async fn add_course(registry: &InMemoryRegistry, name: &str, capacity: u32) -> CourseId {
    let course = registry
        .create(
            CourseId::random(),
            course_draft(name, capacity, course_date()),
            window_opens(),
        )
        .await
        .expect("create course");
    course.id
}

#[rstest]
#[tokio::test]
async fn duplicate_emails_are_rejected_case_insensitively(registry: InMemoryRegistry) {
    add_account(&registry, "ada@example.com", Role::Student).await;

    let err = registry
        .insert(NewAccount {
            id: AccountId::random(),
            email: Email::new("ADA@example.com").expect("valid email"),
            name: DisplayName::new("Ada again").expect("valid name"),
            role: Role::Student,
            password_hash: PasswordHash::new("$argon2id$stub"),
        })
        .await
        .expect_err("duplicate");

    assert!(matches!(err, AccountPersistenceError::DuplicateEmail { .. }));
}

#[rstest]
#[tokio::test]
async fn roster_and_active_enrollment_agree(registry: InMemoryRegistry) {
    let student = add_account(&registry, "ada@example.com", Role::Student).await;
    let course = add_course(&registry, "Rust 101", 3).await;

    let enrolled = registry
        .enroll(student, course, inside())
        .await
        .expect("enroll");
    assert!(enrolled.has_member(student));

    let record = AccountRepository::find_by_id(&registry, student)
        .await
        .expect("lookup")
        .expect("account exists");
    assert_eq!(record.account.active_enrollment, Some(course));

    let held = registry
        .course_for(student)
        .await
        .expect("lookup")
        .expect("enrolled");
    assert_eq!(held.id, course);
}

#[rstest]
#[tokio::test]
async fn roster_keeps_enrollment_order(registry: InMemoryRegistry) {
    let course = add_course(&registry, "Rust 101", 3).await;
    let first = add_account(&registry, "first@example.com", Role::Student).await;
    let second = add_account(&registry, "second@example.com", Role::Student).await;

    registry.enroll(second, course, inside()).await.expect("enroll");
    let course_view = registry.enroll(first, course, inside()).await.expect("enroll");

    let order: Vec<AccountId> = course_view
        .roster
        .iter()
        .map(|entry| entry.account_id)
        .collect();
    assert_eq!(order, vec![second, first]);
}

#[rstest]
#[tokio::test]
async fn second_enrollment_is_refused(registry: InMemoryRegistry) {
    let student = add_account(&registry, "ada@example.com", Role::Student).await;
    let first = add_course(&registry, "Rust 101", 3).await;
    let second = add_course(&registry, "Rust 102", 3).await;
    registry.enroll(student, first, inside()).await.expect("enroll");

    let err = registry
        .enroll(student, second, inside())
        .await
        .expect_err("already enrolled");

    assert_eq!(
        err,
        EnrollmentPersistenceError::rejected(EnrollmentRejection::AlreadyEnrolled)
    );
}

#[rstest]
#[tokio::test]
async fn enrolling_an_unknown_account_fails(registry: InMemoryRegistry) {
    let course = add_course(&registry, "Rust 101", 3).await;

    let err = registry
        .enroll(AccountId::random(), course, inside())
        .await
        .expect_err("unknown account");

    assert_eq!(err, EnrollmentPersistenceError::AccountNotFound);
}

#[rstest]
#[case(window_opens(), true)]
#[case(window_closes(), true)]
#[case(window_closes() + TimeDelta::seconds(1), false)]
#[tokio::test]
async fn window_bounds_are_enforced_at_write_time(
    registry: InMemoryRegistry,
    #[case] now: DateTime<Utc>,
    #[case] admitted: bool,
) {
    let student = add_account(&registry, "ada@example.com", Role::Student).await;
    let course = add_course(&registry, "Rust 101", 3).await;

    let result = registry.enroll(student, course, now).await;

    assert_eq!(result.is_ok(), admitted);
}

#[rstest]
#[tokio::test]
async fn cancel_frees_the_seat(registry: InMemoryRegistry) {
    let student = add_account(&registry, "ada@example.com", Role::Student).await;
    let other = add_account(&registry, "bob@example.com", Role::Student).await;
    let course = add_course(&registry, "Rust 101", 1).await;
    registry.enroll(student, course, inside()).await.expect("enroll");

    assert_eq!(registry.cancel(student).await.expect("cancel"), Some(course));
    assert_eq!(registry.cancel(student).await.expect("cancel"), None);

    let course_view = registry.enroll(other, course, inside()).await.expect("enroll");
    assert_eq!(course_view.enrolled_count(), 1);
}

#[rstest]
#[tokio::test]
async fn capacity_cannot_drop_below_the_roster(registry: InMemoryRegistry) {
    let course = add_course(&registry, "Rust 101", 2).await;
    for email in ["a@example.com", "b@example.com"] {
        let student = add_account(&registry, email, Role::Student).await;
        registry.enroll(student, course, inside()).await.expect("enroll");
    }

    let err = registry
        .update(course, course_draft("Rust 101", 1, course_date()), inside())
        .await
        .expect_err("capacity below roster");
    assert_eq!(err, CoursePersistenceError::capacity_below_roster(2_u32, 1_u32));

    let updated = registry
        .update(course, course_draft("Rust 101 (renamed)", 2, course_date()), inside())
        .await
        .expect("update")
        .expect("course exists");
    assert_eq!(updated.enrolled_count(), 2);
    assert_eq!(updated.draft.name.as_ref(), "Rust 101 (renamed)");
}

#[rstest]
#[tokio::test]
async fn delete_releases_every_enrollee(registry: InMemoryRegistry) {
    let course = add_course(&registry, "Rust 101", 2).await;
    let student = add_account(&registry, "ada@example.com", Role::Student).await;
    registry.enroll(student, course, inside()).await.expect("enroll");

    let released = registry
        .delete(course)
        .await
        .expect("delete")
        .expect("course existed");

    assert_eq!(released, vec![student]);
    assert!(registry.course_for(student).await.expect("lookup").is_none());
    assert!(registry.delete(course).await.expect("delete").is_none());
}

#[rstest]
#[tokio::test]
async fn list_is_newest_course_first(registry: InMemoryRegistry) {
    let early = registry
        .create(
            CourseId::random(),
            course_draft("Early", 1, course_date()),
            window_opens(),
        )
        .await
        .expect("create");
    let late = registry
        .create(
            CourseId::random(),
            course_draft("Late", 1, course_date() + TimeDelta::days(7)),
            window_opens(),
        )
        .await
        .expect("create");

    let listed: Vec<CourseId> = registry
        .list()
        .await
        .expect("list")
        .iter()
        .map(|course| course.id)
        .collect();

    assert_eq!(listed, vec![late.id, early.id]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_enrollments_never_overfill_a_course() {
    let registry = InMemoryRegistry::new();
    let course = add_course(&registry, "Rust 101", 1).await;
    let mut students = Vec::new();
    for index in 0..16 {
        students.push(add_account(&registry, &format!("s{index}@example.com"), Role::Student).await);
    }

    let handles: Vec<_> = students
        .into_iter()
        .map(|student| {
            let registry = registry.clone();
            tokio::spawn(async move { registry.enroll(student, course, inside()).await })
        })
        .collect();

    let mut admitted = 0;
    let mut refused = 0;
    for handle in handles {
        match handle.await.expect("task completes") {
            Ok(_) => admitted += 1,
            Err(EnrollmentPersistenceError::Rejected {
                reason: EnrollmentRejection::CapacityExceeded,
            }) => refused += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(admitted, 1);
    assert_eq!(refused, 15);
    let course_view = CourseRepository::find_by_id(&registry, course)
        .await
        .expect("lookup")
        .expect("course exists");
    assert_eq!(course_view.enrolled_count(), 1);
}
