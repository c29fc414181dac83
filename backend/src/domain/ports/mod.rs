//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hashing, metrics) expose typed errors built
//! with [`define_port_error!`]; driving ports return the domain [`Error`]
//! directly so inbound adapters can map it to a response.
//!
//! [`Error`]: crate::domain::Error

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod account_query;
mod account_repository;
mod course_command;
mod course_query;
mod course_repository;
mod enrollment_command;
mod enrollment_metrics;
mod enrollment_query;
mod enrollment_repository;
mod login_service;
mod password_hasher;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_query::MockAccountQuery;
pub use account_query::{AccountQuery, Profile};
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountPersistenceError, AccountRepository};
#[cfg(test)]
pub use course_command::MockCourseCommand;
pub use course_command::CourseCommand;
#[cfg(test)]
pub use course_query::MockCourseQuery;
pub use course_query::CourseQuery;
#[cfg(test)]
pub use course_repository::MockCourseRepository;
pub use course_repository::{CoursePersistenceError, CourseRepository};
#[cfg(test)]
pub use enrollment_command::MockEnrollmentCommand;
pub use enrollment_command::EnrollmentCommand;
#[cfg(test)]
pub use enrollment_metrics::MockEnrollmentMetrics;
pub use enrollment_metrics::{
    EnrollmentMetrics, EnrollmentMetricsError, EnrollmentOutcomeLabel, NoOpEnrollmentMetrics,
};
#[cfg(test)]
pub use enrollment_query::MockEnrollmentQuery;
pub use enrollment_query::EnrollmentQuery;
#[cfg(test)]
pub use enrollment_repository::MockEnrollmentRepository;
pub use enrollment_repository::{EnrollmentPersistenceError, EnrollmentRepository};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
