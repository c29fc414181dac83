//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed registration entities and the use-cases
//! that operate on them. Types are validated on construction; services talk
//! to infrastructure only through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode / ErrorKind: transport-agnostic failure payload.
//! - Account, Course and their value types.
//! - [`admit`]: the enrollment admission rules.
//! - AccountService, CourseCatalogueService, EnrollmentService: driving-port
//!   implementations.

pub mod account;
pub mod accounts;
pub mod auth;
pub mod catalogue;
pub mod course;
pub mod enrollment;
pub mod error;
pub mod ports;
pub mod trace_id;

pub use self::account::{
    Account, AccountId, AccountRecord, AccountValidationError, DisplayName, Email, NewAccount,
    PasswordHash, Role,
};
pub use self::accounts::{AccountService, AdminBootstrap};
pub use self::auth::{AuthValidationError, LoginCredentials, PasswordChange, SignupDetails};
pub use self::catalogue::CourseCatalogueService;
pub use self::course::{
    Capacity, Course, CourseDraft, CourseId, CourseName, CourseSchedule, CourseValidationError,
    RegistrationWindow, RosterEntry,
};
pub use self::enrollment::{EnrollmentRejection, EnrollmentService, SeatCheck, admit};
pub use self::error::{Error, ErrorCode, ErrorKind};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use registrar::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
