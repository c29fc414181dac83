//! Domain-level error types.
//!
//! Errors are transport agnostic. Inbound adapters map them to HTTP responses;
//! the payload itself serialises to the JSON error body clients receive.
//!
//! Two stable identifiers travel with every error:
//! - [`ErrorCode`]: the coarse category (drives the HTTP status).
//! - [`ErrorKind`]: the precise, machine-readable reason.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TraceId;

/// Coarse failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication is missing, invalid or expired.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The request conflicts with current state.
    Conflict,
    /// The course roster is full.
    CapacityExceeded,
    /// The request arrived outside the course registration window.
    OutsideRegistrationWindow,
    /// A backing service is temporarily unreachable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the service.
    InternalError,
}

/// Precise failure reason exposed to clients for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    CapacityBelowRoster,
    PasswordMismatch,
    EmailTaken,
    InvalidCredentials,
    Unauthenticated,
    Forbidden,
    WrongRole,
    NotFound,
    CourseNotFound,
    AccountNotFound,
    AlreadyEnrolled,
    NoActiveEnrollment,
    CapacityExceeded,
    OutsideRegistrationWindow,
    ServiceUnavailable,
    Internal,
}

impl ErrorKind {
    /// Category this reason belongs to.
    #[must_use]
    pub const fn code(self) -> ErrorCode {
        match self {
            Self::Validation
            | Self::CapacityBelowRoster
            | Self::PasswordMismatch
            | Self::InvalidCredentials => ErrorCode::InvalidRequest,
            Self::Unauthenticated => ErrorCode::Unauthorized,
            Self::Forbidden | Self::WrongRole => ErrorCode::Forbidden,
            Self::NotFound | Self::CourseNotFound | Self::AccountNotFound => ErrorCode::NotFound,
            Self::EmailTaken | Self::AlreadyEnrolled | Self::NoActiveEnrollment => {
                ErrorCode::Conflict
            }
            Self::CapacityExceeded => ErrorCode::CapacityExceeded,
            Self::OutsideRegistrationWindow => ErrorCode::OutsideRegistrationWindow,
            Self::ServiceUnavailable => ErrorCode::ServiceUnavailable,
            Self::Internal => ErrorCode::InternalError,
        }
    }
}

/// Error payload shared by services and adapters.
///
/// ## Invariants
/// - `code` always equals `kind.code()`.
/// - `message` is never blank; blank inputs fall back to a generic message.
///
/// # Examples
/// ```
/// use registrar::domain::{Error, ErrorCode, ErrorKind};
///
/// let err = Error::already_enrolled();
/// assert_eq!(err.kind(), ErrorKind::AlreadyEnrolled);
/// assert_eq!(err.code(), ErrorCode::Conflict);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    kind: ErrorKind,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Build an error for `kind`, capturing the trace id in scope.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "request failed".to_owned()
        } else {
            message
        };
        Self {
            code: kind.code(),
            kind,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Coarse category.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Precise reason.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier, if one was in scope.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary structured details.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach a trace identifier.
    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details.
    ///
    /// # Examples
    /// ```
    /// use registrar::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "name" }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn capacity_below_roster(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CapacityBelowRoster, message)
    }

    #[must_use]
    pub fn password_mismatch() -> Self {
        Self::new(ErrorKind::PasswordMismatch, "passwords do not match")
    }

    #[must_use]
    pub fn email_taken() -> Self {
        Self::new(ErrorKind::EmailTaken, "an account with this email already exists")
    }

    #[must_use]
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "email or password is incorrect")
    }

    #[must_use]
    pub fn wrong_role(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::WrongRole, message)
    }

    #[must_use]
    pub fn course_not_found() -> Self {
        Self::new(ErrorKind::CourseNotFound, "course not found")
    }

    #[must_use]
    pub fn account_not_found() -> Self {
        Self::new(ErrorKind::AccountNotFound, "account not found")
    }

    #[must_use]
    pub fn already_enrolled() -> Self {
        Self::new(
            ErrorKind::AlreadyEnrolled,
            "already enrolled in a course; only one course may be held at a time",
        )
    }

    #[must_use]
    pub fn no_active_enrollment() -> Self {
        Self::new(ErrorKind::NoActiveEnrollment, "no active enrollment to cancel")
    }

    #[must_use]
    pub fn capacity_exceeded() -> Self {
        Self::new(ErrorKind::CapacityExceeded, "course capacity has been reached")
    }

    #[must_use]
    pub fn outside_registration_window() -> Self {
        Self::new(
            ErrorKind::OutsideRegistrationWindow,
            "course registration is not open at this time",
        )
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}
