//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`; the
//! wrappers here mirror them for utoipa's external schema registration.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Coarse error category; determines the HTTP status.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or breaks a business rule.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No valid session.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated with the wrong role.
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    /// Duplicate email or enrollment state conflict.
    #[schema(rename = "conflict")]
    Conflict,
    #[schema(rename = "capacity_exceeded")]
    CapacityExceeded,
    #[schema(rename = "outside_registration_window")]
    OutsideRegistrationWindow,
    /// A backing service could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::ErrorKind`].
///
/// Stable machine-readable reason within a code.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorKind)]
pub enum ErrorKindSchema {
    #[schema(rename = "validation")]
    Validation,
    #[schema(rename = "capacity_below_roster")]
    CapacityBelowRoster,
    #[schema(rename = "password_mismatch")]
    PasswordMismatch,
    #[schema(rename = "email_taken")]
    EmailTaken,
    #[schema(rename = "invalid_credentials")]
    InvalidCredentials,
    #[schema(rename = "unauthenticated")]
    Unauthenticated,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "wrong_role")]
    WrongRole,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "course_not_found")]
    CourseNotFound,
    #[schema(rename = "account_not_found")]
    AccountNotFound,
    #[schema(rename = "already_enrolled")]
    AlreadyEnrolled,
    #[schema(rename = "no_active_enrollment")]
    NoActiveEnrollment,
    #[schema(rename = "capacity_exceeded")]
    CapacityExceeded,
    #[schema(rename = "outside_registration_window")]
    OutsideRegistrationWindow,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal")]
    Internal,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "capacity_exceeded")]
    kind: ErrorKindSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "course is full")]
    message: String,
    /// Correlation identifier, also sent in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}
