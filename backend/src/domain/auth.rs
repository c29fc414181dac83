//! Authentication primitives: login credentials, signup details and
//! password changes.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::{AccountValidationError, DisplayName, Email};

/// Domain error returned when authentication payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// One or more required fields were missing or blank.
    MissingFields(Vec<&'static str>),
    /// Password and confirmation differ.
    PasswordMismatch,
    /// Email or name failed validation.
    Account(AccountValidationError),
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields(fields) => {
                write!(f, "missing required fields: {}", fields.join(", "))
            }
            Self::PasswordMismatch => write!(f, "passwords do not match"),
            Self::Account(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for AuthValidationError {}

impl From<AccountValidationError> for AuthValidationError {
    fn from(value: AccountValidationError) -> Self {
        Self::Account(value)
    }
}

fn missing(fields: &[(&'static str, &str)]) -> Result<(), AuthValidationError> {
    let absent: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if absent.is_empty() {
        Ok(())
    } else {
        Err(AuthValidationError::MissingFields(absent))
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is normalised (trimmed, lowercase).
/// - `password` is non-empty but retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use registrar::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com", "pw").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "pw");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        missing(&[("email", email), ("password", password)])?;
        Ok(Self {
            email: Email::new(email)?,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated signup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupDetails {
    email: Email,
    name: DisplayName,
    password: Zeroizing<String>,
}

impl SignupDetails {
    /// Validate raw signup fields.
    ///
    /// Missing fields are reported together before the password comparison,
    /// which in turn precedes the email syntax check.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        password_confirm: &str,
        name: &str,
    ) -> Result<Self, AuthValidationError> {
        missing(&[
            ("email", email),
            ("password", password),
            ("passwordConfirm", password_confirm),
            ("name", name),
        ])?;
        if password != password_confirm {
            return Err(AuthValidationError::PasswordMismatch);
        }
        Ok(Self {
            email: Email::new(email)?,
            name: DisplayName::new(name)?,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated replacement password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    new_password: Zeroizing<String>,
}

impl PasswordChange {
    pub fn try_from_parts(
        new_password: &str,
        confirm_password: &str,
    ) -> Result<Self, AuthValidationError> {
        missing(&[
            ("newPassword", new_password),
            ("confirmPassword", confirm_password),
        ])?;
        if new_password != confirm_password {
            return Err(AuthValidationError::PasswordMismatch);
        }
        Ok(Self {
            new_password: Zeroizing::new(new_password.to_owned()),
        })
    }

    pub fn new_password(&self) -> &str {
        self.new_password.as_str()
    }
}
