//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call it to authenticate credentials without knowing the
//! backing infrastructure, so handler tests can substitute a mock.

use async_trait::async_trait;

use crate::domain::{Account, Error, LoginCredentials, Role};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials for the portal serving `role` and return the
    /// authenticated account.
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
        role: Role,
    ) -> Result<Account, Error>;
}
