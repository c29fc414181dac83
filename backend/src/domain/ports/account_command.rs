//! Driving port for account mutations.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, Email, Error, PasswordChange, SignupDetails};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register a new student account.
    async fn signup(&self, details: SignupDetails) -> Result<Account, Error>;

    /// Replace the caller's password.
    async fn change_password(&self, id: AccountId, change: PasswordChange) -> Result<(), Error>;

    /// Acknowledge a reset request for a known email.
    async fn request_password_reset(&self, email: Email) -> Result<(), Error>;
}
