//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Account, AccountId, AccountRecord, Email, NewAccount, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountPersistenceError {
        /// Another account already uses this email.
        DuplicateEmail { email: String } => "an account with email {email} already exists",
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account; emails are unique.
    async fn insert(&self, account: NewAccount) -> Result<Account, AccountPersistenceError>;

    /// Fetch an account and its credential by normalised email.
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<AccountRecord>, AccountPersistenceError>;

    /// Fetch an account and its credential by identifier.
    async fn find_by_id(
        &self,
        id: AccountId,
    ) -> Result<Option<AccountRecord>, AccountPersistenceError>;

    /// Replace the stored credential. Returns `false` when the account is unknown.
    async fn update_password(
        &self,
        id: AccountId,
        password_hash: PasswordHash,
    ) -> Result<bool, AccountPersistenceError>;
}
