//! Driving port for account reads.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, Course, Error};

/// Caller's own profile with its active enrollment resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub account: Account,
    pub active_course: Option<Course>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Resolve an account by id; `None` when it no longer exists.
    async fn find_account(&self, id: AccountId) -> Result<Option<Account>, Error>;

    /// Profile for an existing account.
    async fn profile(&self, id: AccountId) -> Result<Profile, Error>;
}
