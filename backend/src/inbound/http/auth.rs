//! Access gate: resolve the session token to an account and check its role.
//!
//! Handlers call [`require_account`] or [`require_role`] before touching a
//! use-case, so the role check happens in exactly one place.

use crate::domain::ports::AccountQuery;
use crate::domain::{Account, Error, Role};

use super::ApiResult;
use super::session::SessionContext;

/// Resolve the caller's account.
///
/// A missing or unreadable token, or one naming an account that no longer
/// exists, yields `401`. Stale tokens are purged.
pub async fn require_account(
    session: &SessionContext,
    accounts: &dyn AccountQuery,
) -> ApiResult<Account> {
    let id = session.require_account_id()?;
    match accounts.find_account(id).await? {
        Some(account) => Ok(account),
        None => {
            session.purge();
            Err(Error::unauthorized("session no longer valid"))
        }
    }
}

/// Resolve the caller's account and require `role`.
pub async fn require_role(
    session: &SessionContext,
    accounts: &dyn AccountQuery,
    role: Role,
) -> ApiResult<Account> {
    let account = require_account(session, accounts).await?;
    check_role(&account, role)?;
    Ok(account)
}

fn check_role(account: &Account, required: Role) -> ApiResult<()> {
    match (required, account.role) {
        (Role::Student, Role::Student) | (Role::Admin, Role::Admin) => Ok(()),
        (Role::Student, Role::Admin) => Err(Error::forbidden("student access required")),
        (Role::Admin, Role::Student) => Err(Error::forbidden("admin access required")),
    }
}
