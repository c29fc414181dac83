//! Account directory services: signup, login, profile and password upkeep.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    AccountCommand, AccountPersistenceError, AccountQuery, AccountRepository,
    EnrollmentPersistenceError, EnrollmentRepository, LoginService, PasswordHashError,
    PasswordHasher, Profile,
};
use crate::domain::{
    Account, AccountId, DisplayName, Email, Error, LoginCredentials, NewAccount, PasswordChange,
    Role, SignupDetails,
};

/// Result of [`AccountService::ensure_admin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminBootstrap {
    Created(AccountId),
    AlreadyPresent(AccountId),
}

/// Account service implementing the login and account driving ports.
#[derive(Clone)]
pub struct AccountService<A, E> {
    accounts: Arc<A>,
    enrollments: Arc<E>,
    hasher: Arc<dyn PasswordHasher>,
}

impl<A, E> AccountService<A, E> {
    pub fn new(accounts: Arc<A>, enrollments: Arc<E>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            accounts,
            enrollments,
            hasher,
        }
    }
}

impl<A, E> AccountService<A, E>
where
    A: AccountRepository,
    E: EnrollmentRepository,
{
    fn map_account_error(error: AccountPersistenceError) -> Error {
        match error {
            AccountPersistenceError::DuplicateEmail { .. } => Error::email_taken(),
            AccountPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("account repository unavailable: {message}"))
            }
            AccountPersistenceError::Query { message } => {
                Error::internal(format!("account repository error: {message}"))
            }
        }
    }

    fn map_enrollment_error(error: EnrollmentPersistenceError) -> Error {
        match error {
            EnrollmentPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("enrollment repository unavailable: {message}"))
            }
            other => Error::internal(format!("enrollment repository error: {other}")),
        }
    }

    fn map_hash_error(error: PasswordHashError) -> Error {
        Error::internal(error.to_string())
    }

    /// Create the admin account if no account uses `email`.
    ///
    /// An existing account with that email is left untouched, whatever its
    /// role, so restarts never rotate an operator's password.
    pub async fn ensure_admin(
        &self,
        email: Email,
        name: DisplayName,
        password: &str,
    ) -> Result<AdminBootstrap, Error> {
        if let Some(existing) = self
            .accounts
            .find_by_email(&email)
            .await
            .map_err(Self::map_account_error)?
        {
            return Ok(AdminBootstrap::AlreadyPresent(existing.account.id));
        }
        let password_hash = self
            .hasher
            .hash(password)
            .map_err(Self::map_hash_error)?;
        let account = self
            .accounts
            .insert(NewAccount {
                id: AccountId::random(),
                email,
                name,
                role: Role::Admin,
                password_hash,
            })
            .await
            .map_err(Self::map_account_error)?;
        info!(account_id = %account.id, email = %account.email, "admin account created");
        Ok(AdminBootstrap::Created(account.id))
    }
}

#[async_trait]
impl<A, E> LoginService for AccountService<A, E>
where
    A: AccountRepository,
    E: EnrollmentRepository,
{
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
        role: Role,
    ) -> Result<Account, Error> {
        let record = self
            .accounts
            .find_by_email(credentials.email())
            .await
            .map_err(Self::map_account_error)?
            .ok_or_else(Error::invalid_credentials)?;
        let matches = self
            .hasher
            .verify(credentials.password(), &record.password_hash)
            .map_err(Self::map_hash_error)?;
        if !matches {
            return Err(Error::invalid_credentials());
        }
        match (record.account.role, role) {
            (Role::Student, Role::Student) | (Role::Admin, Role::Admin) => Ok(record.account),
            (Role::Admin, Role::Student) => {
                Err(Error::wrong_role("please sign in through the admin portal"))
            }
            (Role::Student, Role::Admin) => {
                Err(Error::wrong_role("please sign in with an admin account"))
            }
        }
    }
}

#[async_trait]
impl<A, E> AccountCommand for AccountService<A, E>
where
    A: AccountRepository,
    E: EnrollmentRepository,
{
    async fn signup(&self, details: SignupDetails) -> Result<Account, Error> {
        if self
            .accounts
            .find_by_email(details.email())
            .await
            .map_err(Self::map_account_error)?
            .is_some()
        {
            return Err(Error::email_taken());
        }
        let password_hash = self
            .hasher
            .hash(details.password())
            .map_err(Self::map_hash_error)?;
        // The unique index still guards the race between lookup and insert.
        let account = self
            .accounts
            .insert(NewAccount {
                id: AccountId::random(),
                email: details.email().clone(),
                name: details.name().clone(),
                role: Role::Student,
                password_hash,
            })
            .await
            .map_err(Self::map_account_error)?;
        info!(account_id = %account.id, "student account created");
        Ok(account)
    }

    async fn change_password(&self, id: AccountId, change: PasswordChange) -> Result<(), Error> {
        let password_hash = self
            .hasher
            .hash(change.new_password())
            .map_err(Self::map_hash_error)?;
        let updated = self
            .accounts
            .update_password(id, password_hash)
            .await
            .map_err(Self::map_account_error)?;
        if !updated {
            return Err(Error::account_not_found());
        }
        info!(account_id = %id, "password changed");
        Ok(())
    }

    async fn request_password_reset(&self, email: Email) -> Result<(), Error> {
        let record = self
            .accounts
            .find_by_email(&email)
            .await
            .map_err(Self::map_account_error)?;
        match record {
            Some(record) => {
                info!(account_id = %record.account.id, "password reset requested");
                Ok(())
            }
            None => Err(Error::not_found("no account uses this email")),
        }
    }
}

#[async_trait]
impl<A, E> AccountQuery for AccountService<A, E>
where
    A: AccountRepository,
    E: EnrollmentRepository,
{
    async fn find_account(&self, id: AccountId) -> Result<Option<Account>, Error> {
        Ok(self
            .accounts
            .find_by_id(id)
            .await
            .map_err(Self::map_account_error)?
            .map(|record| record.account))
    }

    async fn profile(&self, id: AccountId) -> Result<Profile, Error> {
        let account = self
            .find_account(id)
            .await?
            .ok_or_else(Error::account_not_found)?;
        let active_course = match account.active_enrollment {
            Some(_) => self
                .enrollments
                .course_for(id)
                .await
                .map_err(Self::map_enrollment_error)?,
            None => None,
        };
        Ok(Profile {
            account,
            active_course,
        })
    }
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
