//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{AccountPersistenceError, AccountRepository};
use crate::domain::{Account, AccountId, AccountRecord, Email, NewAccount, PasswordHash};

use super::diesel_error_mapping::{DieselFailure, classify};
use super::models::{AccountRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::{accounts, enrollments};

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountPersistenceError {
    AccountPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> AccountPersistenceError {
    match classify(error) {
        DieselFailure::Connection(message) => AccountPersistenceError::connection(message),
        DieselFailure::UniqueViolation { constraint } => AccountPersistenceError::query(format!(
            "unique constraint violated: {}",
            constraint.as_deref().unwrap_or("unknown")
        )),
        DieselFailure::Query(message) => AccountPersistenceError::query(message),
    }
}

fn to_record(
    (row, active): (AccountRow, Option<Uuid>),
) -> Result<AccountRecord, AccountPersistenceError> {
    row.into_record(active)
        .map_err(|err| AccountPersistenceError::query(err.to_string()))
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn insert(&self, account: NewAccount) -> Result<Account, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAccountRow {
            id: *account.id.as_uuid(),
            email: account.email.as_ref(),
            name: account.name.as_ref(),
            role: account.role.as_str(),
            password_hash: account.password_hash.as_str(),
        };

        diesel::insert_into(accounts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|error| match classify(error) {
                DieselFailure::UniqueViolation { .. } => {
                    AccountPersistenceError::duplicate_email(account.email.to_string())
                }
                DieselFailure::Connection(message) => AccountPersistenceError::connection(message),
                DieselFailure::Query(message) => AccountPersistenceError::query(message),
            })?;

        Ok(Account {
            id: account.id,
            email: account.email,
            name: account.name,
            role: account.role,
            active_enrollment: None,
        })
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<AccountRecord>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(AccountRow, Option<Uuid>)> = accounts::table
            .left_join(enrollments::table)
            .filter(accounts::email.eq(email.as_ref()))
            .select((AccountRow::as_select(), enrollments::course_id.nullable()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_record).transpose()
    }

    async fn find_by_id(
        &self,
        id: AccountId,
    ) -> Result<Option<AccountRecord>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(AccountRow, Option<Uuid>)> = accounts::table
            .left_join(enrollments::table)
            .filter(accounts::id.eq(*id.as_uuid()))
            .select((AccountRow::as_select(), enrollments::course_id.nullable()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_record).transpose()
    }

    async fn update_password(
        &self,
        id: AccountId,
        password_hash: PasswordHash,
    ) -> Result<bool, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(accounts::table.filter(accounts::id.eq(*id.as_uuid())))
            .set((
                accounts::password_hash.eq(password_hash.as_str()),
                accounts::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
