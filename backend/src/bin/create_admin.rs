//! Ensure an admin account exists in the registrar database.
//!
//! Idempotent: an account already holding the email is reported and left
//! untouched.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tokio::runtime::Builder;
use zeroize::Zeroizing;

use registrar::domain::{AccountService, AdminBootstrap, DisplayName, Email};
use registrar::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselEnrollmentRepository, PoolConfig, run_migrations,
};
use registrar::outbound::security::Argon2PasswordHasher;

const DATABASE_URL_ENV: &str = "REGISTRAR_DATABASE_URL";
const PASSWORD_ENV: &str = "REGISTRAR_ADMIN_PASSWORD";

/// `create-admin` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-admin",
    about = "Create a registrar admin account if the email is not yet registered",
    version
)]
struct CliArgs {
    /// Admin email address.
    #[arg(long, value_name = "email")]
    email: String,
    /// Display name shown in rosters and profiles.
    #[arg(long, value_name = "name", default_value = "Administrator")]
    name: String,
    /// Database connection URL. Falls back to `REGISTRAR_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let database_url = resolve_database_url(args.database_url)?;
    // Never taken from argv.
    let password = Zeroizing::new(
        env::var(PASSWORD_ENV).wrap_err_with(|| format!("{PASSWORD_ENV} must be set"))?,
    );
    let email = Email::new(&args.email).map_err(|e| eyre!("invalid email: {e}"))?;
    let name = DisplayName::new(&args.name).map_err(|e| eyre!("invalid name: {e}"))?;

    run_migrations(&database_url)
        .await
        .wrap_err("apply database migrations")?;
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(1))
        .await
        .wrap_err("create database pool")?;

    let service = AccountService::new(
        Arc::new(DieselAccountRepository::new(pool.clone())),
        Arc::new(DieselEnrollmentRepository::new(pool)),
        Arc::new(Argon2PasswordHasher::default()),
    );
    match service
        .ensure_admin(email, name, password.as_str())
        .await
        .map_err(|e| eyre!("admin bootstrap failed: {e}"))?
    {
        AdminBootstrap::Created(id) => println!("created admin account {id}"),
        AdminBootstrap::AlreadyPresent(id) => {
            println!("account {id} already uses this email; nothing changed");
        }
    }
    Ok(())
}

fn resolve_database_url(flag: Option<String>) -> Result<String> {
    flag.or_else(|| env::var(DATABASE_URL_ENV).ok())
        .map(|url| url.trim().to_owned())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| {
            eyre!("no database configured; pass --database-url or set {DATABASE_URL_ENV}")
        })
}
