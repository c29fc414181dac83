//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! The three repositories share one [`DbPool`]. Row structs and the schema
//! stay private to this module; adapters translate them into domain types
//! and map every database failure onto the port's typed error.
//!
//! # Example
//!
//! ```ignore
//! use registrar::outbound::persistence::{DbPool, DieselCourseRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/registrar")).await?;
//! let courses = DieselCourseRepository::new(pool);
//! ```

mod course_loading;
mod diesel_account_repository;
mod diesel_course_repository;
mod diesel_enrollment_repository;
mod diesel_error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_course_repository::DieselCourseRepository;
pub use diesel_enrollment_repository::DieselEnrollmentRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
