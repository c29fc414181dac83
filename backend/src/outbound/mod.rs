//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local repositories for development and tests
//! - **security**: Argon2id credential hashing
//! - **metrics**: Prometheus-backed metrics exporters (feature-gated)
//!
//! Adapters translate between domain types and infrastructure
//! representations. Business rules stay in the domain; the repositories only
//! evaluate them where a write must be atomic with its checks.

pub mod memory;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
pub mod security;
