//! Process-local adapters used when no database is configured.

mod registry;

pub use registry::InMemoryRegistry;
