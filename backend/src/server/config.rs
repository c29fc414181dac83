//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use registrar::inbound::http::session_config::SessionSettings;
use registrar::outbound::persistence::DbPool;
use registrar::settings::AdminBootstrapSettings;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) admin: Option<AdminBootstrapSettings>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a configuration serving from memory with no bootstrap admin.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            admin: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Persist accounts, courses and enrollments in PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: Option<DbPool>) -> Self {
        self.db_pool = pool;
        self
    }

    /// Ensure this admin account exists before the server accepts traffic.
    #[must_use]
    pub fn with_admin(mut self, admin: Option<AdminBootstrapSettings>) -> Self {
        self.admin = admin;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
