//! Registrar entry-point: loads configuration, applies migrations and serves
//! the REST API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use registrar::inbound::http::health::HealthState;
use registrar::inbound::http::session_config::{BuildMode, session_settings_from_env};
use registrar::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use registrar::settings::AppSettings;
use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let admin = settings.admin_bootstrap().map_err(std::io::Error::other)?;

    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    session.log_summary();

    let db_pool = connect_database(&settings).await?;

    let config = ServerConfig::new(session, bind_addr)
        .with_db_pool(db_pool)
        .with_admin(admin);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(make_metrics());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).await?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

/// Apply migrations and open the connection pool when a database is
/// configured.
async fn connect_database(settings: &AppSettings) -> std::io::Result<Option<DbPool>> {
    let Some(url) = settings.database_url() else {
        return Ok(None);
    };
    run_migrations(url)
        .await
        .map_err(|e| std::io::Error::other(format!("database migration failed: {e}")))?;
    info!("database migrations applied");

    let mut pool_config = PoolConfig::new(url);
    if let Some(max_size) = settings.pool_max_size {
        pool_config = pool_config.with_max_size(max_size);
    }
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|e| std::io::Error::other(format!("create database pool: {e}")))?;
    Ok(Some(pool))
}

#[cfg(feature = "metrics")]
fn make_metrics() -> Option<PrometheusMetrics> {
    match PrometheusMetricsBuilder::new("registrar")
        .endpoint("/metrics")
        .build()
    {
        Ok(metrics) => Some(metrics),
        Err(e) => {
            warn!(error = %e, "Prometheus metrics disabled");
            None
        }
    }
}
