//! Builders wiring repositories, services and the bootstrap admin into
//! [`HttpState`].

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::info;

use registrar::domain::ports::{
    AccountRepository, CourseRepository, EnrollmentMetrics, EnrollmentRepository,
    NoOpEnrollmentMetrics,
};
use registrar::domain::{
    AccountService, AdminBootstrap, CourseCatalogueService, DisplayName, Email,
    EnrollmentService,
};
use registrar::inbound::http::state::{HttpState, HttpStatePorts};
use registrar::outbound::memory::InMemoryRegistry;
use registrar::outbound::persistence::{
    DieselAccountRepository, DieselCourseRepository, DieselEnrollmentRepository,
};
use registrar::outbound::security::Argon2PasswordHasher;
use registrar::settings::AdminBootstrapSettings;

#[cfg(feature = "metrics")]
use registrar::outbound::metrics::PrometheusEnrollmentMetrics;

use super::ServerConfig;

/// Repository adapters shared by the three services.
struct Repositories<A, C, E> {
    accounts: Arc<A>,
    courses: Arc<C>,
    enrollments: Arc<E>,
}

/// Build the enrollment outcome recorder.
///
/// Registers a Prometheus counter when a registry is configured and falls
/// back to the no-op recorder otherwise.
///
/// # Errors
/// Returns [`std::io::Error`] if metric registration fails.
#[cfg(feature = "metrics")]
fn build_enrollment_metrics(config: &ServerConfig) -> std::io::Result<Arc<dyn EnrollmentMetrics>> {
    match &config.prometheus {
        Some(prom) => {
            let metrics = PrometheusEnrollmentMetrics::new(&prom.registry).map_err(|e| {
                std::io::Error::other(format!("enrollment metrics registration failed: {e}"))
            })?;
            Ok(Arc::new(metrics))
        }
        None => Ok(Arc::new(NoOpEnrollmentMetrics)),
    }
}

/// Build the enrollment outcome recorder; always a no-op without the
/// `metrics` feature.
#[cfg(not(feature = "metrics"))]
fn build_enrollment_metrics(_config: &ServerConfig) -> std::io::Result<Arc<dyn EnrollmentMetrics>> {
    Ok(Arc::new(NoOpEnrollmentMetrics))
}

async fn bootstrap_admin<A, E>(
    service: &AccountService<A, E>,
    admin: &AdminBootstrapSettings,
) -> std::io::Result<()>
where
    A: AccountRepository,
    E: EnrollmentRepository,
{
    let email = Email::new(&admin.email)
        .map_err(|e| std::io::Error::other(format!("invalid admin email: {e}")))?;
    let name = DisplayName::new(&admin.name)
        .map_err(|e| std::io::Error::other(format!("invalid admin name: {e}")))?;
    match service
        .ensure_admin(email, name, admin.password.as_str())
        .await
        .map_err(|e| std::io::Error::other(format!("admin bootstrap failed: {e}")))?
    {
        AdminBootstrap::Created(id) => info!(account_id = %id, "bootstrap admin created"),
        AdminBootstrap::AlreadyPresent(id) => {
            info!(account_id = %id, "bootstrap admin already present");
        }
    }
    Ok(())
}

async fn wire_services<A, C, E>(
    repos: Repositories<A, C, E>,
    metrics: Arc<dyn EnrollmentMetrics>,
    admin: Option<&AdminBootstrapSettings>,
) -> std::io::Result<HttpState>
where
    A: AccountRepository + 'static,
    C: CourseRepository + 'static,
    E: EnrollmentRepository + 'static,
{
    let Repositories {
        accounts,
        courses,
        enrollments,
    } = repos;
    let clock = Arc::new(DefaultClock);

    let account_service = Arc::new(AccountService::new(
        accounts,
        enrollments.clone(),
        Arc::new(Argon2PasswordHasher::default()),
    ));
    if let Some(admin) = admin {
        bootstrap_admin(&account_service, admin).await?;
    }
    let catalogue = Arc::new(CourseCatalogueService::new(courses.clone(), clock.clone()));
    let enrollment = Arc::new(EnrollmentService::new(enrollments, courses, metrics, clock));

    Ok(HttpState::new(HttpStatePorts {
        login: account_service.clone(),
        accounts: account_service.clone(),
        accounts_query: account_service,
        courses: catalogue.clone(),
        courses_query: catalogue,
        enrollment: enrollment.clone(),
        enrollment_query: enrollment,
    }))
}

/// Build HTTP state from configuration.
///
/// Uses the Diesel repositories when a pool is configured and a process-local
/// registry otherwise. The bootstrap admin, when configured, is ensured before
/// the state is returned.
///
/// # Errors
/// Returns [`std::io::Error`] when metric registration or the admin bootstrap
/// fails.
pub(super) async fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let metrics = build_enrollment_metrics(config)?;
    let admin = config.admin.as_ref();
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL persistence");
            let repos = Repositories {
                accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
                courses: Arc::new(DieselCourseRepository::new(pool.clone())),
                enrollments: Arc::new(DieselEnrollmentRepository::new(pool.clone())),
            };
            wire_services(repos, metrics, admin).await
        }
        None => {
            info!("no database configured; data lives in memory for this process");
            let registry = Arc::new(InMemoryRegistry::new());
            let repos = Repositories {
                accounts: registry.clone(),
                courses: registry.clone(),
                enrollments: registry,
            };
            wire_services(repos, metrics, admin).await
        }
    }
}
