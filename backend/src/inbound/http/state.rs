//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and only see driving
//! ports, so they stay testable with mocks.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, CourseCommand, CourseQuery, EnrollmentCommand, EnrollmentQuery,
    LoginService,
};

/// Parameter object bundling every port used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
    pub courses: Arc<dyn CourseCommand>,
    pub courses_query: Arc<dyn CourseQuery>,
    pub enrollment: Arc<dyn EnrollmentCommand>,
    pub enrollment_query: Arc<dyn EnrollmentQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
    pub courses: Arc<dyn CourseCommand>,
    pub courses_query: Arc<dyn CourseQuery>,
    pub enrollment: Arc<dyn EnrollmentCommand>,
    pub enrollment_query: Arc<dyn EnrollmentQuery>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use registrar::domain::ports::NoOpEnrollmentMetrics;
    /// use registrar::domain::{
    ///     AccountService, CourseCatalogueService, EnrollmentService,
    /// };
    /// use registrar::inbound::http::state::{HttpState, HttpStatePorts};
    /// use registrar::outbound::memory::InMemoryRegistry;
    /// use registrar::outbound::security::Argon2PasswordHasher;
    ///
    /// let registry = Arc::new(InMemoryRegistry::new());
    /// let accounts = Arc::new(AccountService::new(
    ///     registry.clone(),
    ///     registry.clone(),
    ///     Arc::new(Argon2PasswordHasher::default()),
    /// ));
    /// let catalogue = Arc::new(CourseCatalogueService::new(
    ///     registry.clone(),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let enrollment = Arc::new(EnrollmentService::new(
    ///     registry.clone(),
    ///     registry,
    ///     Arc::new(NoOpEnrollmentMetrics),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: accounts.clone(),
    ///     accounts: accounts.clone(),
    ///     accounts_query: accounts,
    ///     courses: catalogue.clone(),
    ///     courses_query: catalogue,
    ///     enrollment: enrollment.clone(),
    ///     enrollment_query: enrollment,
    /// });
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            accounts,
            accounts_query,
            courses,
            courses_query,
            enrollment,
            enrollment_query,
        } = ports;
        Self {
            login,
            accounts,
            accounts_query,
            courses,
            courses_query,
            enrollment,
            enrollment_query,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
