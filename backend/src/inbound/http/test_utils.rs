//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key, time::Duration as CookieDuration};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test as actix_test;
use chrono::TimeDelta;
use serde_json::{Value, json};

use crate::domain::ports::NoOpEnrollmentMetrics;
use crate::domain::{
    AccountService, CourseCatalogueService, CourseId, DisplayName, Email, EnrollmentService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryRegistry;
use crate::outbound::security::Argon2PasswordHasher;
use crate::test_support::{MutableClock, course_date, course_draft, window_opens};

/// Build a session middleware configured for tests.
///
/// Mirrors the production cookie (private content, seven day TTL) but uses
/// a fresh key per invocation and disables the `Secure` flag for plain HTTP.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .cookie_content_security(CookieContentSecurity::Private)
        .session_lifecycle(PersistentSession::default().session_ttl(CookieDuration::days(7)))
        .build()
}

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-password";

type TestAccounts = AccountService<InMemoryRegistry, InMemoryRegistry>;

/// Real services over the in-memory registry with a settable clock.
pub struct TestBackend {
    pub clock: Arc<MutableClock>,
    pub state: HttpState,
    accounts: Arc<TestAccounts>,
}

impl TestBackend {
    /// Backend whose clock sits one hour into the fixture registration window.
    pub fn new() -> Self {
        let registry = Arc::new(InMemoryRegistry::new());
        let clock = Arc::new(MutableClock::new(window_opens() + TimeDelta::hours(1)));
        let hasher = Argon2PasswordHasher::with_params(8, 1, 1).expect("cheap argon2 params");
        let accounts = Arc::new(AccountService::new(
            registry.clone(),
            registry.clone(),
            Arc::new(hasher),
        ));
        let catalogue = Arc::new(CourseCatalogueService::new(registry.clone(), clock.clone()));
        let enrollment = Arc::new(EnrollmentService::new(
            registry.clone(),
            registry,
            Arc::new(NoOpEnrollmentMetrics),
            clock.clone(),
        ));
        let state = HttpState::new(HttpStatePorts {
            login: accounts.clone(),
            accounts: accounts.clone(),
            accounts_query: accounts.clone(),
            courses: catalogue.clone(),
            courses_query: catalogue,
            enrollment: enrollment.clone(),
            enrollment_query: enrollment,
        });
        Self {
            clock,
            state,
            accounts,
        }
    }

    /// Create the fixture admin account.
    pub async fn seed_admin(&self) {
        self.accounts
            .ensure_admin(
                Email::new(ADMIN_EMAIL).expect("valid email"),
                DisplayName::new("Administrator").expect("valid name"),
                ADMIN_PASSWORD,
            )
            .await
            .expect("seed admin");
    }

    /// Create a course with the fixture schedule and window.
    pub async fn seed_course(&self, name: &str, capacity: u32) -> CourseId {
        self.state
            .courses
            .create(course_draft(name, capacity, course_date()))
            .await
            .expect("seed course")
            .id
    }
}

/// Signup body for a student named after the local part of `email`.
pub fn signup_body(email: &str) -> Value {
    json!({
        "email": email,
        "password": "secret-pw",
        "passwordConfirm": "secret-pw",
        "name": email.split('@').next().unwrap_or(email),
    })
}

/// Post `body` to `uri` and return the session cookie from a successful reply.
pub async fn login_cookie(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    uri: &str,
    email: &str,
    password: &str,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri(uri)
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed: {}", response.status());
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Sign up `email` as a student and return its session cookie.
pub async fn student_cookie(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(signup_body(email))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);
    login_cookie(app, "/api/v1/auth/login", email, "secret-pw").await
}

/// Decode a JSON response body.
pub async fn json_body(response: ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}
