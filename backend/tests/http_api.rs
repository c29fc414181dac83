//! End-to-end tests of the public HTTP surface assembled from the library.
//!
//! Covers the admin and student journeys across handlers, session cookies
//! and trace identifiers.

use std::sync::Arc;

use actix_session::{
    SessionMiddleware, config::CookieContentSecurity, storage::CookieSessionStore,
};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use registrar::Trace;
use registrar::domain::ports::NoOpEnrollmentMetrics;
use registrar::domain::{
    AccountService, CourseCatalogueService, DisplayName, Email, EnrollmentService,
    TRACE_ID_HEADER,
};
use registrar::inbound::http::configure_api;
use registrar::inbound::http::state::{HttpState, HttpStatePorts};
use registrar::outbound::memory::InMemoryRegistry;
use registrar::outbound::security::Argon2PasswordHasher;
use registrar::test_support::{MutableClock, window_opens};
use rstest::rstest;
use serde_json::{Value, json};

async fn app() -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    let registry = Arc::new(InMemoryRegistry::new());
    let clock = Arc::new(MutableClock::new(window_opens() + chrono::TimeDelta::hours(1)));
    let hasher = Arc::new(Argon2PasswordHasher::with_params(8, 1, 1).expect("cheap params"));
    let accounts = Arc::new(AccountService::new(registry.clone(), registry.clone(), hasher));
    accounts
        .ensure_admin(
            Email::new("admin@example.com").expect("email"),
            DisplayName::new("Admin").expect("name"),
            "admin-password",
        )
        .await
        .expect("admin bootstrap");
    let catalogue = Arc::new(CourseCatalogueService::new(registry.clone(), clock.clone()));
    let enrollment = Arc::new(EnrollmentService::new(
        registry.clone(),
        registry,
        Arc::new(NoOpEnrollmentMetrics),
        clock,
    ));
    let state = HttpState::new(HttpStatePorts {
        login: accounts.clone(),
        accounts: accounts.clone(),
        accounts_query: accounts,
        courses: catalogue.clone(),
        courses_query: catalogue,
        enrollment: enrollment.clone(),
        enrollment_query: enrollment,
    });
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .cookie_content_security(CookieContentSecurity::Private)
        .build();

    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(web::scope("/api/v1").wrap(session).configure(configure_api)),
    )
    .await
}

async fn login(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    uri: &str,
    email: &str,
    password: &str,
) -> Cookie<'static> {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(uri)
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "login via {uri}");
    res.response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("session cookie")
        .into_owned()
}

#[rstest]
#[actix_rt::test]
async fn unauthenticated_errors_carry_the_trace_id() {
    let app = app().await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/auth/me").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["traceId"].as_str(), Some(header.as_str()));
}

#[rstest]
#[actix_rt::test]
async fn admin_publishes_a_course_and_a_student_claims_it() {
    let app = app().await;
    let admin = login(&app, "/api/v1/auth/admin-login", "admin@example.com", "admin-password").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/courses")
            .cookie(admin.clone())
            .set_json(json!({
                "name": "Intro to Rust",
                "date": "2026-04-01",
                "startTime": "10:00:00",
                "endTime": "12:00:00",
                "maxCapacity": 1,
                "registrationStartTime": "2026-03-01T09:00:00Z",
                "registrationEndTime": "2026-03-08T09:00:00Z"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let course: Value = test::read_body_json(res).await;
    let course_id = course["id"].as_str().expect("course id").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "secret-pw",
                "passwordConfirm": "secret-pw"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let student = login(&app, "/api/v1/auth/login", "ada@example.com", "secret-pw").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/enrollment/enroll/{course_id}"))
            .cookie(student.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["course"]["remainingSeats"], 0);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/courses/{course_id}"))
            .cookie(admin)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["enrolledStudents"][0]["email"], "ada@example.com");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/enrollment/my-course")
            .cookie(student)
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["id"].as_str(), Some(course_id.as_str()));
}
