//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod auth;
pub mod courses;
pub mod enrollment;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;
pub mod views;

use actix_web::web;

use crate::domain::Error;

pub use error::ApiResult;

/// JSON extractor settings that report malformed bodies with the shared
/// error payload instead of actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed JSON body: {err}")).into()
    })
}

/// Register every `/api/v1` route on `cfg`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(accounts::signup)
        .service(accounts::login)
        .service(accounts::admin_login)
        .service(accounts::logout)
        .service(accounts::request_password_reset)
        .service(accounts::reset_password)
        .service(accounts::current_account)
        .service(courses::list_courses)
        .service(courses::get_course)
        .service(courses::create_course)
        .service(courses::update_course)
        .service(courses::delete_course)
        .service(enrollment::browse_courses)
        .service(enrollment::enroll)
        .service(enrollment::cancel)
        .service(enrollment::my_course);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{TestBackend, json_body, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::Value;

    #[actix_web::test]
    async fn malformed_json_uses_the_error_payload() {
        let backend = TestBackend::new();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(backend.state.clone()))
                .wrap(test_session_middleware())
                .service(web::scope("/api/v1").configure(configure_api)),
        )
        .await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/courses")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\":")
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value = json_body(response).await;
        assert_eq!(
            value.get("code").and_then(Value::as_str),
            Some("invalid_request")
        );
    }
}
