//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint of the registrar, the response
//! and request bodies they exchange, and the session cookie security scheme.
//! Domain error types are described through the wrappers in
//! [`crate::inbound::http::schemas`] so the domain stays free of utoipa.
//!
//! The document backs Swagger UI in debug builds and is exported with
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::accounts::{
    LoginRequest, PasswordChangeRequest, PasswordResetRequest, SignupRequest,
};
use crate::inbound::http::courses::CourseRequest;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorKindSchema, ErrorSchema};
use crate::inbound::http::views::{
    AccountResponse, CourseResponse, EnrollmentResponse, MessageResponse, ProfileResponse,
    RosterEntryResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login or /api/v1/auth/admin-login.",
            ))),
        );
    }
}

/// OpenAPI document for the registrar REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Registrar API",
        description = "Course catalogue administration and single-seat student enrollment.",
        license(
            name = "ISC",
            url = "https://opensource.org/license/isc-license-txt"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::signup,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::admin_login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::request_password_reset,
        crate::inbound::http::accounts::reset_password,
        crate::inbound::http::accounts::current_account,
        crate::inbound::http::courses::list_courses,
        crate::inbound::http::courses::get_course,
        crate::inbound::http::courses::create_course,
        crate::inbound::http::courses::update_course,
        crate::inbound::http::courses::delete_course,
        crate::inbound::http::enrollment::browse_courses,
        crate::inbound::http::enrollment::enroll,
        crate::inbound::http::enrollment::cancel,
        crate::inbound::http::enrollment::my_course,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ErrorKindSchema,
        AccountResponse,
        ProfileResponse,
        CourseResponse,
        RosterEntryResponse,
        EnrollmentResponse,
        MessageResponse,
        SignupRequest,
        LoginRequest,
        PasswordResetRequest,
        PasswordChangeRequest,
        CourseRequest,
    )),
    tags(
        (name = "auth", description = "Signup, sign-in and password upkeep"),
        (name = "courses", description = "Course catalogue administration"),
        (name = "enrollment", description = "Student course browsing and enrollment"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document's shape.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_exposes_code_and_message() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "kind");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[rstest]
    fn course_schema_uses_camel_case_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let course = schemas.get("CourseResponse").expect("CourseResponse schema");

        for field in ["maxCapacity", "registrationEndTime", "remainingSeats"] {
            assert_object_schema_has_field(course, field);
        }
    }

    #[rstest]
    #[case("/api/v1/auth/signup")]
    #[case("/api/v1/auth/admin-login")]
    #[case("/api/v1/courses/{id}")]
    #[case("/api/v1/enrollment/enroll/{courseId}")]
    #[case("/api/v1/enrollment/my-course")]
    #[case("/health/ready")]
    fn document_lists_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");

        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
