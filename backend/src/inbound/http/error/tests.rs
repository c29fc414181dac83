//! Status, trace header and redaction coverage for errors sent over HTTP.

use super::*;
use crate::domain::{Error, ErrorKind};
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::password_mismatch(), StatusCode::BAD_REQUEST)]
#[case(Error::email_taken(), StatusCode::BAD_REQUEST)]
#[case(Error::invalid_credentials(), StatusCode::BAD_REQUEST)]
#[case(Error::already_enrolled(), StatusCode::BAD_REQUEST)]
#[case(Error::no_active_enrollment(), StatusCode::BAD_REQUEST)]
#[case(Error::capacity_exceeded(), StatusCode::BAD_REQUEST)]
#[case(Error::outside_registration_window(), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::wrong_role("admins only"), StatusCode::FORBIDDEN)]
#[case(Error::course_not_found(), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn response_payload(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id is valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON deserialises")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("connection string leaked")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let payload = response_payload(
        error,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;

    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), "Internal server error");
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn rule_failures_keep_kind_and_details(expected_trace_id: String) {
    let error = Error::capacity_below_roster("capacity 1 is below the 2 enrolled")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"field": "maxCapacity", "enrolled": 2, "requested": 1}));

    let payload = response_payload(
        error,
        StatusCode::BAD_REQUEST,
        Some(expected_trace_id.as_str()),
    )
    .await;

    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(payload.kind(), ErrorKind::CapacityBelowRoster);
    assert_eq!(
        payload.details(),
        Some(&json!({"field": "maxCapacity", "enrolled": 2, "requested": 1}))
    );
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let payload =
        response_payload(Error::already_enrolled(), StatusCode::BAD_REQUEST, None).await;

    assert_eq!(payload.kind(), ErrorKind::AlreadyEnrolled);
    assert_eq!(payload.trace_id(), None);
}

#[given("a conflict error code")]
fn a_conflict_error_code() -> ErrorCode {
    ErrorCode::Conflict
}

#[when("the adapter maps the code to an HTTP status")]
fn the_adapter_maps_the_code_to_http_status(code: ErrorCode) -> StatusCode {
    super::status_for(code)
}

#[then("the status is 400 Bad Request")]
fn the_status_is_400_bad_request(status: StatusCode) {
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
fn conflicts_are_reported_as_bad_requests() {
    let code = a_conflict_error_code();
    let status = the_adapter_maps_the_code_to_http_status(code);
    the_status_is_400_bad_request(status);
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}
