//! Student enrollment handlers.
//!
//! ```text
//! GET /api/v1/enrollment/courses
//! POST /api/v1/enrollment/enroll/{courseId}
//! DELETE /api/v1/enrollment/cancel
//! GET /api/v1/enrollment/my-course
//! ```

use actix_web::{delete, get, post, web};

use crate::domain::Role;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_role;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_course_id};
use crate::inbound::http::views::{CourseResponse, EnrollmentResponse, MessageResponse};

/// Browse courses with their seat counts. Rosters are not exposed.
#[utoipa::path(
    get,
    path = "/api/v1/enrollment/courses",
    responses(
        (status = 200, description = "Courses", body = [CourseResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["enrollment"],
    operation_id = "browseCourses"
)]
#[get("/enrollment/courses")]
pub async fn browse_courses(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CourseResponse>>> {
    require_role(&session, state.accounts_query.as_ref(), Role::Student).await?;
    let courses = state.enrollment_query.open_courses().await?;
    Ok(web::Json(courses.iter().map(CourseResponse::summary).collect()))
}

/// Claim a seat in a course.
#[utoipa::path(
    post,
    path = "/api/v1/enrollment/enroll/{courseId}",
    params(("courseId" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Enrolled", body = EnrollmentResponse),
        (status = 400, description = "Already enrolled, course full or registration closed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Course not found", body = ErrorSchema)
    ),
    tags = ["enrollment"],
    operation_id = "enroll"
)]
#[post("/enrollment/enroll/{course_id}")]
pub async fn enroll(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<EnrollmentResponse>> {
    let account = require_role(&session, state.accounts_query.as_ref(), Role::Student).await?;
    let course_id = parse_course_id(&path, FieldName::new("courseId"))?;
    let course = state.enrollment.enroll(&account, course_id).await?;
    Ok(web::Json(EnrollmentResponse {
        message: "enrollment complete".to_owned(),
        course: CourseResponse::detailed(&course),
    }))
}

/// Give up the caller's seat.
#[utoipa::path(
    delete,
    path = "/api/v1/enrollment/cancel",
    responses(
        (status = 200, description = "Enrollment cancelled", body = MessageResponse),
        (status = 400, description = "No active enrollment", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["enrollment"],
    operation_id = "cancelEnrollment"
)]
#[delete("/enrollment/cancel")]
pub async fn cancel(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MessageResponse>> {
    let account = require_role(&session, state.accounts_query.as_ref(), Role::Student).await?;
    state.enrollment.cancel(&account).await?;
    Ok(web::Json(MessageResponse::new("enrollment cancelled")))
}

/// The caller's course with its roster, or `null`.
#[utoipa::path(
    get,
    path = "/api/v1/enrollment/my-course",
    responses(
        (status = 200, description = "Active course or null", body = Option<CourseResponse>),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["enrollment"],
    operation_id = "myCourse"
)]
#[get("/enrollment/my-course")]
pub async fn my_course(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Option<CourseResponse>>> {
    let account = require_role(&session, state.accounts_query.as_ref(), Role::Student).await?;
    let course = state.enrollment_query.my_course(account.id).await?;
    Ok(web::Json(course.as_ref().map(CourseResponse::detailed)))
}
