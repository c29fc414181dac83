//! Course catalogue handlers. Every route requires an admin session.
//!
//! ```text
//! GET /api/v1/courses
//! POST /api/v1/courses {"name":"Intro to Rust","date":"2026-04-01","startTime":"10:00",...}
//! PUT /api/v1/courses/{id}
//! DELETE /api/v1/courses/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Capacity, CourseDraft, CourseId, CourseName, CourseSchedule, CourseValidationError, Error,
    RegistrationWindow, Role,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_role;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldErrorCode, FieldName, field_error, parse_course_id, parse_date, parse_rfc3339_timestamp,
    parse_time, required, required_text,
};
use crate::inbound::http::views::{CourseResponse, MessageResponse};

const NAME: FieldName = FieldName::new("name");
const DATE: FieldName = FieldName::new("date");
const START_TIME: FieldName = FieldName::new("startTime");
const END_TIME: FieldName = FieldName::new("endTime");
const MAX_CAPACITY: FieldName = FieldName::new("maxCapacity");
const REGISTRATION_START: FieldName = FieldName::new("registrationStartTime");
const REGISTRATION_END: FieldName = FieldName::new("registrationEndTime");
const ID: FieldName = FieldName::new("id");

/// Course create/update body.
///
/// Times of day accept `HH:MM` or `HH:MM:SS`; registration bounds are
/// RFC 3339 timestamps.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseRequest {
    #[serde(default)]
    #[schema(example = "Intro to Rust")]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(example = "2026-04-01")]
    pub date: Option<String>,
    #[serde(default)]
    #[schema(example = "10:00")]
    pub start_time: Option<String>,
    #[serde(default)]
    #[schema(example = "12:00")]
    pub end_time: Option<String>,
    #[serde(default)]
    #[schema(example = 20)]
    pub max_capacity: Option<i64>,
    #[serde(default)]
    #[schema(example = "2026-03-01T09:00:00Z")]
    pub registration_start_time: Option<String>,
    #[serde(default)]
    #[schema(example = "2026-03-08T09:00:00Z")]
    pub registration_end_time: Option<String>,
}

fn map_course_validation_error(err: CourseValidationError) -> Error {
    let field = match err {
        CourseValidationError::EmptyName => NAME,
        CourseValidationError::ScheduleOutOfOrder => END_TIME,
        CourseValidationError::ZeroCapacity
        | CourseValidationError::NegativeCapacity
        | CourseValidationError::CapacityTooLarge => MAX_CAPACITY,
        CourseValidationError::WindowOutOfOrder => REGISTRATION_END,
        CourseValidationError::InvalidId => ID,
    };
    field_error(field, FieldErrorCode::InvalidValue, err.to_string())
}

impl TryFrom<CourseRequest> for CourseDraft {
    type Error = Error;

    fn try_from(value: CourseRequest) -> Result<Self, Self::Error> {
        let name = required_text(value.name, NAME)?;
        let date = parse_date(&required_text(value.date, DATE)?, DATE)?;
        let start = parse_time(&required_text(value.start_time, START_TIME)?, START_TIME)?;
        let end = parse_time(&required_text(value.end_time, END_TIME)?, END_TIME)?;
        let capacity = required(value.max_capacity, MAX_CAPACITY)?;
        let opens = parse_rfc3339_timestamp(
            &required_text(value.registration_start_time, REGISTRATION_START)?,
            REGISTRATION_START,
        )?;
        let closes = parse_rfc3339_timestamp(
            &required_text(value.registration_end_time, REGISTRATION_END)?,
            REGISTRATION_END,
        )?;

        Ok(Self {
            name: CourseName::new(name).map_err(map_course_validation_error)?,
            schedule: CourseSchedule::new(date, start, end)
                .map_err(map_course_validation_error)?,
            capacity: Capacity::try_from(capacity).map_err(map_course_validation_error)?,
            window: RegistrationWindow::new(opens, closes).map_err(map_course_validation_error)?,
        })
    }
}

fn course_id_from_path(raw: &str) -> ApiResult<CourseId> {
    parse_course_id(raw, ID)
}

/// List every course with its roster, newest date first.
#[utoipa::path(
    get,
    path = "/api/v1/courses",
    responses(
        (status = 200, description = "Courses", body = [CourseResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "listCourses"
)]
#[get("/courses")]
pub async fn list_courses(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CourseResponse>>> {
    require_role(&session, state.accounts_query.as_ref(), Role::Admin).await?;
    let courses = state.courses_query.list().await?;
    Ok(web::Json(
        courses.iter().map(CourseResponse::detailed).collect(),
    ))
}

/// Fetch one course with its roster.
#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course", body = CourseResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Course not found", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "getCourse"
)]
#[get("/courses/{id}")]
pub async fn get_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<CourseResponse>> {
    require_role(&session, state.accounts_query.as_ref(), Role::Admin).await?;
    let id = course_id_from_path(&path)?;
    let course = state.courses_query.get(id).await?;
    Ok(web::Json(CourseResponse::detailed(&course)))
}

/// Create a course.
#[utoipa::path(
    post,
    path = "/api/v1/courses",
    request_body = CourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "createCourse"
)]
#[post("/courses")]
pub async fn create_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CourseRequest>,
) -> ApiResult<HttpResponse> {
    require_role(&session, state.accounts_query.as_ref(), Role::Admin).await?;
    let draft = CourseDraft::try_from(payload.into_inner())?;
    let course = state.courses.create(draft).await?;
    Ok(HttpResponse::Created().json(CourseResponse::detailed(&course)))
}

/// Replace a course's editable attributes. The roster is untouched, and the
/// capacity may not drop below it.
#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    request_body = CourseRequest,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Course not found", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "updateCourse"
)]
#[put("/courses/{id}")]
pub async fn update_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CourseRequest>,
) -> ApiResult<web::Json<CourseResponse>> {
    require_role(&session, state.accounts_query.as_ref(), Role::Admin).await?;
    let id = course_id_from_path(&path)?;
    let draft = CourseDraft::try_from(payload.into_inner())?;
    let course = state.courses.update(id, draft).await?;
    Ok(web::Json(CourseResponse::detailed(&course)))
}

/// Delete a course, releasing every enrolled account.
#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course deleted", body = MessageResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Course not found", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "deleteCourse"
)]
#[delete("/courses/{id}")]
pub async fn delete_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    require_role(&session, state.accounts_query.as_ref(), Role::Admin).await?;
    let id = course_id_from_path(&path)?;
    state.courses.delete(id).await?;
    Ok(web::Json(MessageResponse::new("course deleted")))
}
