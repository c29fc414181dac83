//! Account API handlers.
//!
//! ```text
//! POST /api/v1/auth/signup {"email":"ada@example.com","password":"pw","passwordConfirm":"pw","name":"Ada"}
//! POST /api/v1/auth/login {"email":"ada@example.com","password":"pw"}
//! GET /api/v1/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{
    AccountValidationError, AuthValidationError, Email, Error, LoginCredentials, PasswordChange,
    Role, SignupDetails,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_account;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, required_text};
use crate::inbound::http::views::{AccountResponse, MessageResponse, ProfileResponse};

/// Signup request body. Every field is required; absence is reported with
/// the list of missing fields rather than a deserialisation failure.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_confirm: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl TryFrom<SignupRequest> for SignupDetails {
    type Error = AuthValidationError;

    fn try_from(value: SignupRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.email.as_deref().unwrap_or_default(),
            value.password.as_deref().unwrap_or_default(),
            value.password_confirm.as_deref().unwrap_or_default(),
            value.name.as_deref().unwrap_or_default(),
        )
    }
}

/// Login request body shared by the student and admin portals.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = AuthValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.email.as_deref().unwrap_or_default(),
            value.password.as_deref().unwrap_or_default(),
        )
    }
}

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    #[serde(default)]
    pub new_password: Option<String>,
    #[serde(default)]
    pub confirm_password: Option<String>,
}

impl TryFrom<PasswordChangeRequest> for PasswordChange {
    type Error = AuthValidationError;

    fn try_from(value: PasswordChangeRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.new_password.as_deref().unwrap_or_default(),
            value.confirm_password.as_deref().unwrap_or_default(),
        )
    }
}

fn map_auth_validation_error(err: AuthValidationError) -> Error {
    match err {
        AuthValidationError::MissingFields(fields) => {
            Error::invalid_request(format!("missing required fields: {}", fields.join(", ")))
                .with_details(json!({ "fields": fields, "code": "missing_field" }))
        }
        AuthValidationError::PasswordMismatch => Error::password_mismatch(),
        AuthValidationError::Account(err) => map_account_validation_error(err),
    }
}

fn map_account_validation_error(err: AccountValidationError) -> Error {
    let field = match err {
        AccountValidationError::EmptyDisplayName => "name",
        AccountValidationError::EmptyEmail | AccountValidationError::InvalidEmail => "email",
        AccountValidationError::InvalidId | AccountValidationError::UnknownRole(_) => "account",
    };
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": field, "code": "invalid_value" }))
}

/// Register a student account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid request, password mismatch or email taken", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let details =
        SignupDetails::try_from(payload.into_inner()).map_err(map_auth_validation_error)?;
    let account = state.accounts.signup(details).await?;
    Ok(HttpResponse::Created().json(AccountResponse::from(&account)))
}

async fn login_as(
    state: &HttpState,
    session: &SessionContext,
    payload: LoginRequest,
    portal: Role,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload).map_err(map_auth_validation_error)?;
    let account = state.login.authenticate(&credentials, portal).await?;
    session.persist_account(account.id)?;
    let profile = state.accounts_query.profile(account.id).await?;
    info!(account_id = %account.id, role = %account.role, "session established");
    Ok(HttpResponse::Ok().json(ProfileResponse::from(&profile)))
}

/// Authenticate a student and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = ProfileResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid credentials", body = ErrorSchema),
        (status = 403, description = "Admin accounts must use the admin portal", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    login_as(&state, &session, payload.into_inner(), Role::Student).await
}

/// Authenticate an administrator and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/admin-login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = ProfileResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid credentials", body = ErrorSchema),
        (status = 403, description = "Not an admin account", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "adminLogin",
    security([])
)]
#[post("/auth/admin-login")]
pub async fn admin_login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    login_as(&state, &session, payload.into_inner(), Role::Admin).await
}

/// Drop the session token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Acknowledge a password reset request for a known email.
///
/// No message is sent; the endpoint only confirms the account exists.
#[utoipa::path(
    post,
    path = "/api/v1/auth/request-password-reset",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Reset acknowledged", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown email", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "requestPasswordReset",
    security([])
)]
#[post("/auth/request-password-reset")]
pub async fn request_password_reset(
    state: web::Data<HttpState>,
    payload: web::Json<PasswordResetRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    const EMAIL: FieldName = FieldName::new("email");
    let raw = required_text(payload.into_inner().email, EMAIL)?;
    let email = Email::new(raw).map_err(map_account_validation_error)?;
    state.accounts.request_password_reset(email).await?;
    Ok(web::Json(MessageResponse::new(
        "password reset instructions sent",
    )))
}

/// Replace the caller's password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    request_body = PasswordChangeRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Missing fields or password mismatch", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "resetPassword"
)]
#[post("/auth/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PasswordChangeRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let account = require_account(&session, state.accounts_query.as_ref()).await?;
    let change =
        PasswordChange::try_from(payload.into_inner()).map_err(map_auth_validation_error)?;
    state.accounts.change_password(account.id, change).await?;
    Ok(web::Json(MessageResponse::new("password updated")))
}

/// Fetch the caller's profile, including the course they hold.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentAccount"
)]
#[get("/auth/me")]
pub async fn current_account(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProfileResponse>> {
    let account = require_account(&session, state.accounts_query.as_ref()).await?;
    let profile = state.accounts_query.profile(account.id).await?;
    Ok(web::Json(ProfileResponse::from(&profile)))
}
